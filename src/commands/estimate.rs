// Estimate command handler
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::OutputOptions;
use crate::analysis::{EstimationRequest, Estimator, Quote};
use crate::config::settings::GeneralConfig;
use crate::models::{City, Modality};
use crate::output::{ExportFormat, QuoteReport, export_quote};

/// Raw `estimate` arguments as they come off the command line.
#[derive(Debug, Clone, Default)]
pub struct EstimateArgs {
    pub applicants: Option<i64>,
    pub city: Option<String>,
    pub modality: Option<String>,
    pub request: Option<String>,
    pub export: Option<String>,
    pub format: Option<String>,
}

pub fn handle_estimate_command(
    args: EstimateArgs,
    defaults: &GeneralConfig,
    estimator: &Estimator,
    output: &OutputOptions,
) -> Result<()> {
    let request = match &args.request {
        Some(request_path) => read_request(Path::new(request_path))?,
        None => resolve_request(&args, defaults)?,
    };
    let quote = Quote::build(estimator, request)?;

    if let Some(export_path) = &args.export {
        let path = Path::new(export_path);
        let format = resolve_export_format(path, args.format.as_deref())?;
        let report = QuoteReport::new(quote.clone(), &output.currency);
        export_quote(&report, path, format)?;

        if !output.json && args.request.is_none() {
            println!("Quote exported to: {}", path.display());
        }
    }

    if args.request.is_some() {
        // Request files get the bare result back, like a POST /estimate body.
        println!("{}", serde_json::to_string_pretty(&quote.result)?);
    } else {
        println!("{}", output.render(&quote)?);
    }
    Ok(())
}

/// Build a request from flags, falling back to configured defaults.
pub fn resolve_request(args: &EstimateArgs, defaults: &GeneralConfig) -> Result<EstimationRequest> {
    let applicant_count = args
        .applicants
        .context("Number of applicants is required")?;

    let city = match &args.city {
        Some(name) => name.parse::<City>()?,
        None => defaults.default_city,
    };
    let modality = match &args.modality {
        Some(name) => name.parse::<Modality>()?,
        None => defaults.default_modality,
    };

    Ok(EstimationRequest::new(applicant_count, city, modality))
}

pub fn read_request(path: &Path) -> Result<EstimationRequest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse request file: {}", path.display()))
}

pub fn resolve_export_format(path: &Path, explicit: Option<&str>) -> Result<ExportFormat> {
    match explicit {
        Some(format) => format.parse(),
        None => ExportFormat::from_path(path).with_context(|| {
            format!(
                "Cannot infer export format from '{}'; use --format json or --format csv",
                path.display()
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_request_uses_defaults() {
        let defaults = GeneralConfig {
            default_city: City::Cali,
            default_modality: Modality::Virtual,
        };
        let args = EstimateArgs {
            applicants: Some(300),
            ..Default::default()
        };

        let request = resolve_request(&args, &defaults).unwrap();
        assert_eq!(request, EstimationRequest::new(300, City::Cali, Modality::Virtual));
    }

    #[test]
    fn test_resolve_request_flags_override_defaults() {
        let args = EstimateArgs {
            applicants: Some(300),
            city: Some("barranquilla".to_string()),
            modality: Some("escrita".to_string()),
            ..Default::default()
        };

        let request = resolve_request(&args, &GeneralConfig::default()).unwrap();
        assert_eq!(request.city, City::Barranquilla);
        assert_eq!(request.modality, Modality::Written);
    }

    #[test]
    fn test_resolve_request_rejects_unknown_city() {
        let args = EstimateArgs {
            applicants: Some(300),
            city: Some("Caracas".to_string()),
            ..Default::default()
        };
        assert!(resolve_request(&args, &GeneralConfig::default()).is_err());
    }

    #[test]
    fn test_read_request_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("request.json");
        fs::write(
            &path,
            r#"{"applicant_count": 1200, "city": "Quibdó", "modality": "Virtual"}"#,
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(request, EstimationRequest::new(1_200, City::Quibdo, Modality::Virtual));
    }

    #[test]
    fn test_read_request_with_unknown_modality_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("request.json");
        fs::write(
            &path,
            r#"{"applicant_count": 10, "city": "Cali", "modality": "Oral"}"#,
        )
        .unwrap();

        assert!(read_request(&path).is_err());
    }

    #[test]
    fn test_export_format_resolution() {
        let json = resolve_export_format(Path::new("q.json"), None).unwrap();
        assert_eq!(json, ExportFormat::Json);

        let forced = resolve_export_format(Path::new("q.json"), Some("csv")).unwrap();
        assert_eq!(forced, ExportFormat::Csv);

        assert!(resolve_export_format(Path::new("q.txt"), None).is_err());
    }

    #[test]
    fn test_estimate_command_writes_export() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("quote.csv");
        let args = EstimateArgs {
            applicants: Some(500),
            export: Some(path.display().to_string()),
            ..Default::default()
        };
        let output = OutputOptions {
            currency: "COP".to_string(),
            decimal_places: 0,
            json: true,
            colored: false,
        };

        handle_estimate_command(args, &GeneralConfig::default(), &Estimator::new(), &output)
            .unwrap();

        let csv = fs::read_to_string(&path).unwrap();
        assert!(csv.contains("Total,11465515,100.00"));
    }

    #[test]
    fn test_request_file_estimate_writes_export() {
        let temp_dir = TempDir::new().unwrap();
        let request_path = temp_dir.path().join("request.json");
        let export_path = temp_dir.path().join("quote.csv");
        fs::write(
            &request_path,
            r#"{"applicant_count": 500, "city": "Bogotá", "modality": "Escrita"}"#,
        )
        .unwrap();

        let args = EstimateArgs {
            request: Some(request_path.display().to_string()),
            export: Some(export_path.display().to_string()),
            ..Default::default()
        };
        let output = OutputOptions {
            currency: "COP".to_string(),
            decimal_places: 0,
            json: true,
            colored: false,
        };

        handle_estimate_command(args, &GeneralConfig::default(), &Estimator::new(), &output)
            .unwrap();

        let csv = fs::read_to_string(&export_path).unwrap();
        assert!(csv.contains("Total,11465515,100.00"));
    }
}
