use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::analysis::Quote;

pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Pick the format from the file extension (`.json` / `.csv`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => anyhow::bail!("Invalid export format: {}. Must be 'json' or 'csv'", s),
        }
    }
}

/// A quote as written to disk, stamped with when it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub quote: Quote,
}

impl QuoteReport {
    pub fn new(quote: Quote, currency: &str) -> Self {
        Self {
            version: REPORT_VERSION.to_string(),
            generated_at: Utc::now(),
            currency: currency.to_string(),
            quote,
        }
    }
}

pub fn export_quote(report: &QuoteReport, path: &Path, format: ExportFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let contents = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize quote report")?
        }
        ExportFormat::Csv => quote_to_csv(report),
    };

    fs::write(path, contents)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    tracing::info!(path = %path.display(), ?format, "exported quote");
    Ok(())
}

/// Two sections in one file: cost lines, then resource lines.
pub fn quote_to_csv(report: &QuoteReport) -> String {
    let quote = &report.quote;
    let mut csv_content = String::new();

    csv_content.push_str("applicant_count,city,modality,currency,generated_at\n");
    csv_content.push_str(&format!(
        "{},{},{},{},{}\n",
        quote.request.applicant_count,
        csv_field(quote.request.city.name()),
        csv_field(quote.request.modality.name()),
        csv_field(&report.currency),
        report.generated_at.to_rfc3339()
    ));
    csv_content.push('\n');

    csv_content.push_str("category,amount,share_pct\n");
    for share in &quote.breakdown {
        csv_content.push_str(&format!(
            "{},{},{:.2}\n",
            csv_field(share.category.label()),
            share.amount,
            share.share_pct
        ));
    }
    csv_content.push_str(&format!("Total,{},100.00\n", quote.result.financial.total));
    csv_content.push('\n');

    csv_content.push_str("resource,quantity\n");
    for line in &quote.resources {
        csv_content.push_str(&format!("{},{}\n", csv_field(&line.resource), line.quantity));
    }

    csv_content
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
