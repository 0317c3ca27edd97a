use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{City, Modality, Tariff};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub default_city: City,
    pub default_modality: Modality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String, // "table" or "json"
    pub colored: bool,
    pub decimal_places: u8,
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tariff file replacing the built-in prices and staffing ratios.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tariff_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_city: City::Bogota,
            default_modality: Modality::Written,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            colored: false,
            decimal_places: 0,
            currency: "COP".to_string(),
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults on first use.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::debug!(path = %config_path.display(), "wrote default configuration");
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_commented_toml();

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Generate TOML configuration with comments explaining each option
    pub fn to_commented_toml(&self) -> String {
        let mut output = String::new();

        output.push_str("# excost Configuration File\n");
        output.push_str("# Exam logistics cost estimator\n");
        output.push_str("#\n");
        output.push_str("# All settings have defaults and can be overridden via CLI flags.\n");
        output.push('\n');

        output.push_str("[general]\n");
        output.push_str("# City used when --city is not given\n");
        output.push_str("# One of: Bogotá, Medellín, Cali, Barranquilla, Bucaramanga, Quibdó, San Andrés\n");
        output.push_str(&format!(
            "default_city = {}\n",
            toml_string(&self.general.default_city.to_string())
        ));
        output.push('\n');
        output.push_str("# Modality used when --modality is not given: \"Escrita\" or \"Virtual\"\n");
        output.push_str(&format!(
            "default_modality = {}\n",
            toml_string(&self.general.default_modality.to_string())
        ));
        output.push('\n');

        output.push_str("[output]\n");
        output.push_str("# Default output format:\n");
        output.push_str("#   \"table\" - Human-readable tables\n");
        output.push_str("#   \"json\"  - Machine-readable JSON\n");
        output.push_str("# Can be overridden with --json flag\n");
        output.push_str(&format!("format = {}\n", toml_string(&self.output.format)));
        output.push('\n');
        output.push_str("# Enable colored table output by default (--colored)\n");
        output.push_str(&format!("colored = {}\n", self.output.colored));
        output.push('\n');
        output.push_str("# Decimal places for per-applicant figures (0-10)\n");
        output.push_str("# Totals are always whole units\n");
        output.push_str(&format!("decimal_places = {}\n", self.output.decimal_places));
        output.push('\n');
        output.push_str("# Currency label shown next to amounts. Labels only, no conversion.\n");
        output.push_str(&format!("currency = {}\n", toml_string(&self.output.currency)));
        output.push('\n');

        output.push_str("[pricing]\n");
        output.push_str("# Optional tariff file with unit prices and staffing ratios.\n");
        output.push_str("# Create one with: excost pricing export <path>\n");
        match &self.pricing.tariff_path {
            Some(path) => output.push_str(&format!("tariff_path = {}\n", toml_string(path))),
            None => output.push_str("# tariff_path = \"~/.config/excost/tariff.toml\"\n"),
        }

        output
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("excost").join("config.toml"))
    }

    /// Tariff from `[pricing] tariff_path`, or the built-in one.
    pub fn load_tariff(&self) -> Result<Tariff> {
        match &self.pricing.tariff_path {
            Some(path) => Tariff::load(&expand_home(path)),
            None => Ok(Tariff::default()),
        }
    }

    pub fn json_output(&self) -> bool {
        self.output.format == "json"
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.default_city" => {
                self.general.default_city = value.parse()?;
            }
            "general.default_modality" => {
                self.general.default_modality = value.parse()?;
            }
            "output.format" => {
                if !["table", "json"].contains(&value) {
                    anyhow::bail!("Invalid output format: {}. Must be 'table' or 'json'", value);
                }
                self.output.format = value.to_string();
            }
            "output.colored" => {
                self.output.colored = value
                    .parse()
                    .with_context(|| format!("Invalid boolean value: {}", value))?;
            }
            "output.decimal_places" => {
                let places: u8 = value
                    .parse()
                    .with_context(|| format!("Invalid decimal places value: {}", value))?;
                if places > 10 {
                    anyhow::bail!("Decimal places must be between 0 and 10");
                }
                self.output.decimal_places = places;
            }
            "output.currency" => {
                if value.trim().is_empty() {
                    anyhow::bail!("Currency label cannot be empty");
                }
                self.output.currency = value.trim().to_uppercase();
            }
            "pricing.tariff_path" => {
                self.pricing.tariff_path = match value.trim() {
                    "" | "none" => None,
                    path => Some(path.to_string()),
                };
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }
}

/// Quote a value as a TOML string literal, escaping as needed.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    PathBuf::from(path)
}
