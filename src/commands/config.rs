// Config command handler
use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::ConfigAction;
use crate::config::Config;

fn print_success(message: &str, json_output: bool) {
    if json_output {
        let body = serde_json::json!({ "status": "success", "message": message });
        println!("{}", body);
    } else {
        println!("{}", message);
    }
}

pub fn handle_config_action(action: ConfigAction, config_path: &Path, json_output: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::default()
                .save_to(config_path)
                .context("Failed to initialize config")?;
            print_success(
                &format!("Configuration initialized at: {}", config_path.display()),
                json_output,
            );
        }
        ConfigAction::Show => {
            let config = Config::load_from(config_path).context("Failed to load config")?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let toml_str =
                    toml::to_string_pretty(&config).context("Failed to serialize config")?;
                println!("Configuration ({})", config_path.display());
                println!("{}", toml_str);
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(config_path).context("Failed to load config")?;
            config
                .set_value(&key, &value)
                .context("Invalid configuration")?;
            config.save_to(config_path).context("Failed to save config")?;
            print_success(&format!("Configuration updated: {} = {}", key, value), json_output);
        }
    }
    Ok(())
}
