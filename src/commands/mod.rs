// Command handlers module
pub mod config;
pub mod estimate;
pub mod pricing;
pub mod sweep;

pub use config::handle_config_action;
pub use estimate::handle_estimate_command;
pub use pricing::{handle_cities_command, handle_pricing_action};
pub use sweep::{handle_compare_command, handle_sweep_command};

use crate::output::OutputFormat;

/// Output preferences resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub currency: String,
    pub decimal_places: u8,
    pub json: bool,
    pub colored: bool,
}

impl OutputOptions {
    pub fn render(&self, item: &impl OutputFormat) -> anyhow::Result<String> {
        if self.json {
            Ok(item.to_json()?)
        } else {
            Ok(item.to_table_with_currency(&self.currency, self.decimal_places, self.colored))
        }
    }
}

/// Print an error the way the rest of the output is formatted.
pub fn handle_error(error: &anyhow::Error, json_output: bool) {
    if json_output {
        let body = serde_json::json!({
            "status": "error",
            "message": format!("{:#}", error),
        });
        println!("{}", body);
    } else {
        eprintln!("Error: {:#}", error);
    }
}
