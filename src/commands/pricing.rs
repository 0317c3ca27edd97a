// Pricing and cities command handlers
use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use super::OutputOptions;
use crate::cli::PricingAction;
use crate::config::expand_home;
use crate::models::{City, Tariff};
use crate::output::render_rows;
use crate::output::table::format_multiplier;

pub fn handle_pricing_action(
    action: PricingAction,
    tariff: &Tariff,
    output: &OutputOptions,
) -> Result<()> {
    match action {
        PricingAction::Show => {
            println!("{}", output.render(tariff)?);
        }
        PricingAction::Export { path } => {
            let path = expand_home(&path);
            tariff.save(&path)?;
            if output.json {
                let body = serde_json::json!({
                    "status": "success",
                    "message": format!("Tariff written to {}", path.display()),
                });
                println!("{}", body);
            } else {
                println!("Tariff written to: {}", path.display());
            }
        }
    }
    Ok(())
}

#[derive(Tabled, Serialize, Debug, PartialEq)]
pub struct CityRow {
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Capital")]
    pub capital: bool,
    #[tabled(rename = "Transport Multiplier")]
    pub multiplier: String,
}

pub fn city_rows(tariff: &Tariff) -> Vec<CityRow> {
    City::ALL
        .into_iter()
        .map(|city| CityRow {
            city: city.to_string(),
            capital: city.is_capital(),
            multiplier: format_multiplier(tariff.pricing.transport.multiplier_bps(city)),
        })
        .collect()
}

pub fn handle_cities_command(tariff: &Tariff, output: &OutputOptions) -> Result<()> {
    let rows = city_rows(tariff);
    if output.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", render_rows(rows, output.colored));
    }
    Ok(())
}
