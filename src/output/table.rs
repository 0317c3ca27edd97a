use serde::Serialize;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Style};
use tabled::{Table, Tabled};

use crate::analysis::{CityQuote, CurvePoint, Quote};
use crate::models::pricing::MULTIPLIER_SCALE;
use crate::models::{City, Kit, Role, Tariff};

/// Trait for items that can be displayed as tables or JSON
pub trait OutputFormat {
    fn to_table(&self) -> String {
        self.to_table_with_currency("COP", 0, false)
    }

    fn to_json(&self) -> Result<String, serde_json::Error>;

    fn to_table_with_currency(&self, currency: &str, decimal_places: u8, colored: bool) -> String;
}

#[derive(Tabled, Serialize, Debug)]
pub struct CostRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Tabled, Serialize, Debug)]
pub struct ResourceRow {
    #[tabled(rename = "Resource")]
    pub resource: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
}

#[derive(Tabled, Serialize, Debug)]
pub struct HeadlineRow {
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
    #[tabled(rename = "Cost / Applicant")]
    pub cost_per_applicant: String,
    #[tabled(rename = "Sites")]
    pub sites: String,
    #[tabled(rename = "Staff")]
    pub staff: String,
}

#[derive(Tabled, Serialize, Debug)]
pub struct CurvePointRow {
    #[tabled(rename = "Applicants")]
    pub applicants: String,
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
    #[tabled(rename = "Cost / Applicant")]
    pub cost_per_applicant: String,
    #[tabled(rename = "Sites")]
    pub sites: String,
    #[tabled(rename = "Printing Unit")]
    pub printing_unit: String,
}

#[derive(Tabled, Serialize, Debug)]
pub struct CityQuoteRow {
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Transport")]
    pub transport: String,
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
    #[tabled(rename = "Cost / Applicant")]
    pub cost_per_applicant: String,
}

#[derive(Tabled, Serialize, Debug)]
pub struct PriceRow {
    #[tabled(rename = "Item")]
    pub item: String,
    #[tabled(rename = "Unit Price")]
    pub unit_price: String,
}

/// Render rows with the shared table style; colored tables get a
/// highlighted header.
pub fn render_rows<T: Tabled>(rows: Vec<T>, colored: bool) -> String {
    let mut table = Table::new(rows);
    if colored {
        table.with(Style::rounded());
        table.modify(Rows::first(), Color::FG_CYAN);
    } else {
        table.with(Style::ascii());
    }
    table.to_string()
}

impl OutputFormat for Quote {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn to_table_with_currency(&self, currency: &str, decimal_places: u8, colored: bool) -> String {
        let headline = vec![HeadlineRow {
            total_cost: format_currency(self.summary.total_cost, currency),
            cost_per_applicant: format_currency_f64(
                self.summary.cost_per_applicant,
                currency,
                decimal_places,
            ),
            sites: format_number(self.summary.site_count),
            staff: format_number(self.summary.total_staff),
        }];

        let costs: Vec<CostRow> = self
            .breakdown
            .iter()
            .map(|share| CostRow {
                category: share.category.label().to_string(),
                amount: format_currency(share.amount, currency),
                share: format!("{:.1}%", share.share_pct),
            })
            .chain(std::iter::once(CostRow {
                category: "Total".to_string(),
                amount: format_currency(self.result.financial.total, currency),
                share: "100.0%".to_string(),
            }))
            .collect();

        let resources: Vec<ResourceRow> = self
            .resources
            .iter()
            .map(|line| ResourceRow {
                resource: line.resource.clone(),
                quantity: format_number(line.quantity),
            })
            .collect();

        format!(
            "Quote for {} applicants in {} ({})\n{}\n\nBudget distribution\n{}\n\nResources\n{}",
            format_number(self.request.applicant_count.max(0) as u64),
            self.request.city,
            self.request.modality,
            render_rows(headline, colored),
            render_rows(costs, colored),
            render_rows(resources, colored),
        )
    }
}

/// Wrapper for a cost curve to implement OutputFormat
#[derive(Debug, Clone, Serialize)]
pub struct CostCurve(pub Vec<CurvePoint>);

impl OutputFormat for CostCurve {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    fn to_table_with_currency(&self, currency: &str, decimal_places: u8, colored: bool) -> String {
        if self.0.is_empty() {
            return "No points in range.".to_string();
        }

        let rows: Vec<CurvePointRow> = self
            .0
            .iter()
            .map(|point| CurvePointRow {
                applicants: format_number(point.applicant_count),
                total_cost: format_currency(point.total_cost, currency),
                cost_per_applicant: format_currency_f64(
                    point.cost_per_applicant,
                    currency,
                    decimal_places,
                ),
                sites: format_number(point.site_count),
                printing_unit: format_currency(point.printing_unit_price, currency),
            })
            .collect();

        render_rows(rows, colored)
    }
}

/// Wrapper for a per-city comparison to implement OutputFormat
#[derive(Debug, Clone, Serialize)]
pub struct CityComparison(pub Vec<CityQuote>);

impl OutputFormat for CityComparison {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    fn to_table_with_currency(&self, currency: &str, decimal_places: u8, colored: bool) -> String {
        let rows: Vec<CityQuoteRow> = self
            .0
            .iter()
            .map(|quote| CityQuoteRow {
                city: quote.city.to_string(),
                transport: format_currency(quote.transport_cost, currency),
                total_cost: format_currency(quote.total_cost, currency),
                cost_per_applicant: format_currency_f64(
                    quote.cost_per_applicant,
                    currency,
                    decimal_places,
                ),
            })
            .collect();

        render_rows(rows, colored)
    }
}

impl OutputFormat for Tariff {
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn to_table_with_currency(&self, currency: &str, _decimal_places: u8, colored: bool) -> String {
        let pricing = &self.pricing;
        let mut rows: Vec<PriceRow> = Role::ALL
            .into_iter()
            .map(|role| PriceRow {
                item: role.label().to_string(),
                unit_price: format_currency(pricing.roles.get(role), currency),
            })
            .collect();

        rows.extend(Kit::ALL.into_iter().map(|kit| PriceRow {
            item: kit.label().to_string(),
            unit_price: format_currency(pricing.kits.get(kit), currency),
        }));

        rows.extend(pricing.printing.steps().iter().map(|tier| PriceRow {
            item: format!("Printing, up to {} applicants", format_number(tier.up_to)),
            unit_price: format_currency(tier.value, currency),
        }));
        rows.push(PriceRow {
            item: "Printing, above".to_string(),
            unit_price: format_currency(pricing.printing.above(), currency),
        });

        rows.push(PriceRow {
            item: "Transport per site".to_string(),
            unit_price: format_currency(pricing.transport.base_per_site, currency),
        });
        rows.extend(City::ALL.into_iter().map(|city| PriceRow {
            item: format!("Transport multiplier, {}", city),
            unit_price: format_multiplier(pricing.transport.multiplier_bps(city)),
        }));

        let staffing = &self.staffing;
        let ratios = vec![
            ResourceRow {
                resource: "Applicants per site".to_string(),
                quantity: format_number(staffing.applicants_per_site.get()),
            },
            ResourceRow {
                resource: "Applicants per room".to_string(),
                quantity: format_number(staffing.applicants_per_room.get()),
            },
            ResourceRow {
                resource: "Rooms per fingerprint technician".to_string(),
                quantity: format_number(staffing.rooms_per_fingerprint_technician.get()),
            },
            ResourceRow {
                resource: "Rooms per room coordinator".to_string(),
                quantity: format_number(staffing.rooms_per_room_coordinator.get()),
            },
            ResourceRow {
                resource: "Rooms per cleaning staff".to_string(),
                quantity: format_number(staffing.rooms_per_cleaning_staff.get()),
            },
            ResourceRow {
                resource: "Security staff per site".to_string(),
                quantity: format_number(staffing.security_staff_per_site),
            },
            ResourceRow {
                resource: "Room chiefs per room (written)".to_string(),
                quantity: format_number(staffing.room_chiefs_per_room_written),
            },
            ResourceRow {
                resource: "Room chiefs per room (virtual)".to_string(),
                quantity: format_number(staffing.room_chiefs_per_room_virtual),
            },
        ];

        format!(
            "Unit prices\n{}\n\nStaffing ratios\n{}",
            render_rows(rows, colored),
            render_rows(ratios, colored)
        )
    }
}

/// Format a number with commas for thousands separator
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }

    result
}

fn currency_symbol(currency: &str) -> &str {
    match currency {
        "COP" | "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        _ => currency,
    }
}

/// Whole-unit amount with thousands separators, e.g. `$11,465,515`.
pub fn format_currency(amount: u64, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    if symbol == currency {
        format!("{} {}", format_number(amount), currency)
    } else {
        format!("{}{}", symbol, format_number(amount))
    }
}

/// Fractional amount (per-applicant figures), rounded to `decimal_places`.
pub fn format_currency_f64(amount: f64, currency: &str, decimal_places: u8) -> String {
    let formatted = format!("{:.width$}", amount.max(0.0), width = decimal_places as usize);
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = whole
        .parse::<u64>()
        .map(format_number)
        .unwrap_or_else(|_| whole.to_string());
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let symbol = currency_symbol(currency);
    if symbol == currency {
        format!("{} {}", grouped, currency)
    } else {
        format!("{}{}", symbol, grouped)
    }
}

/// Basis points as a multiplier, e.g. `18000` -> `x1.80`.
pub fn format_multiplier(bps: u64) -> String {
    format!(
        "x{}.{:02}",
        bps / MULTIPLIER_SCALE,
        (bps % MULTIPLIER_SCALE) / (MULTIPLIER_SCALE / 100)
    )
}
