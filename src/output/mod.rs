// Output module
pub mod export;
pub mod table;

pub use export::{ExportFormat, QuoteReport, export_quote};
pub use table::{
    CityComparison, CostCurve, OutputFormat, format_currency, format_currency_f64, format_number,
    render_rows,
};
