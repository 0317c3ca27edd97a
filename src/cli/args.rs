use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "excost")]
#[command(about = "Exam logistics cost estimator")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Tariff file overriding the configured or built-in prices
    #[arg(long, global = true)]
    pub tariff: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable colorized table output
    #[arg(long, global = true)]
    pub colored: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., general.default_city)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PricingAction {
    /// Show unit prices and staffing ratios in effect
    Show,
    /// Write the tariff in effect to a TOML file for editing
    Export {
        /// Destination path
        path: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate logistics and costs for one exam
    Estimate {
        /// Number of applicants
        #[arg(allow_negative_numbers = true, required_unless_present = "request")]
        applicants: Option<i64>,

        /// City where the exam takes place
        #[arg(long)]
        city: Option<String>,

        /// Exam modality (escrita or virtual)
        #[arg(long)]
        modality: Option<String>,

        /// JSON request file: {"applicant_count", "city", "modality"}
        #[arg(long, conflicts_with_all = ["applicants", "city", "modality"])]
        request: Option<String>,

        /// Write the quote report to this path
        #[arg(long)]
        export: Option<String>,

        /// Export format (json or csv); defaults to the file extension
        #[arg(long, requires = "export")]
        format: Option<String>,
    },

    /// Evaluate total cost over a range of applicant counts
    Sweep {
        /// First applicant count
        #[arg(long, default_value = "100")]
        from: u64,

        /// Last applicant count (inclusive)
        #[arg(long, default_value = "5000")]
        to: u64,

        /// Distance between samples
        #[arg(long, default_value = "50")]
        step: u64,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        modality: Option<String>,
    },

    /// Price the same exam in every supported city
    Compare {
        /// Number of applicants
        #[arg(allow_negative_numbers = true)]
        applicants: i64,

        #[arg(long)]
        modality: Option<String>,
    },

    /// List supported cities and their transport multipliers
    Cities,

    /// Inspect or export the tariff
    Pricing {
        #[command(subcommand)]
        action: PricingAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}
