use crate::app::render::OutputFormat;
use crate::config::toml_config::{PricingConfig, DEFAULT_CONFIG_FILE};
use crate::config::Settings;
use crate::domain::model::{DemandLevel, ProductCategory, RawInputs};
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "pricing-engine")]
#[command(about = "Predict an optimal selling price from product attributes")]
#[command(allow_negative_numbers = true)]
pub struct CliConfig {
    /// Product category (display only)
    #[arg(long, value_enum, default_value_t = ProductCategory::Electronics)]
    pub category: ProductCategory,

    /// Shipping cost
    #[arg(long, default_value_t = 120.0)]
    pub shipping_cost: f64,

    /// Product weight in grams
    #[arg(long = "weight", default_value_t = 500.0)]
    pub weight_grams: f64,

    /// Customer rating, 1.0 to 5.0
    #[arg(long, default_value_t = 4.0)]
    pub review_score: f64,

    #[arg(long, default_value_t = 150.0)]
    pub competitor_price: f64,

    /// Demand level (display only)
    #[arg(long, value_enum, default_value_t = DemandLevel::Low)]
    pub demand_level: DemandLevel,

    /// Purchase month, 1 to 12
    #[arg(long, default_value_t = 7)]
    pub month: u32,

    /// Purchase year, 2015 to 2025
    #[arg(long, default_value_t = 2015)]
    pub year: u32,

    /// Your current selling price, compared against the estimate
    #[arg(long, default_value_t = 120.0)]
    pub current_price: f64,

    /// Model artifact path (overrides the config file)
    #[arg(long)]
    pub model: Option<String>,

    /// TOML configuration file; `pricing.toml` is used when present
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Prompt for inputs repeatedly against the loaded model
    #[arg(short, long)]
    pub interactive: bool,

    /// Show the derived features without loading the model
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log CPU and memory usage
    #[arg(long)]
    pub monitor: bool,

    #[arg(long)]
    pub no_color: bool,
}

impl CliConfig {
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            category: self.category,
            shipping_cost: self.shipping_cost,
            weight_grams: self.weight_grams,
            review_score: self.review_score,
            competitor_price: self.competitor_price,
            demand_level: self.demand_level,
            month: self.month,
            year: self.year,
            current_price: self.current_price,
        }
    }

    /// The explicit `--config` file, or `pricing.toml` when it exists.
    pub fn load_file_config(&self) -> Result<Option<PricingConfig>> {
        match &self.config {
            Some(path) => PricingConfig::from_file(path).map(Some),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                PricingConfig::from_file(DEFAULT_CONFIG_FILE).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Layers the flags on top of the file settings.
    pub fn settings(&self, file: Option<&PricingConfig>) -> Settings {
        let mut settings = file.map(Settings::from_file_config).unwrap_or_default();

        if let Some(model) = &self.model {
            settings.model_path = model.clone();
        }
        if self.monitor {
            settings.monitoring = true;
        }
        if self.no_color {
            settings.color = false;
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_defaults() {
        let cli = CliConfig::parse_from(["pricing-engine"]);
        assert_eq!(cli.raw_inputs(), RawInputs::default());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_flags_populate_inputs() {
        let cli = CliConfig::parse_from([
            "pricing-engine",
            "--category",
            "sports",
            "--shipping-cost",
            "0",
            "--weight",
            "750",
            "--review-score",
            "3.5",
            "--competitor-price",
            "99.5",
            "--demand-level",
            "high",
            "--month",
            "12",
            "--year",
            "2024",
            "--current-price",
            "80",
        ]);

        let raw = cli.raw_inputs();
        assert_eq!(raw.category, ProductCategory::Sports);
        assert_eq!(raw.shipping_cost, 0.0);
        assert_eq!(raw.weight_grams, 750.0);
        assert_eq!(raw.review_score, 3.5);
        assert_eq!(raw.competitor_price, 99.5);
        assert_eq!(raw.demand_level, DemandLevel::High);
        assert_eq!(raw.month, 12);
        assert_eq!(raw.year, 2024);
        assert_eq!(raw.current_price, 80.0);
    }

    #[test]
    fn test_flags_override_file_settings() {
        let file = PricingConfig::from_toml_str(
            r#"
[model]
path = "from-file.json"

[display]
color = true
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "pricing-engine",
            "--model",
            "from-flag.json",
            "--no-color",
            "--monitor",
        ]);
        let settings = cli.settings(Some(&file));

        assert_eq!(settings.model_path, "from-flag.json");
        assert!(!settings.color);
        assert!(settings.monitoring);
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = CliConfig::parse_from(["pricing-engine", "--shipping-cost", "-5"]);
        assert_eq!(cli.raw_inputs().shipping_cost, -5.0);
    }
}
