#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::PricingConfig;

pub const DEFAULT_MODEL_PATH: &str = "pricing_model.json";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
pub const DEFAULT_CHART_WIDTH: usize = 40;

/// Effective settings after layering defaults, the TOML file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: String,
    pub currency_symbol: String,
    pub chart_width: usize,
    pub color: bool,
    pub monitoring: bool,
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            chart_width: DEFAULT_CHART_WIDTH,
            color: true,
            monitoring: false,
            json_logs: false,
        }
    }
}

impl Settings {
    pub fn from_file_config(file: &PricingConfig) -> Self {
        let mut settings = Self::default();

        if let Some(path) = file.model_path() {
            settings.model_path = path.to_string();
        }
        if let Some(display) = &file.display {
            if let Some(symbol) = &display.currency_symbol {
                settings.currency_symbol = symbol.clone();
            }
            if let Some(width) = display.chart_width {
                settings.chart_width = width;
            }
            if let Some(color) = display.color {
                settings.color = color;
            }
        }
        settings.monitoring = file.monitoring_enabled();
        settings.json_logs = file.json_logs();

        settings
    }

    /// Colour stays on only when stdout is a terminal, so piped output has
    /// no ANSI escapes.
    pub fn for_terminal(mut self, stdout_is_terminal: bool) -> Self {
        self.color &= stdout_is_terminal;
        self
    }
}

impl ConfigProvider for Settings {
    fn model_path(&self) -> &str {
        &self.model_path
    }

    fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    fn chart_width(&self) -> usize {
        self.chart_width
    }

    fn color_enabled(&self) -> bool {
        self.color
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("model.path", &self.model_path)?;
        validation::validate_non_empty_string("display.currency_symbol", &self.currency_symbol)?;
        validation::validate_positive_number(
            "display.chart_width",
            self.chart_width,
            validation::CHART_WIDTH_RANGE.0,
            validation::CHART_WIDTH_RANGE.1,
        )?;
        Ok(())
    }
}
