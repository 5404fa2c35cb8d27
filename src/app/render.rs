use crate::core::ConfigProvider;
use crate::domain::model::{DeltaTone, Estimate, FeatureVector, ImportanceReport, RawInputs};
use crate::utils::error::{PricingError, Result};
use colored::Colorize;
use std::fmt::Write;

pub const IMPORTANCE_FALLBACK: &str = "Feature importance not available.";
pub const TITLE: &str = "Dynamic Pricing Engine";
pub const SUBTITLE: &str = "Predict optimal selling price using demand signals, seasonality, \
product attributes, and competitor benchmarks.";

/// Headroom on the chart axis, so the longest bar never fills the full width.
const AXIS_HEADROOM: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    currency_symbol: String,
    chart_width: usize,
    color: bool,
}

impl Renderer {
    pub fn new(config: &impl ConfigProvider) -> Self {
        Self {
            currency_symbol: config.currency_symbol().to_string(),
            chart_width: config.chart_width(),
            color: config.color_enabled(),
        }
    }

    pub fn render(&self, estimate: &Estimate, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text(estimate)),
            OutputFormat::Json => render_json(estimate),
        }
    }

    pub fn money(&self, value: f64) -> String {
        format!("{} {:.2}", self.currency_symbol, value)
    }

    pub fn render_text(&self, estimate: &Estimate) -> String {
        let prediction = &estimate.prediction;
        let mut out = String::new();

        let headline = self.money(prediction.estimate);
        let delta = format!("{} {:+.2}", self.currency_symbol, prediction.delta.value);
        let (headline, delta) = if self.color {
            let delta = match prediction.delta.tone {
                DeltaTone::Gain => delta.green().bold(),
                DeltaTone::Loss => delta.red().bold(),
            };
            (headline.bright_green().bold().to_string(), delta.to_string())
        } else {
            (headline, delta)
        };

        out.push_str(&self.render_header());
        let _ = writeln!(out, "Optimal Price Prediction");
        let _ = writeln!(out, "  {}", headline);
        let _ = writeln!(out, "  Recommended Optimal Selling Price");
        let _ = writeln!(out, "  Difference vs current price: {}", delta);
        let _ = writeln!(out);
        out.push_str(&self.render_insights(estimate.importance.as_ref()));

        out
    }

    /// Text page for a prediction that failed. The importance panel does not
    /// depend on the prediction, so it is still shown.
    pub fn render_failure(
        &self,
        error: &PricingError,
        importance: Option<&ImportanceReport>,
    ) -> String {
        let message = format!("❌ {}", error.user_friendly_message());
        let message = if self.color {
            message.red().to_string()
        } else {
            message
        };

        let mut out = self.render_header();
        let _ = writeln!(out, "Optimal Price Prediction");
        let _ = writeln!(out, "  {}", message);
        let _ = writeln!(out);
        out.push_str(&self.render_insights(importance));
        out
    }

    pub fn render_header(&self) -> String {
        let title = if self.color {
            TITLE.bold().to_string()
        } else {
            TITLE.to_string()
        };
        let subtitle = if self.color {
            SUBTITLE.dimmed().to_string()
        } else {
            SUBTITLE.to_string()
        };
        format!("{}
{}

", title, subtitle)
    }

    fn render_insights(&self, importance: Option<&ImportanceReport>) -> String {
        let mut out = String::from("Key Insights (Model Feature Importance)\n");
        out.push_str(&self.render_importance(importance));
        out
    }

    /// Horizontal bars, smallest weight first. Bar length is scaled against
    /// `max_weight * 1.1`.
    pub fn render_importance(&self, report: Option<&ImportanceReport>) -> String {
        let report = match report {
            Some(r) if !r.is_empty() => r,
            _ => return format!("  {}\n", IMPORTANCE_FALLBACK),
        };

        let axis_max = report.max_weight() * AXIS_HEADROOM;
        let label_width = report
            .entries()
            .iter()
            .map(|e| e.feature.len())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for entry in report.entries() {
            let cells = if axis_max > 0.0 {
                ((entry.weight / axis_max) * self.chart_width as f64).round() as usize
            } else {
                0
            };
            let bar = "█".repeat(cells.min(self.chart_width));
            let bar = if self.color {
                bar.cyan().to_string()
            } else {
                bar
            };
            let padding = " ".repeat(self.chart_width - cells.min(self.chart_width));
            let _ = writeln!(
                out,
                "  {:<label_width$}  {}{}  {:.3}",
                entry.feature,
                bar,
                padding,
                entry.weight,
                label_width = label_width
            );
        }
        out
    }

    pub fn render_dry_run(
        &self,
        raw: &RawInputs,
        features: &FeatureVector,
        config: &impl ConfigProvider,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "🔍 Dry Run Analysis:");
        let _ = writeln!(out, "  Model: {} (not loaded)", config.model_path());
        let _ = writeln!(out, "  Category: {} (display only)", raw.category);
        let _ = writeln!(out, "  Demand Level: {} (display only)", raw.demand_level);
        let _ = writeln!(out, "  Current Price: {}", self.money(raw.current_price));
        let _ = writeln!(out);
        let _ = writeln!(out, "🔄 Feature Vector:");
        for (name, value) in features.named_values() {
            let _ = writeln!(out, "  {:<20} {}", name, value);
        }
        out
    }
}

pub fn render_json(estimate: &Estimate) -> Result<String> {
    Ok(serde_json::to_string_pretty(estimate)?)
}
