//! Interactive prompt loop: the form is filled in on stdin, every "Predict"
//! reuses the one model loaded at startup.

use crate::app::render::{OutputFormat, Renderer};
use crate::core::estimator::{feature_importance, PriceEstimator};
use crate::domain::model::{DemandLevel, ProductCategory, RawInputs};
use crate::utils::error::{PricingError, Result};
use crate::utils::monitor::ResourceMonitor;
use crate::utils::validation::Validate;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Category,
    ShippingCost,
    Weight,
    ReviewScore,
    CompetitorPrice,
    DemandLevel,
    Month,
    Year,
    CurrentPrice,
}

impl FormField {
    const ORDER: [FormField; 9] = [
        FormField::Category,
        FormField::ShippingCost,
        FormField::Weight,
        FormField::ReviewScore,
        FormField::CompetitorPrice,
        FormField::DemandLevel,
        FormField::Month,
        FormField::Year,
        FormField::CurrentPrice,
    ];

    fn label(self) -> &'static str {
        match self {
            FormField::Category => "Product Category",
            FormField::ShippingCost => "Shipping Cost",
            FormField::Weight => "Product Weight (grams)",
            FormField::ReviewScore => "Customer Rating (1-5)",
            FormField::CompetitorPrice => "Competitor Price",
            FormField::DemandLevel => "Demand Level",
            FormField::Month => "Purchase Month",
            FormField::Year => "Purchase Year (2015-2025)",
            FormField::CurrentPrice => "Your Current Selling Price",
        }
    }

    fn current(self, raw: &RawInputs) -> String {
        match self {
            FormField::Category => raw.category.to_string(),
            FormField::ShippingCost => raw.shipping_cost.to_string(),
            FormField::Weight => raw.weight_grams.to_string(),
            FormField::ReviewScore => raw.review_score.to_string(),
            FormField::CompetitorPrice => raw.competitor_price.to_string(),
            FormField::DemandLevel => raw.demand_level.to_string(),
            FormField::Month => raw.month.to_string(),
            FormField::Year => raw.year.to_string(),
            FormField::CurrentPrice => raw.current_price.to_string(),
        }
    }

    fn apply(self, raw: &mut RawInputs, text: &str) -> std::result::Result<(), String> {
        let text = text.trim();
        let number = || {
            text.parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", text))
        };
        let integer = || {
            text.parse::<u32>()
                .map_err(|_| format!("'{}' is not a whole number", text))
        };

        match self {
            FormField::Category => {
                raw.category = ProductCategory::parse(text).ok_or_else(|| {
                    let options: Vec<_> = ProductCategory::ALL.iter().map(|c| c.to_string()).collect();
                    format!("choose one of: {}", options.join(", "))
                })?
            }
            FormField::DemandLevel => {
                raw.demand_level = DemandLevel::parse(text)
                    .ok_or_else(|| "choose one of: Low, Medium, High".to_string())?
            }
            FormField::ShippingCost => raw.shipping_cost = number()?,
            FormField::Weight => raw.weight_grams = number()?,
            FormField::ReviewScore => raw.review_score = number()?,
            FormField::CompetitorPrice => raw.competitor_price = number()?,
            FormField::CurrentPrice => raw.current_price = number()?,
            FormField::Month => raw.month = integer()?,
            FormField::Year => raw.year = integer()?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub failures: usize,
}

pub struct Session<'a, R, W> {
    estimator: &'a PriceEstimator,
    renderer: &'a Renderer,
    monitor: &'a ResourceMonitor,
    format: OutputFormat,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        estimator: &'a PriceEstimator,
        renderer: &'a Renderer,
        monitor: &'a ResourceMonitor,
        format: OutputFormat,
        input: R,
        output: W,
    ) -> Self {
        Self {
            estimator,
            renderer,
            monitor,
            format,
            input,
            output,
        }
    }

    /// Runs rounds until the user declines another prediction or input ends.
    /// `start` must already be valid; its values are the first round's defaults.
    pub fn run(mut self, start: RawInputs) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut raw = start;

        loop {
            raw = match self.fill_form(raw)? {
                Some(filled) => filled,
                None => break,
            };

            match self.estimator.estimate(&raw) {
                Ok(estimate) => {
                    summary.predictions += 1;
                    let rendered = self.renderer.render(&estimate, self.format)?;
                    writeln!(self.output, "\n{}", rendered)?;
                }
                Err(e @ PricingError::ModelInvocationError { .. }) => {
                    summary.failures += 1;
                    tracing::error!("❌ {}", e);
                    match self.format {
                        OutputFormat::Text => {
                            let importance = feature_importance(self.estimator.handle().model());
                            let page = self.renderer.render_failure(&e, importance.ok().as_ref());
                            writeln!(self.output, "\n{}", page)?;
                        }
                        OutputFormat::Json => {
                            writeln!(self.output, "❌ {}", e.user_friendly_message())?
                        }
                    }
                }
                Err(e) => return Err(e),
            }
            self.monitor.log_phase("Prediction");

            match self.prompt("Predict again? [Y/n]: ")? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("n")
                    || answer.trim().eq_ignore_ascii_case("no") =>
                {
                    break
                }
                Some(_) => continue,
                None => break,
            }
        }

        tracing::info!(
            "Session finished: {} predictions, {} failed",
            summary.predictions,
            summary.failures
        );
        Ok(summary)
    }

    /// `None` when input ends mid-form.
    fn fill_form(&mut self, mut raw: RawInputs) -> Result<Option<RawInputs>> {
        for field in FormField::ORDER {
            loop {
                let question = format!("{} [{}]: ", field.label(), field.current(&raw));
                let line = match self.prompt(&question)? {
                    Some(line) => line,
                    None => return Ok(None),
                };
                if line.trim().is_empty() {
                    break;
                }

                let mut candidate = raw.clone();
                let outcome = field
                    .apply(&mut candidate, &line)
                    .and_then(|_| candidate.validate().map_err(|e| e.to_string()));
                match outcome {
                    Ok(()) => {
                        raw = candidate;
                        break;
                    }
                    Err(reason) => writeln!(self.output, "  ⚠️  {}", reason)?,
                }
            }
        }
        Ok(Some(raw))
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
