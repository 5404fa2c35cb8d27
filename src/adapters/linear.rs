use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::domain::ports::PricingModel;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};

/// `price = intercept + Σ coefficient[i] * feature[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<Vec<f64>>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            feature_importances: None,
        }
    }

    pub fn with_importances(mut self, importances: Vec<f64>) -> Self {
        self.feature_importances = Some(importances);
        self
    }
}

impl PricingModel for LinearModel {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(PricingError::invocation(format!(
                "linear model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }

        Ok(batch
            .iter()
            .map(|row| {
                row.to_row()
                    .iter()
                    .zip(&self.coefficients)
                    .fold(self.intercept, |acc, (x, w)| acc + x * w)
            })
            .collect())
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.feature_importances.clone()
    }

    fn kind(&self) -> &str {
        "linear"
    }
}
