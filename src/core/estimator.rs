use crate::core::features::derive_features;
use crate::core::model_handle::ModelHandle;
use crate::domain::model::{
    DeltaTone, Estimate, FeatureVector, ImportanceEntry, ImportanceReport, PredictionResult,
    PriceDelta, RawInputs, FEATURE_COUNT, FEATURE_NAMES,
};
use crate::domain::ports::PricingModel;
use crate::utils::error::{PricingError, Result};

/// Prices a single row. The model sees exactly one row in `FEATURE_NAMES` order.
pub fn predict(model: &dyn PricingModel, features: &FeatureVector) -> Result<f64> {
    let predictions = model.predict(std::slice::from_ref(features))?;

    let estimate = match predictions.as_slice() {
        [single] => *single,
        other => {
            return Err(PricingError::invocation(format!(
                "expected 1 prediction for 1 row, got {}",
                other.len()
            )))
        }
    };

    if !estimate.is_finite() {
        return Err(PricingError::invocation(format!(
            "model returned a non-finite estimate ({})",
            estimate
        )));
    }
    Ok(estimate)
}

/// `predicted - current`; zero counts as a gain.
pub fn compute_delta(predicted: f64, current: f64) -> PriceDelta {
    let value = predicted - current;
    let tone = if value >= 0.0 {
        DeltaTone::Gain
    } else {
        DeltaTone::Loss
    };
    PriceDelta { value, tone }
}

/// Pairs the model's importance array with the fixed feature names by
/// position and sorts ascending.
pub fn feature_importance(model: &dyn PricingModel) -> Result<ImportanceReport> {
    let weights = model.feature_importances().ok_or_else(|| {
        PricingError::importance_unavailable(format!(
            "{} models do not report feature importances",
            model.kind()
        ))
    })?;

    if weights.len() != FEATURE_COUNT {
        return Err(PricingError::importance_unavailable(format!(
            "model reported {} importances for {} features",
            weights.len(),
            FEATURE_COUNT
        )));
    }
    if let Some(bad) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
        return Err(PricingError::importance_unavailable(format!(
            "importance weight {} is not a non-negative number",
            bad
        )));
    }

    let entries = FEATURE_NAMES
        .iter()
        .zip(weights)
        .map(|(name, weight)| ImportanceEntry {
            feature: name.to_string(),
            weight,
        })
        .collect();

    Ok(ImportanceReport::from_unsorted(entries))
}

/// Runs the full form-to-price flow against one shared model.
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    handle: ModelHandle,
}

impl PriceEstimator {
    pub fn new(handle: ModelHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// A `ModelInvocationError` fails the whole estimate. Missing importances
    /// only leave `importance` empty.
    pub fn estimate(&self, raw: &RawInputs) -> Result<Estimate> {
        let model = self.handle.model();
        let features = derive_features(raw);
        tracing::debug!(?features, "Derived feature vector");

        let estimate = predict(model, &features)?;
        let delta = compute_delta(estimate, raw.current_price);
        tracing::info!(
            "Estimated price {:.2} (current {:.2}, delta {:+.2})",
            estimate,
            raw.current_price,
            delta.value
        );

        let importance = match feature_importance(model) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::debug!("Skipping importance chart: {}", e);
                None
            }
        };

        Ok(Estimate {
            inputs: raw.clone(),
            features,
            prediction: PredictionResult {
                estimate,
                current_price: raw.current_price,
                delta,
            },
            importance,
        })
    }
}
