//! On-disk model artifact: a versioned JSON envelope around one model kind.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["freight_value", "review_score", "month", "year",
//!                     "price_freight_ratio", "weight_price_ratio"],
//!   "model": { "kind": "linear", "intercept": 12.0, "coefficients": [...] }
//! }
//! ```

use crate::adapters::linear::LinearModel;
use crate::adapters::random_forest::RandomForestModel;
use crate::adapters::tree_ensemble::TreeEnsemble;
use crate::domain::model::{FeatureVector, FEATURE_NAMES};
use crate::domain::ports::PricingModel;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
    RandomForest(RandomForestModel),
}

#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Column order the model was trained on, when the exporter recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub model: ModelSpec,
}

impl ModelArtifact {
    pub fn new(model: ModelSpec) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feature_names: Some(FEATURE_NAMES.iter().map(|n| n.to_string()).collect()),
            model,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the envelope and turns it into a queryable model. `source` names
    /// the artifact in load errors.
    pub fn into_model(self, source: &str) -> Result<Arc<dyn PricingModel>> {
        let load_error = |reason: String| PricingError::ModelLoadError {
            path: source.to_string(),
            reason,
        };

        if self.format_version != FORMAT_VERSION {
            return Err(load_error(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let inner: Box<dyn PricingModel> = match self.model {
            ModelSpec::Linear(linear) => Box::new(linear),
            ModelSpec::TreeEnsemble(ensemble) => {
                ensemble.check_structure().map_err(load_error)?;
                Box::new(ensemble)
            }
            ModelSpec::RandomForest(forest) => {
                // smartcore indexes columns without bounds reporting, so the
                // forest needs both a column list and a trial prediction.
                if self.feature_names.is_none() {
                    return Err(load_error(
                        "random_forest artifacts must declare feature_names".to_string(),
                    ));
                }
                forest.check_structure().map_err(load_error)?;
                Box::new(forest)
            }
        };

        Ok(match self.feature_names {
            Some(trained_on) => Arc::new(ColumnChecked::new(inner, trained_on)),
            None => Arc::from(inner),
        })
    }
}

/// Reads and validates a model artifact from disk.
pub fn load_model_file(path: &Path) -> Result<Arc<dyn PricingModel>> {
    let source = path.display().to_string();
    let load_error = |reason: String| PricingError::ModelLoadError {
        path: source.clone(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| load_error(format!("not a valid model artifact: {}", e)))?;

    artifact.into_model(&source)
}

/// Refuses to predict when the artifact's recorded columns differ from the
/// fixed feature order.
struct ColumnChecked {
    inner: Box<dyn PricingModel>,
    mismatch: Option<String>,
}

impl ColumnChecked {
    fn new(inner: Box<dyn PricingModel>, trained_on: Vec<String>) -> Self {
        let matches = trained_on.len() == FEATURE_NAMES.len()
            && trained_on.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b);

        let mismatch = (!matches).then(|| {
            format!(
                "model was trained on [{}], expected [{}]",
                trained_on.join(", "),
                FEATURE_NAMES.join(", ")
            )
        });
        if let Some(m) = &mismatch {
            tracing::warn!("Feature schema mismatch: {}", m);
        }

        Self { inner, mismatch }
    }
}

impl PricingModel for ColumnChecked {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        if let Some(m) = &self.mismatch {
            return Err(PricingError::invocation(m.clone()));
        }
        self.inner.predict(batch)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        self.inner.feature_importances()
    }

    fn kind(&self) -> &str {
        self.inner.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FEATURE_COUNT;

    fn row() -> FeatureVector {
        FeatureVector {
            freight_value: 1.0,
            review_score: 1.0,
            month: 1,
            year: 1,
            price_freight_ratio: 1.0,
            weight_price_ratio: 1.0,
        }
    }

    #[test]
    fn test_parse_linear_artifact() {
        let json = r#"{
            "format_version": 1,
            "model": {
                "kind": "linear",
                "intercept": 2.0,
                "coefficients": [1, 1, 1, 1, 1, 1],
                "feature_importances": [0.4, 0.1, 0.05, 0.05, 0.3, 0.1]
            }
        }"#;
        let model = ModelArtifact::from_json_str(json)
            .unwrap()
            .into_model("inline")
            .unwrap();

        assert_eq!(model.kind(), "linear");
        assert_eq!(model.predict(&[row()]).unwrap(), vec![8.0]);
        assert_eq!(model.feature_importances().unwrap().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let json = r#"{"format_version": 1, "model": {"kind": "svm", "c": 1.0}}"#;
        assert!(ModelArtifact::from_json_str(json).is_err());
    }

    #[test]
    fn test_future_format_version_is_load_error() {
        let mut artifact = ModelArtifact::new(ModelSpec::Linear(LinearModel::new(
            0.0,
            vec![0.0; FEATURE_COUNT],
        )));
        artifact.format_version = 2;
        let err = artifact.into_model("v2.json").err().unwrap();
        assert!(matches!(err, PricingError::ModelLoadError { .. }));
    }

    #[test]
    fn test_reordered_columns_fail_at_predict() {
        let mut artifact = ModelArtifact::new(ModelSpec::Linear(LinearModel::new(
            0.0,
            vec![1.0; FEATURE_COUNT],
        )));
        if let Some(names) = artifact.feature_names.as_mut() {
            names.swap(2, 3);
        }

        let model = artifact.into_model("swapped.json").unwrap();
        let err = model.predict(&[row()]).unwrap_err();
        assert!(matches!(err, PricingError::ModelInvocationError { .. }));
        assert!(err.to_string().contains("year, month"));
    }

    #[test]
    fn test_round_trip_keeps_kind() {
        let artifact = ModelArtifact::new(ModelSpec::Linear(LinearModel::new(
            3.0,
            vec![0.5; FEATURE_COUNT],
        )));
        let json = artifact.to_json_string().unwrap();
        assert!(json.contains("\"kind\": \"linear\""));
        let model = ModelArtifact::from_json_str(&json)
            .unwrap()
            .into_model("round-trip")
            .unwrap();
        assert_eq!(model.predict(&[row()]).unwrap(), vec![6.0]);
    }
}
