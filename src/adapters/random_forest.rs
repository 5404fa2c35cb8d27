use crate::domain::model::{FeatureVector, FEATURE_COUNT};
use crate::domain::ports::PricingModel;
use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::panic::{self, AssertUnwindSafe};

pub type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// A smartcore random forest. smartcore does not expose per-feature
/// importances for forests, so this model always reports none.
#[derive(Serialize, Deserialize)]
pub struct RandomForestModel {
    pub model: ForestRegressor,
}

impl RandomForestModel {
    pub fn new(model: ForestRegressor) -> Self {
        Self { model }
    }

    /// Runs one all-zero row through the forest. smartcore indexes split
    /// columns unchecked, so a tampered `split_feature` shows up here as a
    /// panic instead of an error.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        self.predict_rows(vec![vec![0.0; FEATURE_COUNT]])
            .map(|_| ())
            .map_err(|e| format!("trial prediction failed: {}", e))
    }

    fn predict_rows(&self, rows: Vec<Vec<f64>>) -> std::result::Result<Vec<f64>, String> {
        let matrix =
            DenseMatrix::from_2d_vec(&rows).map_err(|e| format!("matrix creation failed: {}", e))?;

        match panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(&matrix))) {
            Ok(Ok(values)) => Ok(values),
            Ok(Err(e)) => Err(format!("forest prediction failed: {}", e)),
            Err(payload) => Err(format!("forest panicked: {}", panic_message(&*payload))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl std::fmt::Debug for RandomForestModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomForestModel").finish_non_exhaustive()
    }
}

impl PricingModel for RandomForestModel {
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<f64>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Vec<f64>> = batch.iter().map(|fv| fv.to_row().to_vec()).collect();
        self.predict_rows(rows).map_err(PricingError::invocation)
    }

    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    fn kind(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::derive_features;
    use crate::domain::model::RawInputs;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    fn fitted() -> RandomForestModel {
        let x: Vec<Vec<f64>> = (0..24)
            .map(|i| vec![i as f64, 3.0, 6.0, 2018.0, i as f64 / 4.0, 1.0])
            .collect();
        let y: Vec<f64> = (0..24).map(|i| 60.0 + i as f64).collect();
        let matrix = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(2)
            .with_max_depth(3);
        RandomForestModel::new(RandomForestRegressor::fit(&matrix, &y, params).unwrap())
    }

    #[test]
    fn test_fitted_forest_passes_structure_check() {
        assert!(fitted().check_structure().is_ok());
    }

    #[test]
    fn test_bad_split_column_is_invocation_error() {
        let json = serde_json::to_string(&fitted()).unwrap();
        let tampered = regex::Regex::new(r#""split_feature":\d+"#)
            .unwrap()
            .replace_all(&json, r#""split_feature":42"#);
        let forest: RandomForestModel = serde_json::from_str(&tampered).unwrap();

        assert!(forest.check_structure().is_err());
        let err = forest
            .predict(&[derive_features(&RawInputs::default())])
            .unwrap_err();
        assert!(matches!(err, PricingError::ModelInvocationError { .. }));
        assert!(err.to_string().contains("panicked"));
    }
}
