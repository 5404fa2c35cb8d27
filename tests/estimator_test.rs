use anyhow::Result;
use pricing_engine::adapters::{LinearModel, ModelArtifact, ModelSpec, RandomForestModel};
use pricing_engine::app::render::IMPORTANCE_FALLBACK;
use pricing_engine::config::Settings;
use pricing_engine::core::estimator::{compute_delta, feature_importance, predict};
use pricing_engine::core::features::derive_features;
use pricing_engine::domain::model::{DeltaTone, FEATURE_NAMES};
use pricing_engine::{ModelHandle, PriceEstimator, RawInputs, Renderer};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_artifact(dir: &TempDir, name: &str, json: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, json)?;
    Ok(path)
}

fn plain_renderer() -> Renderer {
    Renderer::new(&Settings {
        color: false,
        ..Settings::default()
    })
}

/// price = 20 + 0.5 * freight + 10 * review + 30 * price_freight_ratio
const LINEAR_ARTIFACT: &str = r#"{
    "format_version": 1,
    "feature_names": ["freight_value", "review_score", "month", "year",
                      "price_freight_ratio", "weight_price_ratio"],
    "model": {
        "kind": "linear",
        "intercept": 20.0,
        "coefficients": [0.5, 10.0, 0.0, 0.0, 30.0, 0.0],
        "feature_importances": [0.4, 0.1, 0.05, 0.05, 0.3, 0.1]
    }
}"#;

#[test]
fn test_linear_model_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_artifact(&dir, "pricing_model.json", LINEAR_ARTIFACT)?;

    let estimator = PriceEstimator::new(ModelHandle::load(&path)?);
    let estimate = estimator.estimate(&RawInputs::default())?;

    let expected = 20.0 + 0.5 * 120.0 + 10.0 * 4.0 + 30.0 * (150.0 / 121.0);
    assert!((estimate.prediction.estimate - expected).abs() < 1e-9);
    assert_eq!(estimate.prediction.delta.tone, DeltaTone::Gain);
    assert!((estimate.prediction.delta.value - (expected - 120.0)).abs() < 1e-9);

    let report = estimate.importance.expect("linear artifact carries importances");
    let names: Vec<_> = report.entries().iter().map(|e| e.feature.as_str()).collect();
    assert_eq!(names[0], "month");
    assert_eq!(names[1], "year");
    assert_eq!(names[5], "freight_value");

    let text = plain_renderer().render_text(&estimator.estimate(&RawInputs::default())?);
    assert!(text.contains("Key Insights (Model Feature Importance)"));
    assert!(!text.contains(IMPORTANCE_FALLBACK));
    Ok(())
}

#[test]
fn test_display_only_inputs_never_reach_the_model() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_artifact(&dir, "pricing_model.json", LINEAR_ARTIFACT)?;
    let estimator = PriceEstimator::new(ModelHandle::load(&path)?);

    let base = RawInputs::default();
    let relabelled = RawInputs {
        category: pricing_engine::domain::model::ProductCategory::Beauty,
        demand_level: pricing_engine::domain::model::DemandLevel::High,
        ..base.clone()
    };

    let a = estimator.estimate(&base)?;
    let b = estimator.estimate(&relabelled)?;
    assert_eq!(a.features, b.features);
    assert_eq!(a.prediction.estimate, b.prediction.estimate);

    let features = serde_json::to_value(a.features)?;
    let keys: Vec<_> = features.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), FEATURE_NAMES.len());
    assert!(!keys.iter().any(|k| k == "category" || k == "demand_level"));
    Ok(())
}

#[test]
fn test_tree_ensemble_with_gain_importances() -> Result<()> {
    // Splits on review_score (idx 1) and price_freight_ratio (idx 4).
    let json = r#"{
        "format_version": 1,
        "model": {
            "kind": "tree_ensemble",
            "base_score": 150.0,
            "aggregation": "sum",
            "trees": [
                {"nodes": [
                    {"feature": 1, "threshold": 3.5, "left": 1, "right": 2, "gain": 2.0},
                    {"value": -15.0},
                    {"value": 12.5}
                ]},
                {"nodes": [
                    {"feature": 4, "threshold": 1.0, "left": 1, "right": 2, "gain": 6.0},
                    {"value": -4.0},
                    {"value": 8.0}
                ]}
            ]
        }
    }"#;
    let dir = TempDir::new()?;
    let path = write_artifact(&dir, "trees.json", json)?;
    let handle = ModelHandle::load(&path)?;
    assert_eq!(handle.model().kind(), "tree_ensemble");

    let features = derive_features(&RawInputs::default());
    // review 4.0 > 3.5 -> 12.5; ratio 1.2397 > 1.0 -> 8.0
    assert_eq!(predict(handle.model(), &features)?, 170.5);

    let report = feature_importance(handle.model())?;
    let last = report.entries().last().unwrap();
    assert_eq!(last.feature, "price_freight_ratio");
    assert!((last.weight - 0.75).abs() < 1e-12);
    assert_eq!(report.entries()[0].weight, 0.0);
    Ok(())
}

#[test]
fn test_random_forest_has_no_importances() -> Result<()> {
    let x: Vec<Vec<f64>> = (0..40)
        .map(|i| {
            let s = i as f64;
            vec![s, 3.0 + (i % 3) as f64, (i % 12 + 1) as f64, 2018.0, s / 10.0, 1.0]
        })
        .collect();
    let y: Vec<f64> = x.iter().map(|row| 100.0 + 2.0 * row[0]).collect();

    let matrix = DenseMatrix::from_2d_vec(&x).map_err(|e| anyhow::anyhow!("{}", e))?;
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(8)
        .with_max_depth(4);
    let forest = RandomForestRegressor::fit(&matrix, &y, params)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let artifact = ModelArtifact::new(ModelSpec::RandomForest(RandomForestModel::new(forest)));
    let dir = TempDir::new()?;
    let path = write_artifact(&dir, "forest.json", &artifact.to_json_string()?)?;

    let estimator = PriceEstimator::new(ModelHandle::load(&path)?);
    let estimate = estimator.estimate(&RawInputs::default())?;

    assert!(estimate.prediction.estimate >= 100.0 && estimate.prediction.estimate <= 178.0);
    assert!(estimate.importance.is_none());
    assert!(matches!(
        feature_importance(estimator.handle().model()),
        Err(pricing_engine::PricingError::FeatureImportanceUnavailable { .. })
    ));

    let text = plain_renderer().render_text(&estimate);
    assert!(text.contains(IMPORTANCE_FALLBACK));
    Ok(())
}

#[test]
fn test_handle_clones_share_one_model() -> Result<()> {
    let handle = ModelHandle::from_model(LinearModel::new(1.0, vec![0.0; 6]), "shared");
    let copy = handle.clone();

    assert!(std::ptr::eq(
        handle.model() as *const _ as *const u8,
        copy.model() as *const _ as *const u8
    ));
    assert_eq!(copy.source(), "shared");
    Ok(())
}

#[test]
fn test_reference_delta_values() {
    let up = compute_delta(200.0, 120.0);
    assert_eq!(format!("{:+.2}", up.value), "+80.00");
    assert_eq!(up.tone, DeltaTone::Gain);

    let down = compute_delta(100.0, 120.0);
    assert_eq!(format!("{:+.2}", down.value), "-20.00");
    assert_eq!(down.tone, DeltaTone::Loss);
}

#[test]
fn test_bundled_demo_model() -> Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/pricing_model.json");
    let estimator = PriceEstimator::new(ModelHandle::load(path)?);

    let estimate = estimator.estimate(&RawInputs::default())?;
    assert_eq!(estimate.prediction.estimate, 142.75);
    assert_eq!(format!("{:+.2}", estimate.prediction.delta.value), "+22.75");

    let report = estimate.importance.expect("demo model records split gains");
    let order: Vec<_> = report.entries().iter().map(|e| e.feature.as_str()).collect();
    assert_eq!(
        order,
        [
            "year",
            "month",
            "review_score",
            "weight_price_ratio",
            "freight_value",
            "price_freight_ratio"
        ]
    );
    Ok(())
}
