use crate::domain::model::FeatureVector;
use crate::utils::error::Result;

/// A pre-trained regression model that prices feature rows.
pub trait PricingModel: Send + Sync {
    /// One prediction per row, in row order.
    fn predict(&self, batch: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Importance weights aligned positionally with the feature columns, or
    /// `None` when the model kind has no such introspection.
    fn feature_importances(&self) -> Option<Vec<f64>>;

    fn kind(&self) -> &str;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn currency_symbol(&self) -> &str;
    fn chart_width(&self) -> usize;
    fn color_enabled(&self) -> bool;
}
