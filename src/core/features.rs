use crate::domain::model::{FeatureVector, RawInputs};

/// Added to both ratio denominators so a zero shipping cost or competitor
/// price never divides by zero. Reference outputs depend on this exact value.
pub const RATIO_OFFSET: f64 = 1.0;

/// Builds the six model columns from the form inputs.
///
/// Category, demand level and current price are dropped here; the model was
/// never trained on them.
pub fn derive_features(raw: &RawInputs) -> FeatureVector {
    FeatureVector {
        freight_value: raw.shipping_cost,
        review_score: raw.review_score,
        month: raw.month,
        year: raw.year,
        price_freight_ratio: raw.competitor_price / (raw.shipping_cost + RATIO_OFFSET),
        weight_price_ratio: raw.weight_grams / (raw.competitor_price + RATIO_OFFSET),
    }
}
