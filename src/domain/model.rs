use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order the pricing model was trained on. The model cannot detect a
/// reordering, so every row handed to it is built from this list.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "freight_value",
    "review_score",
    "month",
    "year",
    "price_freight_ratio",
    "weight_price_ratio",
];

pub const FEATURE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ProductCategory {
    #[default]
    Electronics,
    Clothing,
    Home,
    Beauty,
    Sports,
    Automotive,
    Others,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 7] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::Home,
        ProductCategory::Beauty,
        ProductCategory::Sports,
        ProductCategory::Automotive,
        ProductCategory::Others,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Home => "Home",
            ProductCategory::Beauty => "Beauty",
            ProductCategory::Sports => "Sports",
            ProductCategory::Automotive => "Automotive",
            ProductCategory::Others => "Others",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DemandLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl DemandLevel {
    pub const ALL: [DemandLevel; 3] = [DemandLevel::Low, DemandLevel::Medium, DemandLevel::High];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DemandLevel::Low => "Low",
            DemandLevel::Medium => "Medium",
            DemandLevel::High => "High",
        })
    }
}

/// Everything the pricing form collects. Category, demand level and current
/// price are display-only and never reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub category: ProductCategory,
    pub shipping_cost: f64,
    pub weight_grams: f64,
    pub review_score: f64,
    pub competitor_price: f64,
    pub demand_level: DemandLevel,
    pub month: u32,
    pub year: u32,
    pub current_price: f64,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            category: ProductCategory::Electronics,
            shipping_cost: 120.0,
            weight_grams: 500.0,
            review_score: 4.0,
            competitor_price: 150.0,
            demand_level: DemandLevel::Low,
            month: 7,
            year: 2015,
            current_price: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub freight_value: f64,
    pub review_score: f64,
    pub month: u32,
    pub year: u32,
    pub price_freight_ratio: f64,
    pub weight_price_ratio: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.freight_value,
            self.review_score,
            f64::from(self.month),
            f64::from(self.year),
            self.price_freight_ratio,
            self.weight_price_ratio,
        ]
    }

    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_row())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTone {
    Gain,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceDelta {
    pub value: f64,
    pub tone: DeltaTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub estimate: f64,
    pub current_price: f64,
    pub delta: PriceDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceEntry {
    pub feature: String,
    pub weight: f64,
}

/// Per-feature weights in ascending order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportanceReport {
    entries: Vec<ImportanceEntry>,
}

impl ImportanceReport {
    /// Sorts ascending by weight. The sort is stable, so equal weights keep
    /// the order they were given in.
    pub fn from_unsorted(mut entries: Vec<ImportanceEntry>) -> Self {
        entries.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        Self { entries }
    }

    pub fn entries(&self) -> &[ImportanceEntry] {
        &self.entries
    }

    pub fn max_weight(&self) -> f64 {
        self.entries.last().map(|e| e.weight).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One full pass through the estimator: what went in, what the model saw,
/// and what came out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub inputs: RawInputs,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub importance: Option<ImportanceReport>,
}
