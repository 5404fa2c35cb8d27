pub mod estimator;
pub mod features;
pub mod model_handle;

pub use crate::domain::model::{Estimate, FeatureVector, RawInputs};
pub use crate::domain::ports::{ConfigProvider, PricingModel};
pub use crate::utils::error::Result;
