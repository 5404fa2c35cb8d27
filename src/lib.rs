pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::PricingConfig, Settings};

pub use app::{OutputFormat, Renderer, Session};
pub use core::{estimator::PriceEstimator, model_handle::ModelHandle};
pub use domain::model::{Estimate, FeatureVector, RawInputs};
pub use utils::error::{PricingError, Result};
