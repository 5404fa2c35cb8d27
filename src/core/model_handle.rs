use crate::adapters::artifact::load_model_file;
use crate::domain::ports::PricingModel;
use crate::utils::error::Result;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The loaded pricing model, shared read-only for the rest of the process.
///
/// A handle is created once, at startup, by [`ModelHandle::load`]. There is no
/// way to swap the model inside an existing handle; clones point at the same
/// model.
#[derive(Clone)]
pub struct ModelHandle {
    model: Arc<dyn PricingModel>,
    source: Arc<str>,
}

impl ModelHandle {
    /// Loads the artifact at `path`. Any failure here is a `ModelLoadError`
    /// and should stop the program before it accepts input.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model = load_model_file(path)?;
        tracing::info!("Loaded {} pricing model from {}", model.kind(), path.display());
        Ok(Self {
            model,
            source: Arc::from(path.display().to_string()),
        })
    }

    pub fn from_model(model: impl PricingModel + 'static, source: &str) -> Self {
        Self {
            model: Arc::new(model),
            source: Arc::from(source),
        }
    }

    pub fn model(&self) -> &dyn PricingModel {
        self.model.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("kind", &self.model.kind())
            .field("source", &self.source)
            .finish()
    }
}
