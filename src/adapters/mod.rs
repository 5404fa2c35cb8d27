// Adapters layer: concrete model kinds and the artifact loader that picks one.

pub mod artifact;
pub mod linear;
pub mod random_forest;
pub mod tree_ensemble;

pub use artifact::{load_model_file, ModelArtifact, ModelSpec, FORMAT_VERSION};
pub use linear::LinearModel;
pub use random_forest::{ForestRegressor, RandomForestModel};
pub use tree_ensemble::{Aggregation, RegressionTree, TreeEnsemble, TreeNode};
