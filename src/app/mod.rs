// Application layer: what the user sees, one-shot output and the prompt session.

pub mod render;
pub mod session;

pub use render::{OutputFormat, Renderer};
pub use session::{Session, SessionSummary};
