pub mod config;
pub mod content;
pub mod narration;
pub mod renderer;
pub mod scene;
pub mod server;
pub mod templates;

pub use content::{Category, ContentRecord};
pub use narration::NarrationEngine;
pub use renderer::ManimRenderer;
pub use scene::{SceneDescription, SceneOp};
pub use templates::SceneTemplates;
