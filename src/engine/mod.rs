pub mod components;
pub mod config;
pub mod error;
pub mod graphics;
pub mod loaders;
pub mod render_context;
pub mod scene;
pub mod utils;
pub mod world;

// Re-export the types most callers need
pub use components::*;
pub use config::SceneConfig;
pub use error::*;
pub use render_context::RenderContext;
pub use scene::Scene;
pub use world::World;
