//! Small OpenGL scene renderer: XML meshes, materials, lights, particle
//! emitters and an orbiting camera, drawn through a [`GraphicsDevice`].

pub mod engine;

pub use engine::graphics::{ GraphicsDevice, RecordingDevice };
pub use engine::{ Scene, SceneConfig, World };
