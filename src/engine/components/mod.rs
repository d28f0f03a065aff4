pub mod camera;
pub mod emitter;
pub mod entity;
pub mod light;
pub mod material;
pub mod mesh;
pub mod model;
pub mod transform;

pub use camera::Camera;
pub use emitter::Emitter;
pub use entity::Entity;
pub use light::{ Light, LightKind, LightParams };
pub use material::Material;
pub use mesh::Mesh;
pub use model::Model;
pub use transform::Transform;
