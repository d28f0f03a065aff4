use std::rc::Rc;

use crate::engine::components::light::LightParams;
use crate::engine::graphics::Shader;
use crate::engine::utils::math::{ mat4x4_identity, Mat4x4, Vec3 };

/// Per-frame render state handed to every draw call. The world fills in the
/// camera matrices, lights and ambient before the first entity draws; models
/// overwrite `model` before drawing their mesh.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub projection: Mat4x4,
    pub view: Mat4x4,
    pub model: Mat4x4,
    pub ambient: Vec3,
    pub lights: Vec<LightParams>,
    pub default_shader: Rc<Shader>,
}

impl RenderContext {
    pub fn new(default_shader: Rc<Shader>) -> Self {
        Self {
            projection: mat4x4_identity(),
            view: mat4x4_identity(),
            model: mat4x4_identity(),
            ambient: [0.0; 3],
            lights: Vec::new(),
            default_shader,
        }
    }
}
