use crate::engine::components::entity::Entity;
use crate::engine::components::transform::Transform;
use crate::engine::graphics::GraphicsDevice;
use crate::engine::render_context::RenderContext;
use crate::engine::utils::math::{
    mat4x4_identity,
    mat4x4_mul,
    mat4x4_perspective,
    mat4x4_translate,
    mat4x4_transpose,
    Mat4x4,
    Vec3,
};

#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    projection: Mat4x4,
    viewport: [i32; 4],
    clear_color: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            transform: Transform::default(),
            projection: mat4x4_identity(),
            viewport: [0, 0, 800, 600],
            clear_color: [0.0; 3],
        }
    }

    pub fn projection(&self) -> &Mat4x4 {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4x4) {
        self.projection = projection;
    }

    /// Perspective projection for the current viewport's aspect ratio.
    pub fn set_perspective(&mut self, fov_y_degrees: f32, near: f32, far: f32) {
        let [_, _, width, height] = self.viewport;
        let aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
        self.projection = mat4x4_perspective(fov_y_degrees.to_radians(), aspect_ratio, near, far);
    }

    pub fn viewport(&self) -> [i32; 4] {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: [i32; 4]) {
        self.viewport = viewport;
    }

    pub fn clear_color(&self) -> Vec3 {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Vec3) {
        self.clear_color = color;
    }

    /// Inverse of the camera's own transform: R^T * T(-position).
    pub fn view_matrix(&self) -> Mat4x4 {
        let [x, y, z] = self.transform.position();
        let inverse_rotation = mat4x4_transpose(self.transform.rotation_matrix());
        mat4x4_mul(inverse_rotation, mat4x4_translate(-x, -y, -z))
    }

    /// Publishes projection and view into the frame context, then sets the
    /// viewport and clears it.
    pub fn prepare(&self, gl: &dyn GraphicsDevice, ctx: &mut RenderContext) {
        ctx.projection = self.projection;
        ctx.view = self.view_matrix();

        gl.set_viewport(self.viewport);
        gl.clear(self.clear_color);
    }
}

impl Entity for Camera {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}
