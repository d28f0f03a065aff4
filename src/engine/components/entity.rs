use crate::engine::components::transform::Transform;
use crate::engine::graphics::GraphicsDevice;
use crate::engine::render_context::RenderContext;
use crate::engine::utils::math::Vec3;

/// A node in the scene. Models, cameras, lights and emitters all carry a
/// transform; only some of them draw anything.
pub trait Entity {
    fn transform(&self) -> &Transform;
    fn transform_mut(&mut self) -> &mut Transform;

    fn update(&mut self, _delta_time: f32) {}

    fn draw(&self, _gl: &dyn GraphicsDevice, _ctx: &mut RenderContext) {}

    fn position(&self) -> Vec3 {
        self.transform().position()
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform_mut().set_position(position);
    }

    fn rotation(&self) -> Vec3 {
        self.transform().rotation()
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.transform_mut().set_rotation(rotation);
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.transform_mut().set_scale(scale);
    }

    fn move_by(&mut self, offset: Vec3) {
        self.transform_mut().move_by(offset);
    }
}
