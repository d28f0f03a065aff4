use std::rc::Rc;

use crate::engine::components::entity::Entity;
use crate::engine::components::mesh::Mesh;
use crate::engine::components::transform::Transform;
use crate::engine::graphics::GraphicsDevice;
use crate::engine::render_context::RenderContext;

/// A mesh placed in the world. Several models may share one mesh.
#[derive(Debug)]
pub struct Model {
    transform: Transform,
    mesh: Rc<Mesh>,
}

impl Model {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        Self { transform: Transform::default(), mesh }
    }

    pub fn mesh(&self) -> &Rc<Mesh> {
        &self.mesh
    }
}

impl Entity for Model {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn draw(&self, gl: &dyn GraphicsDevice, ctx: &mut RenderContext) {
        ctx.model = self.transform.matrix();
        self.mesh.draw(gl, ctx);
    }
}
