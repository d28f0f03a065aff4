use super::device::{ GeometryId, GraphicsDevice };
use super::shader::Shader;
use super::vertex::Vertex;
use crate::engine::error::GraphicsError;

/// GPU vertex + index storage for one drawable surface. Immutable once created.
#[derive(Debug)]
pub struct Buffer {
    geometry: GeometryId,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl Buffer {
    pub fn create(gl: &dyn GraphicsDevice, vertices: Vec<Vertex>, indices: Vec<u16>) -> Result<Self, GraphicsError> {
        let geometry = gl
            .create_geometry(bytemuck::cast_slice(&vertices), bytemuck::cast_slice(&indices))
            .map_err(GraphicsError::Geometry)?;

        Ok(Self { geometry, vertices, indices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn geometry(&self) -> GeometryId {
        self.geometry
    }

    /// Issues the indexed draw with `shader`'s attribute bindings.
    pub fn draw(&self, gl: &dyn GraphicsDevice, shader: &Shader) {
        gl.bind_geometry(self.geometry);
        shader.setup_attribs(gl);
        gl.draw_triangles(self.indices.len() as i32);
    }

    pub fn release(&self, gl: &dyn GraphicsDevice) {
        gl.delete_geometry(self.geometry);
    }
}
