use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::engine::components::material::Material;
use crate::engine::error::MeshError;
use crate::engine::graphics::{ Buffer, GraphicsDevice, Texture };
use crate::engine::loaders::mesh_loader::{ asset_directory, parse_mesh };
use crate::engine::render_context::RenderContext;

/// Ordered (buffer, material) pairs. Index `i` of one list belongs to index `i`
/// of the other; pairs draw in insertion order.
#[derive(Debug, Default)]
pub struct Mesh {
    buffers: Vec<Rc<Buffer>>,
    materials: Vec<Material>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a `.msh.xml` file. Textures are resolved relative to the file; a
    /// texture that fails to load leaves that buffer untextured.
    pub fn load(gl: &dyn GraphicsDevice, path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let result = Self::load_inner(gl, path);
        match &result {
            Ok(mesh) => log::info!("✅ Loaded mesh {} ({} buffers)", path.display(), mesh.num_buffers()),
            Err(e) => log::error!("Failed to load mesh {}: {}", path.display(), e),
        }
        result
    }

    fn load_inner(gl: &dyn GraphicsDevice, path: &Path) -> Result<Self, MeshError> {
        let xml = fs::read_to_string(path).map_err(|source| MeshError::Io { path: path.to_path_buf(), source })?;
        let sources = parse_mesh(&xml, &asset_directory(&path.to_string_lossy()))?;

        let mut mesh = Mesh::new();
        for source in sources {
            let texture = source.texture_path.as_ref().and_then(|texture_path| {
                match Texture::load(gl, texture_path) {
                    Ok(texture) => Some(Rc::new(texture)),
                    Err(e) => {
                        log::warn!("{}; drawing buffer without texture", e);
                        None
                    }
                }
            });

            let mut material = Material::new(texture, None);
            material.set_color(source.color);
            material.set_shininess(source.shininess);
            material.set_culling(true);
            material.set_lighting(true);
            material.set_depth_write(true);

            let buffer = Buffer::create(gl, source.vertices, source.indices)?;
            mesh.add_buffer(Rc::new(buffer), material);
        }
        Ok(mesh)
    }

    pub fn add_buffer(&mut self, buffer: Rc<Buffer>, material: Material) {
        self.buffers.push(buffer);
        self.materials.push(material);
    }

    pub fn num_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer(&self, index: usize) -> Option<&Rc<Buffer>> {
        self.buffers.get(index)
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn material_mut(&mut self, index: usize) -> Option<&mut Material> {
        self.materials.get_mut(index)
    }

    pub fn draw(&self, gl: &dyn GraphicsDevice, ctx: &RenderContext) {
        for (buffer, material) in self.buffers.iter().zip(&self.materials) {
            let shader = material.shader(ctx);
            shader.bind(gl);
            material.prepare(gl, ctx);
            buffer.draw(gl, shader);
        }
    }

    /// Frees the buffers and every distinct texture the materials reference.
    pub fn release(&self, gl: &dyn GraphicsDevice) {
        for buffer in &self.buffers {
            buffer.release(gl);
        }
        let mut released = HashSet::new();
        for texture in self.materials.iter().filter_map(Material::texture) {
            if released.insert(Rc::as_ptr(texture)) {
                texture.release(gl);
            }
        }
    }
}
