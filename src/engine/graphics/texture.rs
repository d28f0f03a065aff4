use std::path::Path;

use super::device::{ GraphicsDevice, TextureId };
use crate::engine::error::{ GraphicsError, TextureError };

#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes `path` to RGBA8, flipped so row 0 is the bottom as GL expects.
    pub fn load(gl: &dyn GraphicsDevice, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| TextureError::Decode { path: path.to_path_buf(), source })?
            .flipv()
            .to_rgba8();
        let (width, height) = img.dimensions();

        let texture = Self::from_rgba(gl, width, height, img.as_raw())?;
        log::info!("✅ Texture loaded: {} ({}x{} pixels)", path.display(), width, height);
        Ok(texture)
    }

    pub fn from_rgba(gl: &dyn GraphicsDevice, width: u32, height: u32, rgba: &[u8]) -> Result<Self, GraphicsError> {
        let id = gl.create_texture(width, height, rgba).map_err(GraphicsError::Texture)?;
        Ok(Self { id, width, height })
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bind(&self, gl: &dyn GraphicsDevice, unit: u32) {
        gl.bind_texture(unit, self.id);
    }

    pub fn release(&self, gl: &dyn GraphicsDevice) {
        gl.delete_texture(self.id);
    }
}
