use std::fs;
use std::path::Path;

use super::device::{ GraphicsDevice, ProgramId, ShaderStage, UniformLocation };
use super::vertex::Vertex;
use crate::engine::error::ShaderError;
use crate::engine::utils::math::Mat4x4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AttribLocations {
    position: Option<u32>,
    tex_coords: Option<u32>,
    normal: Option<u32>,
    tangent: Option<u32>,
}

/// A linked vertex + fragment program. Creation never fails outright: a compile
/// or link failure leaves an invalid shader whose [`Shader::error`] explains why.
#[derive(Debug)]
pub struct Shader {
    program: Option<ProgramId>,
    attribs: AttribLocations,
    error: String,
}

impl Shader {
    pub fn create(gl: &dyn GraphicsDevice, vertex_source: &str, fragment_source: &str) -> Self {
        match Self::build_program(gl, vertex_source, fragment_source) {
            Ok(program) => {
                let attribs = AttribLocations {
                    position: gl.attrib_location(program, "vpos"),
                    tex_coords: gl.attrib_location(program, "vtex"),
                    normal: gl.attrib_location(program, "vnormal"),
                    tangent: gl.attrib_location(program, "vtangent"),
                };
                log::info!("✅ Created shader program {:?}", program);
                Self { program: Some(program), attribs, error: String::new() }
            }
            Err(error) => {
                log::error!("Shader creation failed: {}", error);
                Self { program: None, attribs: AttribLocations::default(), error }
            }
        }
    }

    /// Reads both sources wholesale. A read failure is an error; a compile
    /// failure is reported through [`Shader::error`] on the returned shader.
    pub fn load(
        gl: &dyn GraphicsDevice,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>
    ) -> Result<Self, ShaderError> {
        let read = |path: &Path| {
            fs::read_to_string(path).map_err(|source| ShaderError::Io { path: path.to_path_buf(), source })
        };
        let vertex_source = read(vertex_path.as_ref())?;
        let fragment_source = read(fragment_path.as_ref())?;
        Ok(Self::create(gl, &vertex_source, &fragment_source))
    }

    fn build_program(gl: &dyn GraphicsDevice, vertex_source: &str, fragment_source: &str) -> Result<ProgramId, String> {
        let vs = gl.compile_shader(ShaderStage::Vertex, vertex_source)?;
        let fs = match gl.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(vs);
                return Err(e);
            }
        };
        gl.link_program(vs, fs)
    }

    /// Empty when the program compiled and linked.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    pub fn bind(&self, gl: &dyn GraphicsDevice) {
        if let Some(program) = self.program {
            gl.use_program(program);
        }
    }

    /// `None` when the program does not declare `name` (or the shader is invalid).
    pub fn location(&self, gl: &dyn GraphicsDevice, name: &str) -> Option<UniformLocation> {
        self.program.and_then(|program| gl.uniform_location(program, name))
    }

    pub fn set_int(&self, gl: &dyn GraphicsDevice, location: Option<&UniformLocation>, value: i32) {
        if let Some(location) = location {
            gl.uniform_i32(location, value);
        }
    }

    pub fn set_float(&self, gl: &dyn GraphicsDevice, location: Option<&UniformLocation>, value: f32) {
        if let Some(location) = location {
            gl.uniform_f32(location, value);
        }
    }

    pub fn set_vec3(&self, gl: &dyn GraphicsDevice, location: Option<&UniformLocation>, value: [f32; 3]) {
        if let Some(location) = location {
            gl.uniform_vec3(location, value);
        }
    }

    pub fn set_vec4(&self, gl: &dyn GraphicsDevice, location: Option<&UniformLocation>, value: [f32; 4]) {
        if let Some(location) = location {
            gl.uniform_vec4(location, value);
        }
    }

    pub fn set_matrix(&self, gl: &dyn GraphicsDevice, location: Option<&UniformLocation>, value: &Mat4x4) {
        if let Some(location) = location {
            gl.uniform_mat4(location, value);
        }
    }

    /// Points the declared vertex attributes at the interleaved [`Vertex`] layout
    /// of the currently bound geometry.
    pub fn setup_attribs(&self, gl: &dyn GraphicsDevice) {
        let layout = [
            (self.attribs.position, 3, Vertex::POSITION_OFFSET),
            (self.attribs.tex_coords, 2, Vertex::TEX_COORDS_OFFSET),
            (self.attribs.normal, 3, Vertex::NORMAL_OFFSET),
            (self.attribs.tangent, 3, Vertex::TANGENT_OFFSET),
        ];
        for (location, components, offset) in layout {
            if let Some(location) = location {
                gl.vertex_attrib(location, components, Vertex::STRIDE, offset);
            }
        }
    }

    pub fn release(&self, gl: &dyn GraphicsDevice) {
        if let Some(program) = self.program {
            gl.delete_program(program);
        }
    }
}
