use std::num::NonZeroU32;

use glow::HasContext;
use serde::{ Deserialize, Serialize };

use crate::engine::utils::math::Mat4x4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Vertex array plus its vertex and index buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId {
    pub vertex_array: u32,
    pub vertex_buffer: u32,
    pub index_buffer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
}

impl BlendFactor {
    pub fn to_gl(self) -> u32 {
        match self {
            BlendFactor::Zero => glow::ZERO,
            BlendFactor::One => glow::ONE,
            BlendFactor::SrcColor => glow::SRC_COLOR,
            BlendFactor::SrcAlpha => glow::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        }
    }
}

/// How a material's fragments are combined with the framebuffer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Alpha,
    Add,
    Mul,
}

impl BlendMode {
    /// (source, destination) factors for `glBlendFunc`.
    pub fn factors(self) -> (BlendFactor, BlendFactor) {
        match self {
            BlendMode::Alpha => (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
            BlendMode::Add => (BlendFactor::SrcAlpha, BlendFactor::One),
            BlendMode::Mul => (BlendFactor::Zero, BlendFactor::SrcColor),
        }
    }
}

/// The GL calls the scene pipeline issues. Implemented for `glow::Context`
/// and for the headless [`RecordingDevice`](super::headless::RecordingDevice).
pub trait GraphicsDevice {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, String>;
    /// Links and then deletes both stage objects, on success or failure.
    fn link_program(&self, vertex: u32, fragment: u32) -> Result<ProgramId, String>;
    fn delete_shader(&self, shader: u32);
    fn delete_program(&self, program: ProgramId);
    fn use_program(&self, program: ProgramId);

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32>;
    fn uniform_i32(&self, location: &UniformLocation, value: i32);
    fn uniform_f32(&self, location: &UniformLocation, value: f32);
    fn uniform_vec3(&self, location: &UniformLocation, value: [f32; 3]);
    fn uniform_vec4(&self, location: &UniformLocation, value: [f32; 4]);
    fn uniform_mat4(&self, location: &UniformLocation, value: &Mat4x4);

    fn create_geometry(&self, vertex_data: &[u8], index_data: &[u8]) -> Result<GeometryId, String>;
    fn bind_geometry(&self, geometry: GeometryId);
    fn vertex_attrib(&self, location: u32, components: i32, stride: i32, offset: i32);
    fn draw_triangles(&self, index_count: i32);
    fn delete_geometry(&self, geometry: GeometryId);

    fn create_texture(&self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId, String>;
    fn bind_texture(&self, unit: u32, texture: TextureId);
    fn delete_texture(&self, texture: TextureId);

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor);
    fn set_face_culling(&self, enabled: bool);
    fn depth_mask(&self, enabled: bool);
    fn set_viewport(&self, viewport: [i32; 4]);
    fn clear(&self, color: [f32; 3]);
}

fn native_program(program: ProgramId) -> Option<glow::NativeProgram> {
    NonZeroU32::new(program.0).map(glow::NativeProgram)
}

fn native_texture(texture: TextureId) -> Option<glow::NativeTexture> {
    NonZeroU32::new(texture.0).map(glow::NativeTexture)
}

fn native_buffer(id: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(id).map(glow::NativeBuffer)
}

fn native_vertex_array(id: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(id).map(glow::NativeVertexArray)
}

fn native_location(location: &UniformLocation) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(location.0)
}

impl GraphicsDevice for glow::Context {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = self.create_shader(kind)?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);

            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(format!("Shader compile error: {}", log));
            }
            Ok(shader.0.get())
        }
    }

    fn link_program(&self, vertex: u32, fragment: u32) -> Result<ProgramId, String> {
        let (Some(vs), Some(fs)) = (NonZeroU32::new(vertex), NonZeroU32::new(fragment)) else {
            return Err("Invalid shader handle".to_string());
        };
        let (vs, fs) = (glow::NativeShader(vs), glow::NativeShader(fs));
        unsafe {
            let program = match self.create_program() {
                Ok(program) => program,
                Err(e) => {
                    HasContext::delete_shader(self, vs);
                    HasContext::delete_shader(self, fs);
                    return Err(e);
                }
            };
            self.attach_shader(program, vs);
            self.attach_shader(program, fs);
            HasContext::link_program(self, program);

            HasContext::delete_shader(self, vs);
            HasContext::delete_shader(self, fs);

            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(format!("Program link error: {}", log));
            }
            Ok(ProgramId(program.0.get()))
        }
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(shader) = NonZeroU32::new(shader) {
            unsafe { HasContext::delete_shader(self, glow::NativeShader(shader)) }
        }
    }

    fn delete_program(&self, program: ProgramId) {
        if let Some(program) = native_program(program) {
            unsafe { HasContext::delete_program(self, program) }
        }
    }

    fn use_program(&self, program: ProgramId) {
        unsafe { HasContext::use_program(self, native_program(program)) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let program = native_program(program)?;
        unsafe { self.get_uniform_location(program, name).map(|loc| UniformLocation(loc.0)) }
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let program = native_program(program)?;
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_i32(&self, location: &UniformLocation, value: i32) {
        unsafe { self.uniform_1_i32(Some(&native_location(location)), value) }
    }

    fn uniform_f32(&self, location: &UniformLocation, value: f32) {
        unsafe { self.uniform_1_f32(Some(&native_location(location)), value) }
    }

    fn uniform_vec3(&self, location: &UniformLocation, value: [f32; 3]) {
        unsafe { self.uniform_3_f32(Some(&native_location(location)), value[0], value[1], value[2]) }
    }

    fn uniform_vec4(&self, location: &UniformLocation, value: [f32; 4]) {
        unsafe {
            self.uniform_4_f32(
                Some(&native_location(location)),
                value[0],
                value[1],
                value[2],
                value[3]
            )
        }
    }

    fn uniform_mat4(&self, location: &UniformLocation, value: &Mat4x4) {
        // Row-major on our side
        unsafe { self.uniform_matrix_4_f32_slice(Some(&native_location(location)), true, value) }
    }

    fn create_geometry(&self, vertex_data: &[u8], index_data: &[u8]) -> Result<GeometryId, String> {
        unsafe {
            let vao = self.create_vertex_array()?;
            self.bind_vertex_array(Some(vao));

            let vbo = self.create_buffer()?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.buffer_data_u8_slice(glow::ARRAY_BUFFER, vertex_data, glow::STATIC_DRAW);

            let ebo = self.create_buffer()?;
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            self.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, index_data, glow::STATIC_DRAW);

            self.bind_vertex_array(None);

            Ok(GeometryId {
                vertex_array: vao.0.get(),
                vertex_buffer: vbo.0.get(),
                index_buffer: ebo.0.get(),
            })
        }
    }

    fn bind_geometry(&self, geometry: GeometryId) {
        unsafe {
            self.bind_vertex_array(native_vertex_array(geometry.vertex_array));
            self.bind_buffer(glow::ARRAY_BUFFER, native_buffer(geometry.vertex_buffer));
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, native_buffer(geometry.index_buffer));
        }
    }

    fn vertex_attrib(&self, location: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.enable_vertex_attrib_array(location);
            self.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, stride, offset);
        }
    }

    fn draw_triangles(&self, index_count: i32) {
        unsafe {
            self.draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_SHORT, 0);
            self.bind_vertex_array(None);
        }
    }

    fn delete_geometry(&self, geometry: GeometryId) {
        unsafe {
            if let Some(vbo) = native_buffer(geometry.vertex_buffer) {
                self.delete_buffer(vbo);
            }
            if let Some(ebo) = native_buffer(geometry.index_buffer) {
                self.delete_buffer(ebo);
            }
            if let Some(vao) = native_vertex_array(geometry.vertex_array) {
                self.delete_vertex_array(vao);
            }
        }
    }

    fn create_texture(&self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId, String> {
        unsafe {
            let texture = HasContext::create_texture(self)?;
            HasContext::bind_texture(self, glow::TEXTURE_2D, Some(texture));

            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba))
            );

            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.generate_mipmap(glow::TEXTURE_2D);

            HasContext::bind_texture(self, glow::TEXTURE_2D, None);

            Ok(TextureId(texture.0.get()))
        }
    }

    fn bind_texture(&self, unit: u32, texture: TextureId) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            HasContext::bind_texture(self, glow::TEXTURE_2D, native_texture(texture));
        }
    }

    fn delete_texture(&self, texture: TextureId) {
        if let Some(texture) = native_texture(texture) {
            unsafe { HasContext::delete_texture(self, texture) }
        }
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        unsafe { HasContext::blend_func(self, src.to_gl(), dst.to_gl()) }
    }

    fn set_face_culling(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.enable(glow::CULL_FACE);
            } else {
                self.disable(glow::CULL_FACE);
            }
        }
    }

    fn depth_mask(&self, enabled: bool) {
        unsafe { HasContext::depth_mask(self, enabled) }
    }

    fn set_viewport(&self, viewport: [i32; 4]) {
        let [x, y, w, h] = viewport;
        unsafe {
            self.viewport(x, y, w, h);
            self.scissor(x, y, w, h);
        }
    }

    fn clear(&self, color: [f32; 3]) {
        unsafe {
            // Depth writes must be on for the depth clear to take effect
            HasContext::depth_mask(self, true);
            self.clear_color(color[0], color[1], color[2], 1.0);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }
}

/// Enables the fixed GL state the renderer relies on for its whole lifetime.
pub fn init_gl_state(gl: &glow::Context) {
    unsafe {
        gl.enable(glow::DEPTH_TEST);
        gl.enable(glow::SCISSOR_TEST);
        gl.enable(glow::BLEND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_modes_map_to_fixed_factor_pairs() {
        assert_eq!(BlendMode::Alpha.factors(), (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha));
        assert_eq!(BlendMode::Add.factors(), (BlendFactor::SrcAlpha, BlendFactor::One));
        assert_eq!(BlendMode::Mul.factors(), (BlendFactor::Zero, BlendFactor::SrcColor));
        assert_eq!(BlendMode::default(), BlendMode::Alpha);
    }

    #[test]
    fn blend_factors_use_gl_constants() {
        assert_eq!(BlendFactor::SrcAlpha.to_gl(), glow::SRC_ALPHA);
        assert_eq!(BlendFactor::OneMinusSrcAlpha.to_gl(), glow::ONE_MINUS_SRC_ALPHA);
        assert_eq!(BlendFactor::Zero.to_gl(), glow::ZERO);
    }
}
