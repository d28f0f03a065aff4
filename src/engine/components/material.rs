use std::rc::Rc;

use crate::engine::graphics::{ BlendMode, GraphicsDevice, Shader, Texture };
use crate::engine::render_context::RenderContext;
use crate::engine::utils::math::{ mat4x4_mul, normal_matrix, Vec4 };

/// Shader + texture + fixed-function state for one drawable surface.
/// Shader and texture are shared between materials and never mutated after
/// they are published.
#[derive(Debug, Clone)]
pub struct Material {
    texture: Option<Rc<Texture>>,
    shader: Option<Rc<Shader>>,
    color: Vec4,
    shininess: u8,
    blend_mode: BlendMode,
    lighting: bool,
    culling: bool,
    depth_write: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl Material {
    pub fn new(texture: Option<Rc<Texture>>, shader: Option<Rc<Shader>>) -> Self {
        Self {
            texture,
            shader,
            color: [1.0; 4],
            shininess: 0,
            blend_mode: BlendMode::Alpha,
            lighting: true,
            culling: true,
            depth_write: true,
        }
    }

    /// The explicit shader, or the frame's default shader when none was set.
    pub fn shader<'a>(&'a self, ctx: &'a RenderContext) -> &'a Rc<Shader> {
        self.shader.as_ref().unwrap_or(&ctx.default_shader)
    }

    pub fn explicit_shader(&self) -> Option<&Rc<Shader>> {
        self.shader.as_ref()
    }

    pub fn set_shader(&mut self, shader: Option<Rc<Shader>>) {
        self.shader = shader;
    }

    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    pub fn set_texture(&mut self, texture: Option<Rc<Texture>>) {
        self.texture = texture;
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    pub fn shininess(&self) -> u8 {
        self.shininess
    }

    pub fn set_shininess(&mut self, shininess: u8) {
        self.shininess = shininess;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) {
        self.blend_mode = blend_mode;
    }

    pub fn lighting(&self) -> bool {
        self.lighting
    }

    pub fn set_lighting(&mut self, enable: bool) {
        self.lighting = enable;
    }

    pub fn culling(&self) -> bool {
        self.culling
    }

    pub fn set_culling(&mut self, enable: bool) {
        self.culling = enable;
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    pub fn set_depth_write(&mut self, enable: bool) {
        self.depth_write = enable;
    }

    /// Binds the shader and pushes matrices, texture, color, lighting and
    /// fixed-function state. Uniforms the shader does not declare are skipped.
    pub fn prepare(&self, gl: &dyn GraphicsDevice, ctx: &RenderContext) {
        let shader = self.shader(ctx);
        shader.bind(gl);

        let mv_matrix = mat4x4_mul(ctx.view, ctx.model);
        let mvp_matrix = mat4x4_mul(ctx.projection, mv_matrix);
        let normals_matrix = normal_matrix(&mv_matrix);

        shader.set_matrix(gl, shader.location(gl, "mvMatrix").as_ref(), &mv_matrix);
        shader.set_matrix(gl, shader.location(gl, "normalsMatrix").as_ref(), &normals_matrix);
        shader.set_matrix(gl, shader.location(gl, "mvpMatrix").as_ref(), &mvp_matrix);

        if let Some(is_texturized) = shader.location(gl, "isTexturized") {
            match &self.texture {
                Some(texture) => {
                    shader.set_int(gl, Some(&is_texturized), 1);
                    shader.set_int(gl, shader.location(gl, "texSampler").as_ref(), 0);
                    texture.bind(gl, 0);
                }
                None => shader.set_int(gl, Some(&is_texturized), 0),
            }
        }

        if let Some(has_color) = shader.location(gl, "hasColor") {
            shader.set_int(gl, Some(&has_color), 1);
            shader.set_vec4(gl, shader.location(gl, "color").as_ref(), self.color);
        }

        let number_lights = shader.location(gl, "numberLights");
        if self.lighting {
            shader.set_int(gl, number_lights.as_ref(), ctx.lights.len() as i32);
            shader.set_int(gl, shader.location(gl, "shininess").as_ref(), i32::from(self.shininess));
            shader.set_vec3(gl, shader.location(gl, "ambientLight").as_ref(), ctx.ambient);

            for (index, light) in ctx.lights.iter().enumerate() {
                light.prepare(gl, index, shader, &ctx.view);
            }
        } else {
            shader.set_int(gl, number_lights.as_ref(), 0);
        }

        shader.set_vec4(gl, shader.location(gl, "diffuse").as_ref(), self.color);

        let (src, dst) = self.blend_mode.factors();
        gl.blend_func(src, dst);
        gl.set_face_culling(self.culling);
        gl.depth_mask(self.depth_write);
    }
}
