use crate::engine::components::entity::Entity;
use crate::engine::components::transform::Transform;
use crate::engine::graphics::{ GraphicsDevice, Shader };
use crate::engine::utils::math::{ mat4x4_mul_vec4, Mat4x4, Vec3 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Point,
}

#[derive(Debug, Clone)]
pub struct Light {
    transform: Transform,
    kind: LightKind,
    color: Vec3,
    linear_attenuation: f32,
    direction: Vec3,
}

/// Snapshot of a light for one frame's draw pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub linear_attenuation: f32,
}

impl Light {
    pub fn new(position: Vec3, kind: LightKind, color: Vec3, linear_attenuation: f32, direction: Vec3) -> Self {
        let mut transform = Transform::default();
        transform.set_position(position);
        Self { transform, kind, color, linear_attenuation, direction }
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: LightKind) {
        self.kind = kind;
    }

    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    pub fn linear_attenuation(&self) -> f32 {
        self.linear_attenuation
    }

    pub fn set_linear_attenuation(&mut self, attenuation: f32) {
        self.linear_attenuation = attenuation;
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    pub fn params(&self) -> LightParams {
        LightParams {
            kind: self.kind,
            position: self.transform.position(),
            direction: self.direction,
            color: self.color,
            linear_attenuation: self.linear_attenuation,
        }
    }
}

impl LightParams {
    /// Uploads this light into slot `index` of the shader's `lights` array, in view space.
    pub fn prepare(&self, gl: &dyn GraphicsDevice, index: usize, shader: &Shader, view: &Mat4x4) {
        let vector = match self.kind {
            LightKind::Point => {
                let [x, y, z] = self.position;
                mat4x4_mul_vec4(view, [x, y, z, 1.0])
            }
            LightKind::Directional => {
                let [x, y, z] = self.direction;
                mat4x4_mul_vec4(view, [x, y, z, 0.0])
            }
        };

        let prefix = format!("lights[{}]", index);
        shader.set_vec4(gl, shader.location(gl, &format!("{}.vector", prefix)).as_ref(), vector);
        shader.set_vec3(gl, shader.location(gl, &format!("{}.color", prefix)).as_ref(), self.color);
        shader.set_float(
            gl,
            shader.location(gl, &format!("{}.linearAttenuation", prefix)).as_ref(),
            self.linear_attenuation
        );
    }
}

impl Entity for Light {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}
