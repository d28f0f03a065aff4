use serde::{ Deserialize, Serialize };

use crate::engine::utils::math::{
    mat4x4_from_euler_degrees,
    mat4x4_mul,
    mat4x4_scale,
    mat4x4_transform_vector,
    mat4x4_translate,
    vec3_add,
    Mat4x4,
    Vec3,
};

/// Position, rotation (Euler angles in degrees) and scale of a scene node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl Transform {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn rotation_matrix(&self) -> Mat4x4 {
        mat4x4_from_euler_degrees(self.rotation)
    }

    /// Model matrix, composed T * R * S.
    pub fn matrix(&self) -> Mat4x4 {
        let [px, py, pz] = self.position;
        let [sx, sy, sz] = self.scale;
        let transform_matrix = mat4x4_mul(self.rotation_matrix(), mat4x4_scale(sx, sy, sz));
        mat4x4_mul(mat4x4_translate(px, py, pz), transform_matrix)
    }

    /// Moves along the node's own (rotated) axes.
    pub fn move_by(&mut self, offset: Vec3) {
        let world_offset = mat4x4_transform_vector(&self.rotation_matrix(), offset);
        self.position = vec3_add(self.position, world_offset);
    }
}
