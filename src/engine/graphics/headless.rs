//! Headless graphics device that records every call instead of touching a GPU.

use std::cell::{ Cell, RefCell };
use std::collections::{ HashMap, HashSet };

use super::device::{
    BlendFactor,
    GeometryId,
    GraphicsDevice,
    ProgramId,
    ShaderStage,
    TextureId,
    UniformLocation,
};
use crate::engine::utils::math::Mat4x4;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    UseProgram(ProgramId),
    UniformI32(String, i32),
    UniformF32(String, f32),
    UniformVec3(String, [f32; 3]),
    UniformVec4(String, [f32; 4]),
    UniformMat4(String, Mat4x4),
    BindGeometry(GeometryId),
    VertexAttrib { location: u32, components: i32, offset: i32 },
    DrawTriangles(i32),
    BindTexture { unit: u32, texture: TextureId },
    BlendFunc(BlendFactor, BlendFactor),
    FaceCulling(bool),
    DepthMask(bool),
    Viewport([i32; 4]),
    Clear([f32; 3]),
    DeleteShader(u32),
    DeleteProgram(ProgramId),
    DeleteGeometry(GeometryId),
    DeleteTexture(TextureId),
}

/// Programs "declare" every uniform and attribute unless a declaration list is
/// installed with [`RecordingDevice::declare_uniforms`]. Shader sources containing
/// `#error` fail to compile.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    calls: RefCell<Vec<DeviceCall>>,
    declared_uniforms: RefCell<Option<HashSet<String>>>,
    locations: RefCell<HashMap<String, u32>>,
    geometry: RefCell<HashMap<GeometryId, (usize, usize)>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the uniforms every program declares to `names`.
    pub fn declare_uniforms(&self, names: &[&str]) {
        *self.declared_uniforms.borrow_mut() = Some(names.iter().map(|name| name.to_string()).collect());
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Byte sizes of the vertex and index data uploaded for `geometry`.
    pub fn geometry_sizes(&self, geometry: GeometryId) -> Option<(usize, usize)> {
        self.geometry.borrow().get(&geometry).copied()
    }

    /// All uploads made to the uniform `name`, in call order.
    pub fn uniform_uploads(&self, name: &str) -> Vec<DeviceCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| match call {
                DeviceCall::UniformI32(n, _)
                | DeviceCall::UniformF32(n, _)
                | DeviceCall::UniformVec3(n, _)
                | DeviceCall::UniformVec4(n, _)
                | DeviceCall::UniformMat4(n, _) => n == name,
                _ => false,
            })
            .cloned()
            .collect()
    }

    fn allocate(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn record(&self, call: DeviceCall) {
        self.calls.borrow_mut().push(call);
    }

    fn name_of(&self, location: &UniformLocation) -> String {
        self.locations
            .borrow()
            .iter()
            .find(|(_, id)| **id == location.0)
            .map(|(name, _)| name.clone())
            .unwrap_or_default()
    }
}

impl GraphicsDevice for RecordingDevice {
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        if source.contains("#error") {
            return Err(format!("Shader compile error: {:?} stage rejected", stage));
        }
        Ok(self.allocate())
    }

    fn link_program(&self, _vertex: u32, _fragment: u32) -> Result<ProgramId, String> {
        Ok(ProgramId(self.allocate()))
    }

    fn delete_shader(&self, shader: u32) {
        self.record(DeviceCall::DeleteShader(shader));
    }

    fn delete_program(&self, program: ProgramId) {
        self.record(DeviceCall::DeleteProgram(program));
    }

    fn use_program(&self, program: ProgramId) {
        self.record(DeviceCall::UseProgram(program));
    }

    fn uniform_location(&self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        if let Some(declared) = self.declared_uniforms.borrow().as_ref() {
            if !declared.contains(name) {
                return None;
            }
        }
        let mut locations = self.locations.borrow_mut();
        let next = locations.len() as u32;
        Some(UniformLocation(*locations.entry(name.to_string()).or_insert(next)))
    }

    fn attrib_location(&self, _program: ProgramId, name: &str) -> Option<u32> {
        match name {
            "vpos" => Some(0),
            "vtex" => Some(1),
            "vnormal" => Some(2),
            "vtangent" => Some(3),
            _ => None,
        }
    }

    fn uniform_i32(&self, location: &UniformLocation, value: i32) {
        self.record(DeviceCall::UniformI32(self.name_of(location), value));
    }

    fn uniform_f32(&self, location: &UniformLocation, value: f32) {
        self.record(DeviceCall::UniformF32(self.name_of(location), value));
    }

    fn uniform_vec3(&self, location: &UniformLocation, value: [f32; 3]) {
        self.record(DeviceCall::UniformVec3(self.name_of(location), value));
    }

    fn uniform_vec4(&self, location: &UniformLocation, value: [f32; 4]) {
        self.record(DeviceCall::UniformVec4(self.name_of(location), value));
    }

    fn uniform_mat4(&self, location: &UniformLocation, value: &Mat4x4) {
        self.record(DeviceCall::UniformMat4(self.name_of(location), *value));
    }

    fn create_geometry(&self, vertex_data: &[u8], index_data: &[u8]) -> Result<GeometryId, String> {
        let geometry = GeometryId {
            vertex_array: self.allocate(),
            vertex_buffer: self.allocate(),
            index_buffer: self.allocate(),
        };
        self.geometry.borrow_mut().insert(geometry, (vertex_data.len(), index_data.len()));
        Ok(geometry)
    }

    fn bind_geometry(&self, geometry: GeometryId) {
        self.record(DeviceCall::BindGeometry(geometry));
    }

    fn vertex_attrib(&self, location: u32, components: i32, _stride: i32, offset: i32) {
        self.record(DeviceCall::VertexAttrib { location, components, offset });
    }

    fn draw_triangles(&self, index_count: i32) {
        self.record(DeviceCall::DrawTriangles(index_count));
    }

    fn delete_geometry(&self, geometry: GeometryId) {
        self.geometry.borrow_mut().remove(&geometry);
        self.record(DeviceCall::DeleteGeometry(geometry));
    }

    fn create_texture(&self, _width: u32, _height: u32, _rgba: &[u8]) -> Result<TextureId, String> {
        Ok(TextureId(self.allocate()))
    }

    fn bind_texture(&self, unit: u32, texture: TextureId) {
        self.record(DeviceCall::BindTexture { unit, texture });
    }

    fn delete_texture(&self, texture: TextureId) {
        self.record(DeviceCall::DeleteTexture(texture));
    }

    fn blend_func(&self, src: BlendFactor, dst: BlendFactor) {
        self.record(DeviceCall::BlendFunc(src, dst));
    }

    fn set_face_culling(&self, enabled: bool) {
        self.record(DeviceCall::FaceCulling(enabled));
    }

    fn depth_mask(&self, enabled: bool) {
        self.record(DeviceCall::DepthMask(enabled));
    }

    fn set_viewport(&self, viewport: [i32; 4]) {
        self.record(DeviceCall::Viewport(viewport));
    }

    fn clear(&self, color: [f32; 3]) {
        self.record(DeviceCall::Clear(color));
    }
}
