use bytemuck::{ Pod, Zeroable };

/// Interleaved vertex layout shared by every buffer. Attributes a mesh file
/// does not provide stay zeroed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
}

impl Vertex {
    pub const STRIDE: i32 = std::mem::size_of::<Vertex>() as i32;
    pub const POSITION_OFFSET: i32 = 0;
    pub const TEX_COORDS_OFFSET: i32 = 12;
    pub const NORMAL_OFFSET: i32 = 20;
    pub const TANGENT_OFFSET: i32 = 32;

    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
