pub mod mesh_loader;

pub use mesh_loader::{ parse_mesh, BufferSource };
