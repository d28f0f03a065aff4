pub mod buffer;
pub mod device;
pub mod headless;
pub mod shader;
pub mod texture;
pub mod vertex;

pub use buffer::Buffer;
pub use device::{ BlendFactor, BlendMode, GraphicsDevice, ProgramId, TextureId, UniformLocation };
pub use headless::{ DeviceCall, RecordingDevice };
pub use shader::Shader;
pub use texture::Texture;
pub use vertex::Vertex;
