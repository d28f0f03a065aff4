use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error("Failed to create GPU geometry: {0}")]
    Geometry(String),

    #[error("Failed to create GPU texture: {0}")]
    Texture(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("Failed to read shader source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shader program is invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Failed to read mesh file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed mesh XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Buffer {buffer} has no <{field}> data")]
    MissingField { buffer: usize, field: &'static str },

    #[error("Buffer {buffer}: invalid number {token:?} in <{field}>")]
    InvalidNumber { buffer: usize, field: &'static str, token: String },

    #[error("Buffer {buffer}: <color> needs 4 components, found {found}")]
    InvalidColor { buffer: usize, found: usize },

    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("Failed to load mesh {path}: {source}")]
    Mesh {
        path: String,
        #[source]
        source: MeshError,
    },

    #[error(transparent)]
    Graphics(#[from] GraphicsError),
}
