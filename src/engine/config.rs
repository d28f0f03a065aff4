use std::fs;
use std::path::Path;

use serde::{ Deserialize, Serialize };

use crate::engine::components::{ LightKind, Transform };
use crate::engine::error::ConfigError;
use crate::engine::graphics::BlendMode;
use crate::engine::utils::math::{ Vec3, Vec4 };

pub const DEFAULT_CONFIG_PATH: &str = "data/scene.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "U-gine".to_string(),
            fullscreen: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: "data/shader.vert".to_string(),
            fragment: "data/shader.frag".to_string(),
        }
    }
}

/// The camera orbits the origin around the Y axis at `orbit_speed` degrees
/// per second, `orbit_distance` units away.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub orbit_speed: f32,
    pub orbit_distance: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_speed: 32.0,
            orbit_distance: 10.0,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            clear_color: [0.0; 3],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    /// Recentred on the camera every frame.
    Skybox,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ModelConfig {
    pub mesh: String,
    pub transform: Transform,
    pub role: Option<ModelRole>,
}

impl ModelConfig {
    pub fn new(mesh: &str, position: Vec3) -> Self {
        Self {
            mesh: mesh.to_string(),
            transform: Transform { position, ..Transform::default() },
            role: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LightKindConfig {
    Directional,
    Point,
}

impl From<LightKindConfig> for LightKind {
    fn from(kind: LightKindConfig) -> Self {
        match kind {
            LightKindConfig::Directional => LightKind::Directional,
            LightKindConfig::Point => LightKind::Point,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub kind: LightKindConfig,
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub linear_attenuation: f32,
    pub follow_camera: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            kind: LightKindConfig::Point,
            position: [1.0; 3],
            direction: [1.0; 3],
            color: [1.0; 3],
            linear_attenuation: 0.0,
            follow_camera: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EmitterConfig {
    pub position: Vec3,
    pub texture: Option<String>,
    pub blend_mode: BlendMode,
    pub color_range: (Vec4, Vec4),
    pub lifetime_range: (f32, f32),
    pub rate_range: (f32, f32),
    pub scale_range: (f32, f32),
    pub velocity_range: (Vec3, Vec3),
    pub spin_velocity_range: (f32, f32),
    pub emitting: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            texture: None,
            blend_mode: BlendMode::Add,
            color_range: ([1.0; 4], [1.0; 4]),
            lifetime_range: (1.0, 1.0),
            rate_range: (10.0, 10.0),
            scale_range: (1.0, 1.0),
            velocity_range: ([0.0; 3], [0.0; 3]),
            spin_velocity_range: (0.0, 0.0),
            emitting: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub camera: CameraConfig,
    pub ambient: Vec3,
    pub models: Vec<ModelConfig>,
    pub lights: Vec<LightConfig>,
    pub emitters: Vec<EmitterConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shaders: ShaderConfig::default(),
            camera: CameraConfig::default(),
            ambient: [0.1; 3],
            models: vec![
                ModelConfig { role: Some(ModelRole::Skybox), ..ModelConfig::new("data/skybox.msh.xml", [0.0; 3]) },
                ModelConfig::new("data/suzanne_refract.msh.xml", [-4.0, 0.0, 0.0]),
                ModelConfig::new("data/teapot_reflect.msh.xml", [4.0, 0.0, 0.0]),
                ModelConfig::new("data/cube.msh.xml", [0.0, 0.0, -4.0])
            ],
            lights: vec![LightConfig { follow_camera: true, ..LightConfig::default() }],
            emitters: Vec::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads `path` when it exists, otherwise falls back to the built-in demo scene.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No scene config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("✅ Loaded scene config {}", path.display());
        Ok(config)
    }
}
