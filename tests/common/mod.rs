#![allow(dead_code)]

use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::atomic::{ AtomicUsize, Ordering };

use glscene::engine::config::{ SceneConfig, ShaderConfig };

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory removed on drop.
pub struct AssetDir {
    path: PathBuf,
}

impl AssetDir {
    pub fn new(name: &str) -> Self {
        let unique = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("glscene_{}_{}_{}", name, std::process::id(), unique));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let file = self.path.join(name);
        fs::write(&file, contents).unwrap();
        file
    }

    /// Writes a vertex/fragment pair and returns a config section pointing at it.
    pub fn shaders(&self, fragment_source: &str) -> ShaderConfig {
        ShaderConfig {
            vertex: path_string(&self.write("shader.vert", "void main() {}")),
            fragment: path_string(&self.write("shader.frag", fragment_source)),
        }
    }

    /// An empty scene that only needs the two shader files.
    pub fn empty_scene(&self) -> SceneConfig {
        SceneConfig {
            shaders: self.shaders("void main() {}"),
            models: Vec::new(),
            lights: Vec::new(),
            emitters: Vec::new(),
            ..SceneConfig::default()
        }
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.path).ok();
    }
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub const TRIANGLE_MESH: &str = r#"<mesh>
  <buffers>
    <buffer>
      <indices>0,1,2</indices>
      <coords>0,0,0, 1,0,0, 0,1,0</coords>
    </buffer>
  </buffers>
</mesh>"#;

/// `count` buffers, buffer `i` being a triangle shifted `i` units along X.
pub fn multi_buffer_mesh(count: usize) -> String {
    let buffers: String = (0..count)
        .map(|i| {
            format!(
                "<buffer><indices>0,1,2</indices><coords>{x},0,0,{x1},0,0,{x},1,0</coords></buffer>",
                x = i,
                x1 = i + 1
            )
        })
        .collect();
    format!("<mesh><buffers>{}</buffers></mesh>", buffers)
}
