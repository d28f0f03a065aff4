use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::components::{ Camera, Emitter, Entity, Light, Material, Mesh, Model };
use crate::engine::config::{ EmitterConfig, ModelRole, SceneConfig };
use crate::engine::error::{ SceneError, ShaderError };
use crate::engine::graphics::{ GraphicsDevice, Shader, Texture };
use crate::engine::world::{ EntityRef, World };

/// A world assembled from a [`SceneConfig`] plus the per-frame camera orbit.
pub struct Scene {
    world: World,
    default_shader: Rc<Shader>,
    camera: Rc<RefCell<Camera>>,
    meshes: HashMap<String, Rc<Mesh>>,
    emitters: Vec<Rc<RefCell<Emitter>>>,
    /// Entities recentred on the camera every frame (skybox, camera light).
    followers: Vec<EntityRef>,
    orbit_speed: f32,
    orbit_distance: f32,
    fov: f32,
    near: f32,
    far: f32,
    angle: f32,
}

impl Scene {
    pub fn build(gl: &dyn GraphicsDevice, config: &SceneConfig) -> Result<Self, SceneError> {
        let shader = Shader::load(gl, &config.shaders.vertex, &config.shaders.fragment)?;
        if !shader.is_valid() {
            return Err(ShaderError::Invalid(shader.error().to_string()).into());
        }
        let default_shader = Rc::new(shader);

        let mut world = World::new();
        world.set_ambient(config.ambient);

        let camera = Rc::new(RefCell::new(Camera::new()));
        {
            let mut camera = camera.borrow_mut();
            let [width, height] = [config.window.width as i32, config.window.height as i32];
            camera.set_viewport([0, 0, width, height]);
            camera.set_clear_color(config.camera.clear_color);
        }
        world.add_camera(camera.clone());

        let mut meshes: HashMap<String, Rc<Mesh>> = HashMap::new();
        let mut followers: Vec<EntityRef> = Vec::new();

        for model_config in &config.models {
            let mesh = match meshes.get(&model_config.mesh) {
                Some(mesh) => mesh.clone(),
                None => {
                    let mesh = Mesh::load(gl, &model_config.mesh).map_err(|source| SceneError::Mesh {
                        path: model_config.mesh.clone(),
                        source,
                    })?;
                    let mesh = Rc::new(mesh);
                    meshes.insert(model_config.mesh.clone(), mesh.clone());
                    mesh
                }
            };

            let mut model = Model::new(mesh);
            *model.transform_mut() = model_config.transform.clone();
            let model = Rc::new(RefCell::new(model));
            if model_config.role == Some(ModelRole::Skybox) {
                followers.push(model.clone());
            }
            world.add_entity(model);
        }

        for light_config in &config.lights {
            let light = Rc::new(
                RefCell::new(
                    Light::new(
                        light_config.position,
                        light_config.kind.into(),
                        light_config.color,
                        light_config.linear_attenuation,
                        light_config.direction
                    )
                )
            );
            if light_config.follow_camera {
                followers.push(light.clone());
            }
            world.add_light(light);
        }

        let mut emitters = Vec::new();
        for emitter_config in &config.emitters {
            let emitter = Rc::new(RefCell::new(Self::build_emitter(gl, emitter_config)?));
            world.add_entity(emitter.clone());
            emitters.push(emitter);
        }

        log::info!(
            "✅ Scene ready: {} entities, {} meshes, {} lights",
            world.num_entities(),
            meshes.len(),
            world.lights().len()
        );

        Ok(Self {
            world,
            default_shader,
            camera,
            meshes,
            emitters,
            followers,
            orbit_speed: config.camera.orbit_speed,
            orbit_distance: config.camera.orbit_distance,
            fov: config.camera.fov,
            near: config.camera.near,
            far: config.camera.far,
            angle: 0.0,
        })
    }

    fn build_emitter(gl: &dyn GraphicsDevice, config: &EmitterConfig) -> Result<Emitter, SceneError> {
        let texture = config.texture.as_ref().and_then(|path| {
            match Texture::load(gl, path) {
                Ok(texture) => Some(Rc::new(texture)),
                Err(e) => {
                    log::warn!("{}; emitter particles drawn untextured", e);
                    None
                }
            }
        });

        let mut material = Material::new(texture, None);
        material.set_blend_mode(config.blend_mode);

        let mut emitter = Emitter::new(gl, material)?;
        emitter.set_position(config.position);
        emitter.set_color_range(config.color_range.0, config.color_range.1);
        emitter.set_lifetime_range(config.lifetime_range.0, config.lifetime_range.1);
        emitter.set_rate_range(config.rate_range.0, config.rate_range.1);
        emitter.set_scale_range(config.scale_range.0, config.scale_range.1);
        emitter.set_velocity_range(config.velocity_range.0, config.velocity_range.1);
        emitter.set_spin_velocity_range(config.spin_velocity_range.0, config.spin_velocity_range.1);
        emitter.emit(config.emitting);
        Ok(emitter)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn camera(&self) -> &Rc<RefCell<Camera>> {
        &self.camera
    }

    pub fn default_shader(&self) -> &Rc<Shader> {
        &self.default_shader
    }

    pub fn mesh(&self, path: &str) -> Option<&Rc<Mesh>> {
        self.meshes.get(path)
    }

    /// Current orbit angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances the orbit, fits the camera to the framebuffer, then updates
    /// and draws the world.
    pub fn frame(&mut self, gl: &dyn GraphicsDevice, width: u32, height: u32, delta_time: f32) {
        self.angle += self.orbit_speed * delta_time;

        let eye = {
            let mut camera = self.camera.borrow_mut();
            camera.set_viewport([0, 0, width as i32, height as i32]);
            camera.set_position([0.0; 3]);
            camera.set_rotation([0.0, self.angle, 0.0]);
            camera.move_by([0.0, 0.0, self.orbit_distance]);
            camera.set_perspective(self.fov, self.near, self.far);
            camera.position()
        };

        for follower in &self.followers {
            follower.borrow_mut().set_position(eye);
        }

        self.world.update(delta_time);
        self.world.draw(gl, &self.default_shader);
    }

    /// Frees every GPU resource the scene owns.
    pub fn release(self, gl: &dyn GraphicsDevice) {
        for mesh in self.meshes.values() {
            mesh.release(gl);
        }
        for emitter in &self.emitters {
            emitter.borrow().release(gl);
        }
        self.default_shader.release(gl);
        log::info!("Scene released");
    }
}
