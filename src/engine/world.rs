use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::components::{ Camera, Entity, Light };
use crate::engine::graphics::{ GraphicsDevice, Shader };
use crate::engine::render_context::RenderContext;
use crate::engine::utils::math::Vec3;

pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Owns every entity; insertion order is update and draw order. The camera
/// and lights are registered by role so nothing depends on their index.
#[derive(Default)]
pub struct World {
    entities: Vec<EntityRef>,
    camera: Option<Rc<RefCell<Camera>>>,
    lights: Vec<Rc<RefCell<Light>>>,
    ambient: Vec3,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: EntityRef) {
        self.entities.push(entity);
    }

    /// Adds the camera as an entity and makes it the active camera.
    pub fn add_camera(&mut self, camera: Rc<RefCell<Camera>>) {
        if self.camera.is_some() {
            log::warn!("Replacing the active camera");
        }
        self.entities.push(camera.clone());
        self.camera = Some(camera);
    }

    pub fn add_light(&mut self, light: Rc<RefCell<Light>>) {
        self.entities.push(light.clone());
        self.lights.push(light);
    }

    pub fn entity(&self, index: usize) -> Option<&EntityRef> {
        self.entities.get(index)
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn camera(&self) -> Option<&Rc<RefCell<Camera>>> {
        self.camera.as_ref()
    }

    pub fn lights(&self) -> &[Rc<RefCell<Light>>] {
        &self.lights
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn set_ambient(&mut self, ambient: Vec3) {
        self.ambient = ambient;
    }

    pub fn update(&mut self, delta_time: f32) {
        for entity in &self.entities {
            entity.borrow_mut().update(delta_time);
        }
    }

    /// Fills the frame context from the camera, lights and ambient, then draws
    /// every entity in insertion order.
    pub fn draw(&self, gl: &dyn GraphicsDevice, default_shader: &Rc<Shader>) {
        let Some(camera) = &self.camera else {
            log::warn!("World has no camera, skipping draw");
            return;
        };

        let mut ctx = RenderContext::new(default_shader.clone());
        ctx.ambient = self.ambient;
        ctx.lights = self.lights.iter().map(|light| light.borrow().params()).collect();
        camera.borrow().prepare(gl, &mut ctx);

        for entity in &self.entities {
            entity.borrow().draw(gl, &mut ctx);
        }
    }
}
