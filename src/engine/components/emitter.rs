use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };

use crate::engine::components::entity::Entity;
use crate::engine::components::material::Material;
use crate::engine::components::transform::Transform;
use crate::engine::error::GraphicsError;
use crate::engine::graphics::{ Buffer, GraphicsDevice, Vertex };
use crate::engine::render_context::RenderContext;
use crate::engine::utils::math::{
    lerp,
    mat4x4_mul,
    mat4x4_rot_z,
    mat4x4_scale,
    mat4x4_translate,
    mat4x4_transpose,
    vec3_add,
    vec3_scale,
    Vec3,
    Vec4,
};

#[derive(Debug, Clone, PartialEq)]
struct Particle {
    position: Vec3,
    velocity: Vec3,
    rotation: f32,
    spin_velocity: f32,
    scale: f32,
    color: Vec4,
    lifetime: f32,
    remaining: f32,
}

impl Particle {
    fn update(&mut self, delta_time: f32) {
        self.position = vec3_add(self.position, vec3_scale(self.velocity, delta_time));
        self.rotation += self.spin_velocity * delta_time;
        self.remaining -= delta_time;
    }

    fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Spawns camera-facing particles at its position. Every value of a new
/// particle is drawn uniformly from the configured `(min, max)` ranges.
#[derive(Debug)]
pub struct Emitter {
    transform: Transform,
    material: Material,
    quad: Rc<Buffer>,
    color_range: (Vec4, Vec4),
    lifetime_range: (f32, f32),
    rate_range: (f32, f32),
    scale_range: (f32, f32),
    velocity_range: (Vec3, Vec3),
    spin_range: (f32, f32),
    emitting: bool,
    pending: f32,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl Emitter {
    pub fn new(gl: &dyn GraphicsDevice, material: Material) -> Result<Self, GraphicsError> {
        Self::with_rng(gl, material, StdRng::from_entropy())
    }

    pub fn with_seed(gl: &dyn GraphicsDevice, material: Material, seed: u64) -> Result<Self, GraphicsError> {
        Self::with_rng(gl, material, StdRng::seed_from_u64(seed))
    }

    fn with_rng(gl: &dyn GraphicsDevice, mut material: Material, rng: StdRng) -> Result<Self, GraphicsError> {
        material.set_lighting(false);
        material.set_culling(false);
        material.set_depth_write(false);

        Ok(Self {
            transform: Transform::default(),
            material,
            quad: Rc::new(Self::create_quad(gl)?),
            color_range: ([1.0; 4], [1.0; 4]),
            lifetime_range: (1.0, 1.0),
            rate_range: (10.0, 10.0),
            scale_range: (1.0, 1.0),
            velocity_range: ([0.0; 3], [0.0; 3]),
            spin_range: (0.0, 0.0),
            emitting: true,
            pending: 0.0,
            particles: Vec::new(),
            rng,
        })
    }

    fn create_quad(gl: &dyn GraphicsDevice) -> Result<Buffer, GraphicsError> {
        let corner = |x: f32, y: f32, u: f32, v: f32| Vertex {
            position: [x, y, 0.0],
            tex_coords: [u, v],
            normal: [0.0, 0.0, 1.0],
            tangent: [1.0, 0.0, 0.0],
        };
        let vertices = vec![
            corner(-0.5, -0.5, 0.0, 0.0),
            corner(0.5, -0.5, 1.0, 0.0),
            corner(0.5, 0.5, 1.0, 1.0),
            corner(-0.5, 0.5, 0.0, 1.0)
        ];
        Buffer::create(gl, vertices, vec![0, 1, 2, 0, 2, 3])
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn set_color_range(&mut self, min: Vec4, max: Vec4) {
        self.color_range = (min, max);
    }

    pub fn set_lifetime_range(&mut self, min: f32, max: f32) {
        self.lifetime_range = (min, max);
    }

    /// Particles per second.
    pub fn set_rate_range(&mut self, min: f32, max: f32) {
        self.rate_range = (min, max);
    }

    pub fn set_scale_range(&mut self, min: f32, max: f32) {
        self.scale_range = (min, max);
    }

    pub fn set_velocity_range(&mut self, min: Vec3, max: Vec3) {
        self.velocity_range = (min, max);
    }

    /// Degrees per second around the view axis.
    pub fn set_spin_velocity_range(&mut self, min: f32, max: f32) {
        self.spin_range = (min, max);
    }

    pub fn emit(&mut self, enable: bool) {
        self.emitting = enable;
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Frees the particle quad and the material's texture.
    pub fn release(&self, gl: &dyn GraphicsDevice) {
        self.quad.release(gl);
        if let Some(texture) = self.material.texture() {
            texture.release(gl);
        }
    }

    fn random_between(&mut self, min: f32, max: f32) -> f32 {
        lerp(min, max, self.rng.gen::<f32>())
    }

    fn spawn(&mut self) -> Particle {
        let (color_min, color_max) = self.color_range;
        let (velocity_min, velocity_max) = self.velocity_range;

        let mut color = [0.0; 4];
        for (i, channel) in color.iter_mut().enumerate() {
            *channel = self.random_between(color_min[i], color_max[i]);
        }
        let mut velocity = [0.0; 3];
        for (i, axis) in velocity.iter_mut().enumerate() {
            *axis = self.random_between(velocity_min[i], velocity_max[i]);
        }
        let lifetime = self.random_between(self.lifetime_range.0, self.lifetime_range.1);

        Particle {
            position: self.transform.position(),
            velocity,
            rotation: 0.0,
            spin_velocity: self.random_between(self.spin_range.0, self.spin_range.1),
            scale: self.random_between(self.scale_range.0, self.scale_range.1),
            color,
            lifetime,
            remaining: lifetime,
        }
    }
}

impl Entity for Emitter {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn update(&mut self, delta_time: f32) {
        for particle in &mut self.particles {
            particle.update(delta_time);
        }
        self.particles.retain(|particle| particle.remaining > 0.0);

        if self.emitting {
            let rate = self.random_between(self.rate_range.0, self.rate_range.1);
            self.pending += rate.max(0.0) * delta_time;
            while self.pending >= 1.0 {
                self.pending -= 1.0;
                let particle = self.spawn();
                self.particles.push(particle);
            }
        }
    }

    fn draw(&self, gl: &dyn GraphicsDevice, ctx: &mut RenderContext) {
        // Inverse of the view rotation turns the quad towards the camera
        let mut billboard = mat4x4_transpose(ctx.view);
        billboard[12] = 0.0;
        billboard[13] = 0.0;
        billboard[14] = 0.0;

        for particle in &self.particles {
            let [x, y, z] = particle.position;
            let spin_and_scale = mat4x4_mul(
                mat4x4_rot_z(particle.rotation.to_radians()),
                mat4x4_scale(particle.scale, particle.scale, particle.scale)
            );
            ctx.model = mat4x4_mul(mat4x4_translate(x, y, z), mat4x4_mul(billboard, spin_and_scale));

            let mut material = self.material.clone();
            let [r, g, b, a] = particle.color;
            material.set_color([r, g, b, a * particle.alpha()]);

            let shader = material.shader(ctx);
            shader.bind(gl);
            material.prepare(gl, ctx);
            self.quad.draw(gl, shader);
        }
    }
}
