mod common;

use std::rc::Rc;

use common::{ path_string, AssetDir, TRIANGLE_MESH };
use glscene::engine::components::Entity;
use glscene::engine::config::{ EmitterConfig, LightConfig, ModelConfig, ModelRole };
use glscene::engine::error::{ SceneError, ShaderError };
use glscene::engine::graphics::{ DeviceCall, RecordingDevice };
use glscene::Scene;

fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-4)
}

#[test]
fn empty_scene_holds_only_the_camera() {
    let dir = AssetDir::new("empty_scene");
    let gl = RecordingDevice::new();

    let scene = Scene::build(&gl, &dir.empty_scene()).unwrap();

    assert_eq!(scene.world().num_entities(), 1);
    assert!(scene.world().camera().is_some());
    assert_eq!(scene.world().ambient(), [0.1; 3]);
}

#[test]
fn invalid_default_shader_aborts_the_scene() {
    let dir = AssetDir::new("bad_shader");
    let gl = RecordingDevice::new();
    let mut config = dir.empty_scene();
    config.shaders = dir.shaders("#error broken");

    let result = Scene::build(&gl, &config);

    assert!(matches!(result, Err(SceneError::Shader(ShaderError::Invalid(_)))));
}

#[test]
fn missing_shader_file_aborts_the_scene() {
    let dir = AssetDir::new("no_shader");
    let gl = RecordingDevice::new();
    let mut config = dir.empty_scene();
    config.shaders.fragment = path_string(&dir.path().join("missing.frag"));

    let result = Scene::build(&gl, &config);

    assert!(matches!(result, Err(SceneError::Shader(ShaderError::Io { .. }))));
}

#[test]
fn missing_mesh_names_the_failing_path() {
    let dir = AssetDir::new("no_mesh");
    let gl = RecordingDevice::new();
    let mut config = dir.empty_scene();
    let missing = path_string(&dir.path().join("missing.msh.xml"));
    config.models.push(ModelConfig::new(&missing, [0.0; 3]));

    match Scene::build(&gl, &config) {
        Err(SceneError::Mesh { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected a mesh error, got {:?}", other.err()),
    }
}

#[test]
fn models_sharing_a_file_share_one_mesh() {
    let dir = AssetDir::new("shared_mesh");
    let gl = RecordingDevice::new();
    let mesh_path = path_string(&dir.write("triangle.msh.xml", TRIANGLE_MESH));
    let mut config = dir.empty_scene();
    config.models.push(ModelConfig::new(&mesh_path, [-1.0, 0.0, 0.0]));
    config.models.push(ModelConfig::new(&mesh_path, [1.0, 0.0, 0.0]));

    let scene = Scene::build(&gl, &config).unwrap();

    assert_eq!(scene.world().num_entities(), 3);
    let mesh = scene.mesh(&mesh_path).unwrap();
    assert_eq!(Rc::strong_count(mesh), 3);
    assert_eq!(scene.world().entity(2).unwrap().borrow().position(), [1.0, 0.0, 0.0]);
}

#[test]
fn frame_orbits_the_camera_around_the_origin() {
    let dir = AssetDir::new("orbit");
    let gl = RecordingDevice::new();
    let mut scene = Scene::build(&gl, &dir.empty_scene()).unwrap();

    scene.frame(&gl, 640, 480, 0.5);

    assert!((scene.angle() - 16.0).abs() < 1e-4);
    let angle = 16.0_f32.to_radians();
    let eye = scene.camera().borrow().position();
    assert!(close(eye, [10.0 * angle.sin(), 0.0, 10.0 * angle.cos()]));
    assert_eq!(scene.camera().borrow().viewport(), [0, 0, 640, 480]);
    assert!(gl.calls().contains(&DeviceCall::Viewport([0, 0, 640, 480])));
}

#[test]
fn skybox_and_camera_light_follow_the_camera() {
    let dir = AssetDir::new("followers");
    let gl = RecordingDevice::new();
    let mesh_path = path_string(&dir.write("sky.msh.xml", TRIANGLE_MESH));
    let mut config = dir.empty_scene();
    config.models.push(ModelConfig { role: Some(ModelRole::Skybox), ..ModelConfig::new(&mesh_path, [0.0; 3]) });
    config.models.push(ModelConfig::new(&mesh_path, [0.0, 0.0, -4.0]));
    config.lights.push(LightConfig { follow_camera: true, ..LightConfig::default() });
    config.lights.push(LightConfig::default());

    let mut scene = Scene::build(&gl, &config).unwrap();
    scene.frame(&gl, 800, 600, 1.0);
    scene.frame(&gl, 800, 600, 1.0);

    let eye = scene.camera().borrow().position();
    let world = scene.world();
    assert!(close(world.entity(1).unwrap().borrow().position(), eye));
    assert_eq!(world.entity(2).unwrap().borrow().position(), [0.0, 0.0, -4.0]);
    assert!(close(world.lights()[0].borrow().position(), eye));
    assert_eq!(world.lights()[1].borrow().position(), [1.0; 3]);
}

#[test]
fn lit_models_receive_every_light() {
    let dir = AssetDir::new("lit");
    let gl = RecordingDevice::new();
    let mesh_path = path_string(&dir.write("triangle.msh.xml", TRIANGLE_MESH));
    let mut config = dir.empty_scene();
    config.models.push(ModelConfig::new(&mesh_path, [0.0; 3]));
    config.lights.push(LightConfig::default());
    config.lights.push(LightConfig::default());

    let mut scene = Scene::build(&gl, &config).unwrap();
    scene.frame(&gl, 800, 600, 0.016);

    assert_eq!(
        gl.uniform_uploads("numberLights"),
        vec![DeviceCall::UniformI32("numberLights".into(), 2)]
    );
    assert_eq!(gl.uniform_uploads("lights[1].color").len(), 1);
    assert!(gl.calls().contains(&DeviceCall::DrawTriangles(3)));
}

#[test]
fn configured_emitter_spawns_and_draws_particles() {
    let dir = AssetDir::new("emitter");
    let gl = RecordingDevice::new();
    let mut config = dir.empty_scene();
    config.emitters.push(EmitterConfig {
        rate_range: (10.5, 10.5),
        lifetime_range: (5.0, 5.0),
        ..EmitterConfig::default()
    });

    let mut scene = Scene::build(&gl, &config).unwrap();
    scene.frame(&gl, 800, 600, 1.0);

    let quads = gl
        .calls()
        .iter()
        .filter(|call| matches!(call, DeviceCall::DrawTriangles(6)))
        .count();
    assert_eq!(quads, 10);
    assert!(gl.calls().contains(&DeviceCall::DepthMask(false)));
}

#[test]
fn release_frees_shared_resources_once() {
    let dir = AssetDir::new("release");
    let gl = RecordingDevice::new();
    let mesh_path = path_string(&dir.write("triangle.msh.xml", TRIANGLE_MESH));
    let mut config = dir.empty_scene();
    config.models.push(ModelConfig::new(&mesh_path, [0.0; 3]));
    config.models.push(ModelConfig::new(&mesh_path, [2.0, 0.0, 0.0]));

    let scene = Scene::build(&gl, &config).unwrap();
    gl.clear_calls();
    scene.release(&gl);

    let calls = gl.calls();
    let count = |f: fn(&DeviceCall) -> bool| calls.iter().filter(|call| f(call)).count();
    assert_eq!(count(|call| matches!(call, DeviceCall::DeleteGeometry(_))), 1);
    assert_eq!(count(|call| matches!(call, DeviceCall::DeleteProgram(_))), 1);
}
