mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{ multi_buffer_mesh, AssetDir, TRIANGLE_MESH };
use glscene::engine::components::{ Camera, Mesh, Model };
use glscene::engine::error::MeshError;
use glscene::engine::graphics::{ DeviceCall, RecordingDevice, Shader, Vertex };
use glscene::World;

#[test]
fn triangle_file_loads_with_default_material() {
    let dir = AssetDir::new("triangle");
    let path = dir.write("triangle.msh.xml", TRIANGLE_MESH);
    let gl = RecordingDevice::new();

    let mesh = Mesh::load(&gl, &path).unwrap();

    assert_eq!(mesh.num_buffers(), 1);
    let buffer = mesh.buffer(0).unwrap();
    let positions: Vec<_> = buffer.vertices().iter().map(|v| v.position).collect();
    assert_eq!(positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    assert_eq!(buffer.indices(), &[0, 1, 2]);

    let material = mesh.material(0).unwrap();
    assert_eq!(material.color(), [1.0, 1.0, 1.0, 1.0]);
    assert_eq!(material.shininess(), 0);
    assert!(material.texture().is_none());
    assert!(material.culling());
    assert!(material.lighting());
    assert!(material.depth_write());
}

#[test]
fn buffers_keep_file_order() {
    let dir = AssetDir::new("ordered");
    let path = dir.write("three.msh.xml", &multi_buffer_mesh(3));
    let gl = RecordingDevice::new();

    let mesh = Mesh::load(&gl, &path).unwrap();

    assert_eq!(mesh.num_buffers(), 3);
    for i in 0..3 {
        assert_eq!(mesh.buffer(i).unwrap().vertices()[0].position, [i as f32, 0.0, 0.0]);
    }
    assert!(mesh.buffer(3).is_none());
}

#[test]
fn missing_indices_or_coords_fail_the_load() {
    let dir = AssetDir::new("broken");
    let gl = RecordingDevice::new();

    let no_indices = dir.write(
        "no_indices.msh.xml",
        "<mesh><buffers><buffer><coords>0,0,0,1,0,0,0,1,0</coords></buffer></buffers></mesh>"
    );
    assert!(matches!(Mesh::load(&gl, &no_indices), Err(MeshError::MissingField { field: "indices", .. })));

    let no_coords = dir.write(
        "no_coords.msh.xml",
        "<mesh><buffers><buffer><indices>0,1,2</indices></buffer></buffers></mesh>"
    );
    assert!(matches!(Mesh::load(&gl, &no_coords), Err(MeshError::MissingField { field: "coords", .. })));
}

#[test]
fn unreadable_or_malformed_files_are_errors() {
    let dir = AssetDir::new("malformed");
    let gl = RecordingDevice::new();

    assert!(matches!(Mesh::load(&gl, dir.path().join("absent.msh.xml")), Err(MeshError::Io { .. })));

    let bad_xml = dir.write("bad.msh.xml", "<mesh><buffers>");
    assert!(matches!(Mesh::load(&gl, &bad_xml), Err(MeshError::Xml(_))));
}

#[test]
fn texture_is_loaded_next_to_the_mesh() {
    let dir = AssetDir::new("textured");
    image::RgbaImage::from_pixel(2, 4, image::Rgba([255, 0, 0, 255]))
        .save(dir.path().join("red.png"))
        .unwrap();
    let path = dir.write(
        "textured.msh.xml",
        r#"<mesh><buffers><buffer>
            <material><texture>red.png</texture></material>
            <indices>0,1,2</indices>
            <coords>0,0,0,1,0,0,0,1,0</coords>
            <texcoords>0,0,1,0,0,1</texcoords>
        </buffer></buffers></mesh>"#
    );
    let gl = RecordingDevice::new();

    let mesh = Mesh::load(&gl, &path).unwrap();

    let texture = mesh.material(0).unwrap().texture().unwrap();
    assert_eq!((texture.width(), texture.height()), (2, 4));
    assert_eq!(mesh.buffer(0).unwrap().vertices()[1].tex_coords, [1.0, 0.0]);
}

#[test]
fn missing_texture_leaves_buffer_untextured() {
    let dir = AssetDir::new("untextured");
    let path = dir.write(
        "lost.msh.xml",
        r#"<mesh><buffers><buffer>
            <material><texture>nowhere.png</texture></material>
            <indices>0,1,2</indices>
            <coords>0,0,0,1,0,0,0,1,0</coords>
        </buffer></buffers></mesh>"#
    );
    let gl = RecordingDevice::new();

    let mesh = Mesh::load(&gl, &path).unwrap();

    assert_eq!(mesh.num_buffers(), 1);
    assert!(mesh.material(0).unwrap().texture().is_none());
}

#[test]
fn loaded_mesh_draws_through_a_model() {
    let dir = AssetDir::new("drawn");
    let path = dir.write("triangle.msh.xml", TRIANGLE_MESH);
    let gl = RecordingDevice::new();
    let shader = Rc::new(Shader::create(&gl, "void main() {}", "void main() {}"));
    let mesh = Rc::new(Mesh::load(&gl, &path).unwrap());
    let geometry = mesh.buffer(0).unwrap().geometry();

    let mut world = World::new();
    world.add_camera(Rc::new(RefCell::new(Camera::new())));
    world.add_entity(Rc::new(RefCell::new(Model::new(mesh))));
    world.draw(&gl, &shader);

    assert_eq!(gl.geometry_sizes(geometry), Some((3 * Vertex::STRIDE as usize, 3 * 2)));
    let calls = gl.calls();
    let bind = calls.iter().position(|call| *call == DeviceCall::BindGeometry(geometry)).unwrap();
    let draw = calls.iter().position(|call| *call == DeviceCall::DrawTriangles(3)).unwrap();
    assert!(bind < draw);
}
