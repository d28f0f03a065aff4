//! Parser for `.msh.xml` mesh files:
//!
//! ```xml
//! <mesh><buffers><buffer>
//!   <material><texture>wood.png</texture><color>1,1,1,1</color><shininess>32</shininess></material>
//!   <indices>0,1,2</indices>
//!   <coords>0,0,0,1,0,0,0,1,0</coords>
//!   <texcoords>0,0,1,0,0,1</texcoords>
//!   <normals>...</normals>
//!   <tangents>...</tangents>
//! </buffer></buffers></mesh>
//! ```
//!
//! Attribute presence is tracked per file, not per buffer: once any buffer has
//! a texture, normals or tangents, every later buffer is read as having them too.
//! Streams that run short are padded with zeros.

use std::path::{ Path, PathBuf };
use std::str::FromStr;

use roxmltree::Node;

use crate::engine::error::MeshError;
use crate::engine::graphics::Vertex;
use crate::engine::utils::math::Vec4;

/// One `<buffer>` block, decoded but not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSource {
    pub texture_path: Option<PathBuf>,
    pub color: Vec4,
    pub shininess: u8,
    pub indices: Vec<u16>,
    pub vertices: Vec<Vertex>,
}

/// Attribute streams seen so far in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeFlags {
    pub texture: bool,
    pub normals: bool,
    pub tangents: bool,
}

/// Directory a mesh file's texture paths are relative to. Backslashes are
/// treated as separators.
pub fn asset_directory(mesh_path: &str) -> PathBuf {
    let normalized = mesh_path.replace('\\', "/");
    Path::new(&normalized)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

pub fn parse_mesh(xml: &str, base_dir: &Path) -> Result<Vec<BufferSource>, MeshError> {
    let doc = roxmltree::Document::parse(xml)?;

    let Some(buffers_node) = child(doc.root(), "mesh").and_then(|mesh| child(mesh, "buffers")) else {
        log::warn!("Mesh document has no <mesh><buffers> section, loading an empty mesh");
        return Ok(Vec::new());
    };

    let mut flags = AttributeFlags::default();
    let mut sources = Vec::new();

    for (index, buffer_node) in buffers_node
        .children()
        .filter(|n| n.has_tag_name("buffer"))
        .enumerate()
    {
        sources.push(parse_buffer(index, buffer_node, base_dir, &mut flags)?);
    }

    Ok(sources)
}

fn parse_buffer(
    index: usize,
    buffer_node: Node,
    base_dir: &Path,
    flags: &mut AttributeFlags
) -> Result<BufferSource, MeshError> {
    let material_node = child(buffer_node, "material");
    let material_field = |name: &str| material_node.map(|m| text_of(m, name)).unwrap_or("");

    let texture_name = material_field("texture").trim();
    let texture_path = if texture_name.is_empty() {
        None
    } else {
        flags.texture = true;
        Some(base_dir.join(texture_name))
    };

    let color = match material_field("color").trim() {
        "" => [1.0; 4],
        text => {
            let components: Vec<f32> = parse_list(index, "color", text)?;
            match components.as_slice() {
                [r, g, b, a, ..] => [*r, *g, *b, *a],
                _ => return Err(MeshError::InvalidColor { buffer: index, found: components.len() }),
            }
        }
    };

    let shininess = match material_field("shininess").trim() {
        "" => 0,
        text => {
            // Fractional values are truncated, so "32.0" reads as 32
            let value: f32 = parse_token(index, "shininess", text)?;
            value.trunc().clamp(0.0, f32::from(u8::MAX)) as u8
        }
    };

    let indices_text = text_of(buffer_node, "indices");
    if indices_text.trim().is_empty() {
        return Err(MeshError::MissingField { buffer: index, field: "indices" });
    }
    let indices: Vec<u16> = parse_list(index, "indices", indices_text)?;

    let coords_text = text_of(buffer_node, "coords");
    if coords_text.trim().is_empty() {
        return Err(MeshError::MissingField { buffer: index, field: "coords" });
    }
    let coords: Vec<f32> = parse_list(index, "coords", coords_text)?;

    let tex_coords: Vec<f32> = if flags.texture {
        parse_list(index, "texcoords", text_of(buffer_node, "texcoords"))?
    } else {
        Vec::new()
    };

    let normals: Vec<f32> = parse_list(index, "normals", text_of(buffer_node, "normals"))?;
    if !normals.is_empty() {
        flags.normals = true;
    }

    let tangents: Vec<f32> = parse_list(index, "tangents", text_of(buffer_node, "tangents"))?;
    if !tangents.is_empty() {
        flags.tangents = true;
    }

    let vertices = build_vertices(&coords, &tex_coords, &normals, &tangents, *flags);

    Ok(BufferSource { texture_path, color, shininess, indices, vertices })
}

/// Walks `coords` three floats at a time, pulling 2/3/3 floats from the other
/// streams for every attribute flagged present.
pub fn build_vertices(
    coords: &[f32],
    tex_coords: &[f32],
    normals: &[f32],
    tangents: &[f32],
    flags: AttributeFlags
) -> Vec<Vertex> {
    if coords.len() % 3 != 0 {
        log::warn!("Coordinate list has {} floats, ignoring the trailing partial vertex", coords.len());
    }

    let at = |stream: &[f32], i: usize| stream.get(i).copied().unwrap_or(0.0);

    coords
        .chunks_exact(3)
        .enumerate()
        .map(|(i, position)| {
            let mut vertex = Vertex::new([position[0], position[1], position[2]]);
            if flags.texture {
                vertex.tex_coords = [at(tex_coords, i * 2), at(tex_coords, i * 2 + 1)];
            }
            if flags.normals {
                vertex.normal = [at(normals, i * 3), at(normals, i * 3 + 1), at(normals, i * 3 + 2)];
            }
            if flags.tangents {
                vertex.tangent = [at(tangents, i * 3), at(tangents, i * 3 + 1), at(tangents, i * 3 + 2)];
            }
            vertex
        })
        .collect()
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn text_of<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    child(node, name).and_then(|n| n.text()).unwrap_or("")
}

fn parse_token<T: FromStr>(buffer: usize, field: &'static str, token: &str) -> Result<T, MeshError> {
    token.trim().parse().map_err(|_| MeshError::InvalidNumber {
        buffer,
        field,
        token: token.trim().to_string(),
    })
}

/// Comma separated scalars. An empty string is an empty list and a single
/// trailing comma is tolerated.
fn parse_list<T: FromStr>(buffer: usize, field: &'static str, text: &str) -> Result<Vec<T>, MeshError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let text = text.strip_suffix(',').unwrap_or(text);
    text.split(',').map(|token| parse_token(buffer, field, token)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Vec<BufferSource>, MeshError> {
        parse_mesh(xml, Path::new("data"))
    }

    #[test]
    fn reads_buffers_in_file_order() {
        let xml = r#"<mesh><buffers>
            <buffer><indices>0,1,2</indices><coords>0,0,0,1,0,0,0,1,0</coords></buffer>
            <buffer><material><shininess>12</shininess></material><indices>0</indices><coords>5,5,5</coords></buffer>
        </buffers></mesh>"#;

        let sources = parse(xml).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].vertices.len(), 3);
        assert_eq!(sources[1].vertices[0].position, [5.0, 5.0, 5.0]);
        assert_eq!(sources[1].shininess, 12);
    }

    #[test]
    fn missing_indices_or_coords_fail_the_whole_mesh() {
        let no_indices = "<mesh><buffers><buffer><coords>0,0,0</coords></buffer></buffers></mesh>";
        assert!(matches!(parse(no_indices), Err(MeshError::MissingField { field: "indices", .. })));

        let no_coords = r#"<mesh><buffers>
            <buffer><indices>0</indices><coords>0,0,0</coords></buffer>
            <buffer><material><color>1,0,0,1</color></material><indices>0</indices></buffer>
        </buffers></mesh>"#;
        assert!(matches!(parse(no_coords), Err(MeshError::MissingField { buffer: 1, field: "coords" })));
    }

    #[test]
    fn material_fields_default_when_absent() {
        let xml = "<mesh><buffers><buffer><indices>0</indices><coords>1,2,3</coords></buffer></buffers></mesh>";
        let source = &parse(xml).unwrap()[0];
        assert_eq!(source.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(source.shininess, 0);
        assert_eq!(source.texture_path, None);
    }

    #[test]
    fn texture_is_resolved_against_mesh_directory() {
        let xml = r#"<mesh><buffers><buffer>
            <material><texture>wood.png</texture><color>0.5, 0.5, 0.5, 1</color></material>
            <indices>0</indices><coords>0,0,0</coords><texcoords>0.25,0.75</texcoords>
        </buffer></buffers></mesh>"#;
        let source = &parse(xml).unwrap()[0];
        assert_eq!(source.texture_path, Some(PathBuf::from("data/wood.png")));
        assert_eq!(source.color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(source.vertices[0].tex_coords, [0.25, 0.75]);
    }

    #[test]
    fn attribute_flags_stick_across_buffers() {
        let xml = r#"<mesh><buffers>
            <buffer><indices>0</indices><coords>0,0,0</coords><normals>0,1,0</normals></buffer>
            <buffer><indices>0</indices><coords>1,1,1</coords></buffer>
        </buffers></mesh>"#;
        let sources = parse(xml).unwrap();
        assert_eq!(sources[0].vertices[0].normal, [0.0, 1.0, 0.0]);
        // Second buffer has no normals of its own but is read as if it had them
        assert_eq!(sources[1].vertices[0].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn texcoords_ignored_until_a_texture_appears() {
        let xml = r#"<mesh><buffers>
            <buffer><indices>0</indices><coords>0,0,0</coords><texcoords>9,9</texcoords></buffer>
            <buffer>
                <material><texture>a.png</texture></material>
                <indices>0</indices><coords>0,0,0</coords><texcoords>0.1,0.2</texcoords>
            </buffer>
            <buffer><indices>0</indices><coords>0,0,0</coords><texcoords>0.3,0.4</texcoords></buffer>
        </buffers></mesh>"#;
        let sources = parse(xml).unwrap();

        assert_eq!(sources[0].vertices[0].tex_coords, [0.0, 0.0]);
        assert_eq!(sources[1].vertices[0].tex_coords, [0.1, 0.2]);
        assert_eq!(sources[2].vertices[0].tex_coords, [0.3, 0.4]);
        assert_eq!(sources[2].texture_path, None);
    }

    #[test]
    fn tangents_are_read_per_vertex() {
        let xml = r#"<mesh><buffers><buffer>
            <indices>0,1</indices>
            <coords>0,0,0, 1,0,0</coords>
            <tangents>1,0,0, 0,1,0</tangents>
        </buffer></buffers></mesh>"#;
        let vertices = &parse(xml).unwrap()[0].vertices;

        assert_eq!(vertices[0].tangent, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].tangent, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn malformed_numbers_and_colors_are_rejected() {
        let bad_index = "<mesh><buffers><buffer><indices>0,x</indices><coords>0,0,0</coords></buffer></buffers></mesh>";
        assert!(matches!(parse(bad_index), Err(MeshError::InvalidNumber { field: "indices", .. })));

        let short_color = r#"<mesh><buffers><buffer><material><color>1,0</color></material>
            <indices>0</indices><coords>0,0,0</coords></buffer></buffers></mesh>"#;
        assert!(matches!(parse(short_color), Err(MeshError::InvalidColor { found: 2, .. })));

        assert!(matches!(parse("<mesh><buffers>"), Err(MeshError::Xml(_))));
    }

    #[test]
    fn coordinate_triples_become_vertices_in_order() {
        let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 7.0];
        let vertices = build_vertices(&coords, &[], &[], &[], AttributeFlags::default());
        let positions: Vec<_> = vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    }

    #[test]
    fn shininess_is_clamped_to_a_byte() {
        let xml = r#"<mesh><buffers><buffer><material><shininess>300</shininess></material>
            <indices>0</indices><coords>0,0,0</coords></buffer></buffers></mesh>"#;
        assert_eq!(parse(xml).unwrap()[0].shininess, 255);
    }

    #[test]
    fn fractional_shininess_is_truncated() {
        let xml = r#"<mesh><buffers>
            <buffer><material><shininess>32.0</shininess></material><indices>0</indices><coords>0,0,0</coords></buffer>
            <buffer><material><shininess>7.9</shininess></material><indices>0</indices><coords>0,0,0</coords></buffer>
            <buffer><material><shininess>-4</shininess></material><indices>0</indices><coords>0,0,0</coords></buffer>
        </buffers></mesh>"#;
        let shininess: Vec<u8> = parse(xml).unwrap().iter().map(|source| source.shininess).collect();
        assert_eq!(shininess, vec![32, 7, 0]);
    }

    #[test]
    fn asset_directory_accepts_backslashes() {
        assert_eq!(asset_directory("data\\models\\cube.msh.xml"), PathBuf::from("data/models"));
        assert_eq!(asset_directory("cube.msh.xml"), PathBuf::from(""));
    }

    #[test]
    fn document_without_buffers_is_empty() {
        assert!(parse("<scene/>").unwrap().is_empty());
    }
}
