//! Integration tests for sub-export
//!
//! Drives the full pipeline: generate a source model, convert, then verify
//! the emitted SUB container byte by byte.

use std::path::Path;

use tempfile::tempdir;

use sub_common::format::{read_description, SubHeader};
use sub_common::index::decode_indices;
use sub_common::layout::{SEMANTIC_NORMAL, SEMANTIC_POSITION};

/// Unit cube with normals, no UVs: two attributes, 12 triangles
const CUBE_OBJ: &str = "\
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
vn 0 0 -1
vn 0 0 1
vn 0 -1 0
vn 0 1 0
vn -1 0 0
vn 1 0 0
f 1//1 3//1 2//1
f 1//1 4//1 3//1
f 5//2 6//2 7//2
f 5//2 7//2 8//2
f 1//3 2//3 6//3
f 1//3 6//3 5//3
f 4//4 8//4 7//4
f 4//4 7//4 3//4
f 1//5 5//5 8//5
f 1//5 8//5 4//5
f 2//6 3//6 7//6
f 2//6 7//6 6//6
";

#[test]
fn test_obj_to_sub_via_cli() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let sub_path = dir.path().join("cube.sub");

    std::fs::write(&obj_path, CUBE_OBJ).expect("Failed to write OBJ");

    run_sub_export(&obj_path, &sub_path);
    assert!(sub_path.exists(), "SUB file should exist");

    let data = std::fs::read(&sub_path).expect("Failed to read SUB file");
    verify_sub(&data);

    // A materials document is written alongside
    assert!(dir.path().join("cube.materials.json").exists());
}

#[test]
fn test_reverse_x_flips_winding_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let plain = dir.path().join("plain.sub");
    let mirrored = dir.path().join("mirrored.sub");

    std::fs::write(&obj_path, CUBE_OBJ).expect("Failed to write OBJ");

    run_sub_export(&obj_path, &plain);

    let status = std::process::Command::new(env!("CARGO_BIN_EXE_sub-export"))
        .args([
            obj_path.to_str().unwrap(),
            "-o",
            mirrored.to_str().unwrap(),
            "--reverse-x",
        ])
        .status()
        .expect("Failed to run sub-export");
    assert!(status.success());

    let plain_indices = read_indices(&std::fs::read(&plain).unwrap());
    let mirrored_indices = read_indices(&std::fs::read(&mirrored).unwrap());

    assert_eq!(plain_indices.len(), mirrored_indices.len());
    for (a, b) in plain_indices.chunks_exact(3).zip(mirrored_indices.chunks_exact(3)) {
        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[2]);
        assert_eq!(a[2], b[1]);
    }
}

fn run_sub_export(input: &Path, output: &Path) {
    let status = std::process::Command::new(env!("CARGO_BIN_EXE_sub-export"))
        .args([input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .status()
        .expect("Failed to run sub-export");
    assert!(status.success(), "sub-export failed");
}

fn verify_sub(data: &[u8]) {
    assert!(data.len() >= SubHeader::SIZE, "Data too small for header");
    assert_eq!(&data[0..4], b"SUB\0");

    let header = SubHeader::from_bytes(data).expect("Failed to parse header");
    assert_eq!(header.json_size % 4, 0, "JSON size must be 4-byte aligned");

    let (description, payload_offset) =
        read_description(data).expect("Failed to parse JSON description");
    let geometry = &description.geometry;

    // Cube OBJ expands to 36 corners, positions + normals, no UVs
    assert_eq!(geometry.vertices.num_vertices, 36);
    assert_eq!(geometry.indices.num_indices, 36);

    let names: Vec<&str> = geometry
        .vertices
        .layout
        .iter()
        .map(|e| e.semantic_name.as_str())
        .collect();
    assert_eq!(names, [SEMANTIC_POSITION, SEMANTIC_NORMAL]);

    // Declared sizes match the layout and the actual file length
    let stride: u32 = geometry
        .vertices
        .layout
        .iter()
        .map(|e| e.encoding.byte_size())
        .sum();
    assert_eq!(stride, 24);
    assert_eq!(
        geometry.vertices.binary.size,
        geometry.vertices.num_vertices * u64::from(stride)
    );
    assert_eq!(
        geometry.indices.binary.size,
        geometry.indices.num_indices * geometry.indices.encoding.index_bytes()
    );
    assert_eq!(geometry.indices.binary.offset, geometry.vertices.binary.size);

    let total = payload_offset as u64
        + geometry.indices.binary.offset
        + geometry.indices.binary.size;
    assert_eq!(data.len() as u64, total);

    // Parts partition the index buffer
    let covered: u64 = geometry.parts.iter().map(|p| u64::from(p.num_indices)).sum();
    assert_eq!(covered, geometry.indices.num_indices);
}

fn read_indices(data: &[u8]) -> Vec<u32> {
    let (description, payload_offset) =
        read_description(data).expect("Failed to parse JSON description");
    let tag = description.geometry.indices.binary;

    let start = payload_offset + tag.offset as usize;
    let end = start + tag.size as usize;

    decode_indices(&data[start..end], description.geometry.indices.encoding)
}
