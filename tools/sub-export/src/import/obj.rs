//! Wavefront OBJ importer
//!
//! Line-oriented parser covering the common subset: v/vt/vn and f records,
//! fan triangulation for polygons, 1-based (and negative-free) index
//! references. Vertices are expanded per face corner; OBJ's separate
//! position/uv/normal indexing does not map onto a single index buffer.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};

use super::Importer;
use crate::model::{Material, Model, Part};

pub struct ObjImporter;

impl Importer for ObjImporter {
    fn read(&self, input: &Path) -> Result<Model> {
        let file =
            File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
        let reader = BufReader::new(file);

        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut normals_raw: Vec<[f32; 3]> = Vec::new();

        // Final vertex data, expanded from faces
        let mut final_positions: Vec<Vec3> = Vec::new();
        let mut final_uvs: Vec<Vec2> = Vec::new();
        let mut final_normals: Vec<Vec3> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            match parts[0] {
                "v" if parts.len() >= 4 => {
                    let x: f32 = parts[1].parse().unwrap_or(0.0);
                    let y: f32 = parts[2].parse().unwrap_or(0.0);
                    let z: f32 = parts[3].parse().unwrap_or(0.0);
                    positions.push([x, y, z]);
                }
                "vt" if parts.len() >= 3 => {
                    let u: f32 = parts[1].parse().unwrap_or(0.0);
                    let v: f32 = parts[2].parse().unwrap_or(0.0);
                    tex_coords.push([u, v]);
                }
                "vn" if parts.len() >= 4 => {
                    let x: f32 = parts[1].parse().unwrap_or(0.0);
                    let y: f32 = parts[2].parse().unwrap_or(0.0);
                    let z: f32 = parts[3].parse().unwrap_or(0.0);
                    normals_raw.push([x, y, z]);
                }
                "f" if parts.len() >= 4 => {
                    let face_verts: Vec<(usize, Option<usize>, Option<usize>)> = parts[1..]
                        .iter()
                        .filter_map(|v| parse_obj_vertex(v))
                        .collect();

                    if face_verts.len() < 3 {
                        continue;
                    }

                    // Fan triangulation for convex polygons
                    for i in 1..face_verts.len() - 1 {
                        for &idx in &[0, i, i + 1] {
                            let (vi, vti, vni) = face_verts[idx];

                            indices.push(final_positions.len() as u32);

                            final_positions.push(Vec3::from_array(
                                positions.get(vi).copied().unwrap_or([0.0; 3]),
                            ));

                            if let Some(ti) = vti {
                                final_uvs.push(Vec2::from_array(
                                    tex_coords.get(ti).copied().unwrap_or([0.0; 2]),
                                ));
                            }

                            if let Some(ni) = vni {
                                final_normals.push(Vec3::from_array(
                                    normals_raw.get(ni).copied().unwrap_or([0.0, 1.0, 0.0]),
                                ));
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        if final_positions.is_empty() {
            bail!("No vertices found in OBJ file");
        }

        let has_uvs = !final_uvs.is_empty() && final_uvs.len() == final_positions.len();
        let has_normals = !final_normals.is_empty() && final_normals.len() == final_positions.len();

        let mut model = Model {
            parts: vec![Part {
                start_index: 0,
                num_indices: indices.len() as u32,
                material_index: 0,
            }],
            materials: vec![Material::default()],
            positions: final_positions,
            indices,
            ..Default::default()
        };

        model.normals = has_normals.then_some(final_normals);
        model.texture_coordinates = has_uvs.then_some(final_uvs);

        Ok(model)
    }
}

/// Parse an OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    Some((vi, vti, vni))
}
