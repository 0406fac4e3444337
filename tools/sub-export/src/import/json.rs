//! Plain JSON model importer
//!
//! Reads the document the JSON exporter writes (see `document`); lets
//! hand-authored or machine-generated geometry skip the binary formats.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3, Vec4};

use super::Importer;
use crate::document::{ModelDocument, TOPOLOGY_TRIANGLE_LIST};
use crate::model::{Material, Model, Part};

pub struct JsonImporter;

impl Importer for JsonImporter {
    fn read(&self, input: &Path) -> Result<Model> {
        let file =
            File::open(input).with_context(|| format!("Failed to open JSON: {:?}", input))?;

        let document: ModelDocument = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed model JSON: {:?}", input))?;

        let geometry = document.geometry;

        if geometry.primitive_topology != TOPOLOGY_TRIANGLE_LIST {
            bail!(
                "Unsupported primitive topology: {:?}",
                geometry.primitive_topology
            );
        }

        let vertices = geometry.vertices;
        if vertices.positions.is_empty() || vertices.positions.len() % 3 != 0 {
            bail!("Model JSON has no valid positions");
        }

        let num_vertices = vertices.positions.len() / 3;

        let positions: Vec<Vec3> = vertices
            .positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();

        let normals = grouped(&vertices.normals, 3, num_vertices, "normals", |c| {
            Vec3::new(c[0], c[1], c[2])
        })?;

        let tangents = grouped(&vertices.tangents, 4, num_vertices, "tangents", |c| {
            Vec4::new(c[0], c[1], c[2], c[3])
        })?;

        let texture_coordinates = grouped(
            &vertices.texture_coordinates_0,
            2,
            num_vertices,
            "texture coordinates",
            |c| Vec2::new(c[0], c[1]),
        )?;

        if geometry.indices.is_empty() || geometry.indices.len() % 3 != 0 {
            bail!("Model JSON has no valid triangle indices");
        }

        let parts: Vec<Part> = if geometry.parts.is_empty() {
            vec![Part {
                start_index: 0,
                num_indices: geometry.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            geometry
                .parts
                .iter()
                .map(|p| Part {
                    start_index: p.start_index,
                    num_indices: p.num_indices,
                    material_index: p.material_index,
                })
                .collect()
        };

        let num_materials = parts.iter().map(|p| p.material_index + 1).max().unwrap_or(1);

        Ok(Model {
            parts,
            materials: vec![Material::default(); num_materials as usize],
            positions,
            normals,
            tangents,
            texture_coordinates,
            indices: geometry.indices,
        })
    }
}

/// Regroup a flat float array into `num_vertices` vectors of `arity`
/// components; an empty array means the attribute is absent.
fn grouped<T>(
    data: &[f32],
    arity: usize,
    num_vertices: usize,
    what: &str,
    build: impl Fn(&[f32]) -> T,
) -> Result<Option<Vec<T>>> {
    if data.is_empty() {
        return Ok(None);
    }

    if data.len() != num_vertices * arity {
        bail!(
            "Model JSON has {} {} floats, expected {}",
            data.len(),
            what,
            num_vertices * arity
        );
    }

    Ok(Some(data.chunks_exact(arity).map(|c| build(c)).collect()))
}
