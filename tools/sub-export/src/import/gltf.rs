//! glTF/GLB importer
//!
//! Flattens every mesh primitive in the document into one index buffer, one
//! part per primitive. Attribute presence is decided by the first primitive;
//! later primitives missing an attribute get defaults and a warning.

use std::path::Path;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3, Vec4};

use super::Importer;
use crate::model::{Material, Model, Part};

pub struct GltfImporter;

impl Importer for GltfImporter {
    fn read(&self, input: &Path) -> Result<Model> {
        let (document, buffers, _images) =
            gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

        let mut model = Model::default();

        let mut normals: Vec<Vec3> = Vec::new();
        let mut tangents: Vec<Vec4> = Vec::new();
        let mut uvs: Vec<Vec2> = Vec::new();

        let mut has_normals = false;
        let mut has_tangents = false;
        let mut has_uvs = false;
        let mut first = true;

        for mesh in document.meshes() {
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

                let positions: Vec<[f32; 3]> = reader
                    .read_positions()
                    .with_context(|| format!("No positions in mesh {:?}", mesh.name()))?
                    .collect();

                if first {
                    has_normals = reader.read_normals().is_some();
                    has_tangents = has_normals && reader.read_tangents().is_some();
                    has_uvs = reader.read_tex_coords(0).is_some();
                    first = false;
                }

                let base_vertex = model.positions.len() as u32;
                let start_index = model.indices.len() as u32;

                model
                    .positions
                    .extend(positions.iter().map(|p| Vec3::from_array(*p)));

                if has_normals {
                    extend_or_default(
                        &mut normals,
                        reader.read_normals().map(|iter| iter.map(Vec3::from_array)),
                        positions.len(),
                        Vec3::Y,
                        "normals",
                    );
                }

                if has_tangents {
                    extend_or_default(
                        &mut tangents,
                        reader
                            .read_tangents()
                            .map(|iter| iter.map(Vec4::from_array)),
                        positions.len(),
                        Vec4::new(1.0, 0.0, 0.0, 1.0),
                        "tangents",
                    );
                }

                if has_uvs {
                    extend_or_default(
                        &mut uvs,
                        reader
                            .read_tex_coords(0)
                            .map(|iter| iter.into_f32().map(Vec2::from_array)),
                        positions.len(),
                        Vec2::ZERO,
                        "texture coordinates",
                    );
                }

                // Non-indexed primitives become a sequential triangle list
                match reader.read_indices() {
                    Some(indices) => model
                        .indices
                        .extend(indices.into_u32().map(|i| i + base_vertex)),
                    None => model
                        .indices
                        .extend((0..positions.len() as u32).map(|i| i + base_vertex)),
                }

                let material_index = primitive
                    .material()
                    .index()
                    .map(|i| i as u32)
                    .unwrap_or(document.materials().count() as u32);

                model.parts.push(Part {
                    start_index,
                    num_indices: model.indices.len() as u32 - start_index,
                    material_index,
                });
            }
        }

        anyhow::ensure!(!model.parts.is_empty(), "No mesh primitives found in glTF");

        model.materials = document.materials().map(convert_material).collect();

        // Primitives without a material reference the default slot
        if model.parts.iter().any(|p| p.material_index as usize == model.materials.len()) {
            model.materials.push(Material {
                name: "default".to_string(),
                ..Material::default()
            });
        }

        if model.materials.is_empty() {
            model.materials.push(Material::default());
        }

        model.normals = has_normals.then_some(normals);
        model.tangents = has_tangents.then_some(tangents);
        model.texture_coordinates = has_uvs.then_some(uvs);

        Ok(model)
    }
}

fn extend_or_default<T: Copy, I: Iterator<Item = T>>(
    target: &mut Vec<T>,
    source: Option<I>,
    count: usize,
    default: T,
    what: &str,
) {
    match source {
        Some(iter) => {
            let before = target.len();
            target.extend(iter.take(count));
            target.resize(before + count, default);
        }
        None => {
            tracing::warn!("Primitive has no {}, filling with defaults", what);
            target.resize(target.len() + count, default);
        }
    }
}

fn convert_material(material: gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();

    let base_color = pbr.base_color_factor();
    let emissive = material.emissive_factor();

    Material {
        name: material.name().unwrap_or_default().to_string(),
        mask_texture: String::new(),
        color_texture: pbr
            .base_color_texture()
            .map(|info| texture_name(info.texture()))
            .unwrap_or_default(),
        normal_texture: material
            .normal_texture()
            .map(|info| texture_name(info.texture()))
            .unwrap_or_default(),
        roughness_texture: pbr
            .metallic_roughness_texture()
            .map(|info| texture_name(info.texture()))
            .unwrap_or_default(),
        diffuse_color: Vec3::new(base_color[0], base_color[1], base_color[2]),
        emissive_color: Vec3::from_array(emissive),
        roughness: pbr.roughness_factor(),
        two_sided: material.double_sided(),
    }
}

fn texture_name(texture: gltf::Texture) -> String {
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } => uri.to_string(),
        gltf::image::Source::View { .. } => texture.name().unwrap_or_default().to_string(),
    }
}
