//! Plain JSON model exporter
//!
//! Writes the text document the JSON importer reads back, plus a separate
//! materials document. Useful for inspecting a conversion or hand-editing
//! geometry before the final SUB export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::document::{
    GeometryDocument, MaterialDocument, MaterialsDocument, ModelDocument, PartDocument,
    VertexDocument, TOPOLOGY_TRIANGLE_LIST,
};
use crate::model::Model;

/// Write `model` to `output` as a plain JSON geometry document
pub fn write_json(output: &Path, model: &Model) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);

    let document = ModelDocument {
        geometry: GeometryDocument {
            parts: model
                .parts
                .iter()
                .map(|p| PartDocument {
                    material_index: p.material_index,
                    start_index: p.start_index,
                    num_indices: p.num_indices,
                })
                .collect(),
            primitive_topology: TOPOLOGY_TRIANGLE_LIST.to_string(),
            vertices: VertexDocument {
                positions: model
                    .positions
                    .iter()
                    .flat_map(|p| p.to_array())
                    .collect(),
                normals: model
                    .normals
                    .iter()
                    .flatten()
                    .flat_map(|n| n.to_array())
                    .collect(),
                tangents: model
                    .tangents
                    .iter()
                    .flatten()
                    .flat_map(|t| t.to_array())
                    .collect(),
                texture_coordinates_0: model
                    .texture_coordinates
                    .iter()
                    .flatten()
                    .flat_map(|uv| uv.to_array())
                    .collect(),
            },
            indices: model.indices.clone(),
        },
    };

    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;

    Ok(())
}

/// Write the model's materials to `output`, referencing `geometry_file`
pub fn write_materials(output: &Path, geometry_file: &str, model: &Model) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);

    let document = MaterialsDocument {
        geometry: geometry_file.to_string(),
        materials: model
            .materials
            .iter()
            .map(|m| MaterialDocument {
                name: m.name.clone(),
                mask_texture: m.mask_texture.clone(),
                color_texture: m.color_texture.clone(),
                normal_texture: m.normal_texture.clone(),
                roughness_texture: m.roughness_texture.clone(),
                diffuse_color: m.diffuse_color.to_array(),
                emissive_color: m.emissive_color.to_array(),
                roughness: m.roughness,
                two_sided: m.two_sided,
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;

    Ok(())
}
