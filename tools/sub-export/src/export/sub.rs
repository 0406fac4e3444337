//! SUB binary mesh exporter
//!
//! Emits `[magic][json_size][padded JSON description][vertex streams][index
//! stream]`. The vertex streams go out in the exact order the layout
//! declares (position, then tangent-space or normal, then UV) with no
//! interior padding; the declared segment sizes must match the bytes
//! written, and the tests hold the emitter to that.
//!
//! Nothing touches the output file until it has been created successfully;
//! after that, writing is strictly append-only.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bytemuck::cast_slice;
use glam::Quat;

use sub_common::format::{
    align4, BinaryTag, GeometryDescription, IndicesDescription, PartDescription, SubDescription,
    SubHeader, VerticesDescription,
};
use sub_common::index::{encode_indices, plan_indices};
use sub_common::layout::{VertexLayout, SEMANTIC_NORMAL, SEMANTIC_TANGENT_SPACE};
use sub_common::tangent::encode_tangent_space;

use crate::model::Model;

/// Write `model` to `output` as a SUB file
pub fn write_sub(output: &Path, model: &Model) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);

    write_sub_to(&mut writer, model)?;

    writer
        .flush()
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    Ok(())
}

/// Write the SUB byte stream for `model` to an arbitrary writer
pub fn write_sub_to<W: Write>(w: &mut W, model: &Model) -> Result<()> {
    let num_vertices = u64::from(model.num_vertices());
    let num_indices = u64::from(model.num_indices());

    let layout = if num_vertices == 0 {
        VertexLayout::default()
    } else {
        VertexLayout::plan(
            model.normals.is_some(),
            model.tangents.is_some(),
            model.texture_coordinates.is_some(),
        )
    };
    let vertices_size = num_vertices * u64::from(layout.vertex_stride());

    let index_encoding = plan_indices(&model.indices);
    let indices_size = num_indices * index_encoding.index_bytes();

    let description = SubDescription {
        geometry: GeometryDescription {
            parts: model
                .parts
                .iter()
                .map(|p| PartDescription {
                    start_index: p.start_index,
                    num_indices: p.num_indices,
                    material_index: p.material_index,
                })
                .collect(),
            vertices: VerticesDescription {
                binary: BinaryTag {
                    offset: 0,
                    size: vertices_size,
                },
                num_vertices,
                layout: layout.elements.clone(),
            },
            indices: IndicesDescription {
                binary: BinaryTag {
                    offset: vertices_size,
                    size: indices_size,
                },
                num_indices,
                encoding: index_encoding,
            },
        },
    };

    let mut json = serde_json::to_vec(&description)?;
    let json_size = align4(json.len() as u64);
    json.resize(json_size as usize, 0);

    w.write_all(&SubHeader::new(json_size).to_bytes())?;
    w.write_all(&json)?;

    write_vertex_streams(w, model, &layout)?;
    w.write_all(&encode_indices(&model.indices, index_encoding))?;

    Ok(())
}

/// Emit the vertex streams in layout order: position, then the compressed
/// tangent frame or the raw normal, then UVs.
fn write_vertex_streams<W: Write>(w: &mut W, model: &Model, layout: &VertexLayout) -> Result<()> {
    if model.positions.is_empty() {
        return Ok(());
    }

    w.write_all(cast_slice(&model.positions))?;

    if layout.contains(SEMANTIC_TANGENT_SPACE) {
        let tangents = model
            .tangents
            .as_ref()
            .context("Layout declares a tangent space but the model has no tangents")?;
        let normals = model
            .normals
            .as_ref()
            .context("Tangent space requires normals")?;
        let uvs = model
            .texture_coordinates
            .as_ref()
            .context("Layout declares texture coordinates but the model has none")?;

        let frames: Vec<Quat> = tangents
            .iter()
            .zip(normals)
            .map(|(t, n)| encode_tangent_space(t.truncate(), *n, t.w))
            .collect();

        w.write_all(cast_slice(&frames))?;
        w.write_all(cast_slice(uvs))?;
    } else if layout.contains(SEMANTIC_NORMAL) {
        let normals = model
            .normals
            .as_ref()
            .context("Layout declares normals but the model has none")?;

        w.write_all(cast_slice(normals))?;
    }

    Ok(())
}
