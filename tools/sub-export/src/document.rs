//! Plain JSON model document
//!
//! The human-readable sibling of the SUB binary format: flat attribute
//! arrays under `geometry.vertices`, written by the JSON exporter and read
//! back by the JSON importer. Materials go to a separate document so the
//! geometry file stays diff-friendly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelDocument {
    pub geometry: GeometryDocument,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub parts: Vec<PartDocument>,
    pub primitive_topology: String,
    pub vertices: VertexDocument,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PartDocument {
    pub material_index: u32,
    pub start_index: u32,
    pub num_indices: u32,
}

/// Flat per-attribute arrays: 3 floats per position/normal, 4 per tangent
/// (w = bitangent sign), 2 per texture coordinate
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VertexDocument {
    pub positions: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tangents: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub texture_coordinates_0: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaterialsDocument {
    /// Geometry file these materials belong to
    pub geometry: String,
    pub materials: Vec<MaterialDocument>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MaterialDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mask_texture: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color_texture: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub normal_texture: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub roughness_texture: String,
    pub diffuse_color: [f32; 3],
    pub emissive_color: [f32; 3],
    pub roughness: f32,
    pub two_sided: bool,
}

pub const TOPOLOGY_TRIANGLE_LIST: &str = "triangle_list";
