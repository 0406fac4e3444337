//! Vertex layout planning for the SUB binary format
//!
//! The planner looks at which attributes a model carries and picks one of
//! three layout variants, each with one stream per attribute (non-interleaved,
//! a flat array across all vertices):
//!
//! - positions + tangent frame + UVs: `[Position][Tangent_space][Texture_coordinate]`
//!   with the tangent frame compressed to a quaternion (see `tangent`)
//! - positions + normals: `[Position][Normal]`
//! - positions only: `[Position]`
//!
//! `byte_offset` is carried for interleaved consumers but stays 0 for the
//! stream-per-attribute layouts emitted here.

use serde::{Deserialize, Serialize};

pub const SEMANTIC_POSITION: &str = "Position";
pub const SEMANTIC_NORMAL: &str = "Normal";
pub const SEMANTIC_TANGENT_SPACE: &str = "Tangent_space";
pub const SEMANTIC_TEXTURE_COORDINATE: &str = "Texture_coordinate";

/// Binary encoding of one vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    UInt8,
    UInt16,
    UInt32,
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl Encoding {
    /// Size of one element in bytes
    pub const fn byte_size(self) -> u32 {
        match self {
            Encoding::UInt8 => 1,
            Encoding::UInt16 => 2,
            Encoding::UInt32 | Encoding::Float32 => 4,
            Encoding::Float32x2 => 8,
            Encoding::Float32x3 => 12,
            Encoding::Float32x4 => 16,
        }
    }
}

/// One attribute of the vertex layout, as declared in the JSON description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
    pub semantic_name: String,
    pub semantic_index: u32,
    pub encoding: Encoding,
    pub stream: u32,
    pub byte_offset: u32,
}

impl LayoutElement {
    fn new(semantic_name: &str, encoding: Encoding, stream: u32) -> Self {
        Self {
            semantic_name: semantic_name.to_string(),
            semantic_index: 0,
            encoding,
            stream,
            byte_offset: 0,
        }
    }
}

/// Planned vertex layout: ordered elements, stream ids matching emission order
#[derive(Debug, Clone, Default)]
pub struct VertexLayout {
    pub elements: Vec<LayoutElement>,
}

impl VertexLayout {
    /// Pick the layout variant for the given attribute presence flags.
    ///
    /// A full tangent frame is only usable together with UVs; without UVs the
    /// tangents are dropped and the layout falls back to raw normals.
    pub fn plan(has_normals: bool, has_tangents: bool, has_uvs: bool) -> Self {
        let mut elements = vec![LayoutElement::new(
            SEMANTIC_POSITION,
            Encoding::Float32x3,
            0,
        )];

        if has_tangents && has_uvs {
            elements.push(LayoutElement::new(
                SEMANTIC_TANGENT_SPACE,
                Encoding::Float32x4,
                1,
            ));
            elements.push(LayoutElement::new(
                SEMANTIC_TEXTURE_COORDINATE,
                Encoding::Float32x2,
                2,
            ));
        } else if has_normals {
            elements.push(LayoutElement::new(SEMANTIC_NORMAL, Encoding::Float32x3, 1));
        }

        Self { elements }
    }

    /// Bytes per vertex summed across all elements
    pub fn vertex_stride(&self) -> u32 {
        self.elements.iter().map(|e| e.encoding.byte_size()).sum()
    }

    /// Whether the layout carries the given semantic
    pub fn contains(&self, semantic_name: &str) -> bool {
        self.elements.iter().any(|e| e.semantic_name == semantic_name)
    }
}
