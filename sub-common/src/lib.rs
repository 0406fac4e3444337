//! Shared definitions for the SUB binary model format
//!
//! A SUB file is a self-describing container: a fixed framing header, a JSON
//! description of the geometry, then tightly packed binary segments laid out
//! exactly as the JSON declares. This crate holds everything both producers
//! and consumers of the format agree on:
//!
//! - [`format`] — container framing and the JSON description schema
//! - [`layout`] — vertex attribute encodings and layout planning
//! - [`index`] — index width/delta planning and byte (de)serialization
//! - [`tangent`] — tangent-space quaternion compression
//!
//! No I/O happens here; writing files is the exporter's job.

pub mod format;
pub mod index;
pub mod layout;
pub mod tangent;

pub use format::{
    align4, read_description, BinaryTag, GeometryDescription, IndicesDescription,
    PartDescription, SubDescription, SubHeader, VerticesDescription, SUB_MAGIC,
};
pub use index::{decode_indices, encode_indices, plan_indices, IndexEncoding};
pub use layout::{Encoding, LayoutElement, VertexLayout};
pub use tangent::{decode_tangent_space, encode_tangent_space};
