//! SUB container framing (.sub)
//!
//! # Layout
//! ```text
//! 0x00: magic "SUB\0"
//! 0x04: json_size u64 little-endian, a multiple of 4
//! 0x0C: json_text UTF-8, zero-padded to json_size
//! var:  binary payload (segments at the offsets the JSON declares)
//! ```
//!
//! The JSON description is the schema: every binary segment is found through
//! a `{"offset", "size"}` tag relative to the start of the payload region,
//! never to the file start. That keeps the format forward-compatible; readers
//! that do not know a segment simply skip it.

use serde::{Deserialize, Serialize};

use crate::index::IndexEncoding;
use crate::layout::LayoutElement;

/// Magic bytes at the start of every SUB file
pub const SUB_MAGIC: [u8; 4] = *b"SUB\0";

/// Round up to the next 4-byte boundary
#[inline]
pub const fn align4(size: u64) -> u64 {
    (size + 3) & !3
}

/// SUB framing header (12 bytes): magic + padded JSON size
#[derive(Debug, Clone, Copy)]
pub struct SubHeader {
    pub json_size: u64,
}

impl SubHeader {
    pub const SIZE: usize = 12;

    /// `json_size` must already be 4-byte aligned
    pub fn new(json_size: u64) -> Self {
        debug_assert!(json_size % 4 == 0);
        Self { json_size }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SUB_MAGIC);
        bytes[4..12].copy_from_slice(&self.json_size.to_le_bytes());
        bytes
    }

    /// Returns `None` on a short buffer or wrong magic
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SUB_MAGIC {
            return None;
        }

        let json_size = u64::from_le_bytes([
            bytes[4], bytes[5], bytes[6], bytes[7], bytes[8], bytes[9], bytes[10], bytes[11],
        ]);

        Some(Self { json_size })
    }
}

/// Byte range of one binary segment within the payload region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryTag {
    pub offset: u64,
    pub size: u64,
}

/// Contiguous index range mapped to one material
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PartDescription {
    pub start_index: u32,
    pub num_indices: u32,
    pub material_index: u32,
}

/// Vertex segment: where it lives and how each attribute is laid out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerticesDescription {
    pub binary: BinaryTag,
    pub num_vertices: u64,
    pub layout: Vec<LayoutElement>,
}

/// Index segment: where it lives and how indices are stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicesDescription {
    pub binary: BinaryTag,
    pub num_indices: u64,
    pub encoding: IndexEncoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDescription {
    pub parts: Vec<PartDescription>,
    pub vertices: VerticesDescription,
    pub indices: IndicesDescription,
}

/// Root of the JSON description embedded in every SUB file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubDescription {
    pub geometry: GeometryDescription,
}

/// Parse the framing header and JSON description of a SUB byte stream.
///
/// Returns the description and the byte offset where the binary payload
/// region starts. `None` on bad magic, truncated input, or malformed JSON.
pub fn read_description(bytes: &[u8]) -> Option<(SubDescription, usize)> {
    let header = SubHeader::from_bytes(bytes)?;

    let payload_offset = SubHeader::SIZE + header.json_size as usize;
    let json = bytes.get(SubHeader::SIZE..payload_offset)?;

    // Strip the alignment padding before handing to the JSON parser
    let end = json.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let description = serde_json::from_slice(&json[..end]).ok()?;

    Some((description, payload_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::VertexLayout;

    #[test]
    fn test_align4() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(4), 4);
        assert_eq!(align4(5), 8);
        assert_eq!(align4(123), 124);
    }

    #[test]
    fn test_header_roundtrip() {
        let header = SubHeader::new(256);
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..4], b"SUB\0");

        let parsed = SubHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.json_size, 256);
    }

    #[test]
    fn test_header_rejects_bad_magic() {
        let mut bytes = SubHeader::new(0).to_bytes();
        bytes[0] = b'X';
        assert!(SubHeader::from_bytes(&bytes).is_none());
    }

    #[test]
    fn test_header_rejects_short_buffer() {
        assert!(SubHeader::from_bytes(&[0; 11]).is_none());
    }

    #[test]
    fn test_description_roundtrip_through_padded_json() {
        let description = SubDescription {
            geometry: GeometryDescription {
                parts: vec![PartDescription {
                    start_index: 0,
                    num_indices: 6,
                    material_index: 0,
                }],
                vertices: VerticesDescription {
                    binary: BinaryTag { offset: 0, size: 48 },
                    num_vertices: 4,
                    layout: VertexLayout::plan(false, false, false).elements,
                },
                indices: IndicesDescription {
                    binary: BinaryTag {
                        offset: 48,
                        size: 12,
                    },
                    num_indices: 6,
                    encoding: IndexEncoding::Int16,
                },
            },
        };

        let mut json = serde_json::to_vec(&description).unwrap();
        let json_size = align4(json.len() as u64);
        json.resize(json_size as usize, 0);

        let mut bytes = SubHeader::new(json_size).to_bytes().to_vec();
        bytes.extend_from_slice(&json);

        let (parsed, payload_offset) = read_description(&bytes).unwrap();
        assert_eq!(payload_offset, SubHeader::SIZE + json_size as usize);
        assert_eq!(parsed.geometry.parts.len(), 1);
        assert_eq!(parsed.geometry.vertices.num_vertices, 4);
        assert_eq!(parsed.geometry.indices.encoding, IndexEncoding::Int16);
    }

    #[test]
    fn test_encoding_field_serializes_as_string() {
        let json = serde_json::to_string(&IndexEncoding::UInt16).unwrap();
        assert_eq!(json, "\"UInt16\"");
        let json = serde_json::to_string(&IndexEncoding::Int32).unwrap();
        assert_eq!(json, "\"Int32\"");
    }
}
