//! Index width and delta-encoding planning
//!
//! Triangle meshes from continuous imports tend to reference nearby vertices,
//! so storing each index as the signed difference from its predecessor often
//! fits 16 bits even when absolute indices exceed 65535. The planner scans
//! the flat index stream once and picks the narrowest encoding that can
//! represent it; the signed variants (`Int16`/`Int32`) are delta-encoded and
//! require sequential decode.

use serde::{Deserialize, Serialize};

/// On-disk encoding of the index stream.
///
/// Unsigned variants store absolute indices, signed variants store
/// consecutive deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexEncoding {
    UInt16,
    Int16,
    UInt32,
    Int32,
}

impl IndexEncoding {
    /// Bytes per stored index
    pub const fn index_bytes(self) -> u64 {
        match self {
            IndexEncoding::UInt16 | IndexEncoding::Int16 => 2,
            IndexEncoding::UInt32 | IndexEncoding::Int32 => 4,
        }
    }

    /// Whether the stream stores consecutive deltas instead of absolute values
    pub const fn is_delta(self) -> bool {
        matches!(self, IndexEncoding::Int16 | IndexEncoding::Int32)
    }
}

/// Scan the index stream once and choose the narrowest safe encoding.
///
/// Deltas are taken across the whole flat stream, including triangle
/// boundaries, with the predecessor of the first index fixed at 0. 16-bit
/// deltas win when every delta fits; failing that, absolute 16-bit beats
/// 32-bit deltas whenever the largest index itself fits in u16.
///
/// An empty stream gets `UInt32` and a zero-length segment.
pub fn plan_indices(indices: &[u32]) -> IndexEncoding {
    if indices.is_empty() {
        return IndexEncoding::UInt32;
    }

    let mut max_delta: i64 = 0;
    let mut min_delta: i64 = 0;
    let mut max_index: u32 = 0;
    let mut previous: i64 = 0;

    for &index in indices {
        let delta = i64::from(index) - previous;

        max_delta = max_delta.max(delta);
        min_delta = min_delta.min(delta);
        max_index = max_index.max(index);

        previous = i64::from(index);
    }

    if max_delta <= 0x7FFF && min_delta >= -0x7FFF {
        IndexEncoding::Int16
    } else if max_index <= 0xFFFF {
        IndexEncoding::UInt16
    } else if max_delta <= 0x7FFF_FFFF && min_delta >= -0x7FFF_FFFF {
        IndexEncoding::Int32
    } else {
        IndexEncoding::UInt32
    }
}

/// Serialize indices to little-endian bytes with the given encoding.
///
/// Callers must pass an encoding chosen by [`plan_indices`] for the same
/// stream; out-of-range values are truncated, not checked.
pub fn encode_indices(indices: &[u32], encoding: IndexEncoding) -> Vec<u8> {
    let mut data = Vec::with_capacity(indices.len() * encoding.index_bytes() as usize);

    match encoding {
        IndexEncoding::UInt16 => {
            for &index in indices {
                data.extend_from_slice(&(index as u16).to_le_bytes());
            }
        }
        IndexEncoding::UInt32 => {
            for &index in indices {
                data.extend_from_slice(&index.to_le_bytes());
            }
        }
        IndexEncoding::Int16 => {
            let mut previous: i64 = 0;
            for &index in indices {
                let delta = i64::from(index) - previous;
                data.extend_from_slice(&(delta as i16).to_le_bytes());
                previous = i64::from(index);
            }
        }
        IndexEncoding::Int32 => {
            let mut previous: i64 = 0;
            for &index in indices {
                let delta = i64::from(index) - previous;
                data.extend_from_slice(&(delta as i32).to_le_bytes());
                previous = i64::from(index);
            }
        }
    }

    data
}

/// Decode an index segment back to absolute u32 indices.
///
/// Inverse of [`encode_indices`]; delta streams are decoded by accumulating
/// from 0. Trailing bytes that do not fill a whole index are ignored.
pub fn decode_indices(data: &[u8], encoding: IndexEncoding) -> Vec<u32> {
    match encoding {
        IndexEncoding::UInt16 => data
            .chunks_exact(2)
            .map(|c| u32::from(u16::from_le_bytes([c[0], c[1]])))
            .collect(),
        IndexEncoding::UInt32 => data
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        IndexEncoding::Int16 => {
            let mut previous: i64 = 0;
            data.chunks_exact(2)
                .map(|c| {
                    previous += i64::from(i16::from_le_bytes([c[0], c[1]]));
                    previous as u32
                })
                .collect()
        }
        IndexEncoding::Int32 => {
            let mut previous: i64 = 0;
            data.chunks_exact(4)
                .map(|c| {
                    previous += i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]]));
                    previous as u32
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream() {
        let encoding = plan_indices(&[]);
        assert_eq!(encoding, IndexEncoding::UInt32);
        assert!(encode_indices(&[], encoding).is_empty());
    }

    #[test]
    fn test_quad_picks_int16_delta() {
        // Two triangles of a quad; deltas 0,1,1,-2,2,1 all fit i16
        let indices = [0, 1, 2, 0, 2, 3];
        let encoding = plan_indices(&indices);
        assert_eq!(encoding, IndexEncoding::Int16);
        assert!(encoding.is_delta());
        assert_eq!(encoding.index_bytes(), 2);
    }

    #[test]
    fn test_small_deltas_beat_large_absolute_indices() {
        // Indices climb past u16 range but every step stays small
        let indices: Vec<u32> = (0..70_000).collect();
        assert_eq!(plan_indices(&indices), IndexEncoding::Int16);
    }

    #[test]
    fn test_wide_delta_falls_back_to_absolute_u16() {
        // A jump larger than i16 but every index still fits u16
        let indices = [0, 40_000, 1, 40_001, 2, 40_002];
        assert_eq!(plan_indices(&indices), IndexEncoding::UInt16);
    }

    #[test]
    fn test_wide_delta_with_large_indices_picks_int32() {
        let indices = [0, 200_000, 1, 200_001, 2, 200_002];
        assert_eq!(plan_indices(&indices), IndexEncoding::Int32);
    }

    #[test]
    fn test_huge_jump_forces_absolute_u32() {
        let indices = [0, 0x9000_0000, 0, 0x9000_0001];
        assert_eq!(plan_indices(&indices), IndexEncoding::UInt32);
    }

    #[test]
    fn test_deltas_span_triangle_boundaries() {
        // The scan never resets at triangle boundaries, so the -32768 step
        // between triangles pushes the plan past Int16
        let indices = [32_766, 32_767, 32_768, 0, 1, 2];
        assert_eq!(plan_indices(&indices), IndexEncoding::UInt16);
    }

    #[test]
    fn test_roundtrip_all_encodings() {
        let streams: [&[u32]; 5] = [
            &[0, 1, 2, 0, 2, 3],
            &[0, 40_000, 1, 40_001, 2, 40_002],
            &[0, 200_000, 1, 200_001, 2, 200_002],
            &[0, 0x9000_0000, 0, 0x9000_0001],
            &[],
        ];

        for indices in streams {
            let encoding = plan_indices(indices);
            let data = encode_indices(indices, encoding);
            assert_eq!(data.len() as u64, indices.len() as u64 * encoding.index_bytes());
            assert_eq!(decode_indices(&data, encoding), indices);
        }
    }
}
