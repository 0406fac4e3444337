//! In-memory model container shared by importers and exporters
//!
//! One `Model` owns all vertex and index arrays for the lifetime of a
//! conversion. Optional attributes are `Option<Vec<_>>`: absence means the
//! attribute was never allocated, checked once at layout-planning time.

use glam::{Vec2, Vec3, Vec4};

/// Axis transform flag: mirror along X
pub const TRANSFORM_REVERSE_X: u8 = 1;
/// Axis transform flag: mirror along Y
pub const TRANSFORM_REVERSE_Y: u8 = 1 << 1;
/// Axis transform flag: mirror along Z
pub const TRANSFORM_REVERSE_Z: u8 = 1 << 2;
/// Axis transform flag: swap X and Y
pub const TRANSFORM_SWAP_XY: u8 = 1 << 3;
/// Axis transform flag: swap Y and Z
pub const TRANSFORM_SWAP_YZ: u8 = 1 << 4;

/// Contiguous index range sharing one material
#[derive(Debug, Clone, Copy)]
pub struct Part {
    pub start_index: u32,
    pub num_indices: u32,
    pub material_index: u32,
}

/// Material metadata carried through conversion.
///
/// Texture fields are plain names as the source file states them; resolving
/// them against the filesystem is not this tool's job.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub mask_texture: String,
    pub color_texture: String,
    pub normal_texture: String,
    pub roughness_texture: String,
    pub diffuse_color: Vec3,
    pub emissive_color: Vec3,
    pub roughness: f32,
    pub two_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            mask_texture: String::new(),
            color_texture: String::new(),
            normal_texture: String::new(),
            roughness_texture: String::new(),
            diffuse_color: Vec3::splat(0.75),
            emissive_color: Vec3::ZERO,
            roughness: 0.75,
            two_sided: false,
        }
    }
}

/// Model origin adjustment applied after import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Default,
    /// Origin at the center of the AABB footprint, resting on its bottom,
    /// e.g. [0, -1, 0] for the unit cube
    CenterBottom,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    pub fn halfsize(&self) -> Vec3 {
        0.5 * (self.max - self.min)
    }
}

/// Triangle-list geometry with per-part material assignment
#[derive(Debug, Default)]
pub struct Model {
    pub parts: Vec<Part>,
    pub materials: Vec<Material>,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    /// xyz = tangent, w = ±1 bitangent sign
    pub tangents: Option<Vec<Vec4>>,
    pub texture_coordinates: Option<Vec<Vec2>>,
    pub indices: Vec<u32>,
}

impl Model {
    pub fn num_parts(&self) -> u32 {
        self.parts.len() as u32
    }

    pub fn num_materials(&self) -> u32 {
        self.materials.len() as u32
    }

    pub fn num_vertices(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn num_indices(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn num_triangles(&self) -> u32 {
        self.num_indices() / 3
    }

    /// Uniformly scale all positions
    pub fn scale(&mut self, factor: f32) {
        for p in &mut self.positions {
            *p *= factor;
        }
    }

    /// Apply axis swaps and mirrors to every positional attribute.
    ///
    /// Mirroring exactly one of X and Z flips the triangle winding (swap of
    /// indices 1 and 2 per triangle) to preserve handedness; mirroring both
    /// cancels out. The conditional is deliberately X xor Z.
    pub fn transform(&mut self, flags: u8) {
        if flags == 0 {
            return;
        }

        apply_axes(&mut self.positions, flags);

        if let Some(normals) = &mut self.normals {
            apply_axes(normals, flags);
        }

        if let Some(tangents) = &mut self.tangents {
            for t in tangents.iter_mut() {
                let mut v = t.truncate();
                apply_axes(std::slice::from_mut(&mut v), flags);
                *t = v.extend(t.w);
            }
        }

        let reverse_x = flags & TRANSFORM_REVERSE_X != 0;
        let reverse_z = flags & TRANSFORM_REVERSE_Z != 0;

        if reverse_x != reverse_z {
            for triangle in self.indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }
    }

    /// Move the model relative to the requested origin
    pub fn set_origin(&mut self, origin: Origin) {
        if origin != Origin::CenterBottom || self.positions.is_empty() {
            return;
        }

        let aabb = self.aabb();
        let center = aabb.center();
        let halfsize = aabb.halfsize();

        let offset = Vec3::new(-center.x, halfsize.y - center.y, -center.z);

        for p in &mut self.positions {
            *p += offset;
        }
    }

    pub fn aabb(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;

        for p in &self.positions {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }

        aabb
    }

    /// Repair degenerate or non-finite tangents against the normals.
    ///
    /// Importers occasionally deliver zero tangents, NaNs, or tangents
    /// collapsed onto the normal; those vertices get a frame rebuilt from
    /// the normal, everything else is Gram-Schmidt re-orthogonalized.
    pub fn fix_tangent_space(&mut self) {
        let (Some(tangents), Some(normals)) = (&mut self.tangents, &self.normals) else {
            return;
        };

        for (t, n) in tangents.iter_mut().zip(normals) {
            let sign = if t.w.is_finite() && t.w < 0.0 { -1.0 } else { 1.0 };
            let tangent = t.truncate();

            let repaired = if !tangent.is_finite() || tangent.length_squared() < 1e-8 {
                orthogonal_to(*n)
            } else {
                let projected = tangent - *n * n.dot(tangent);
                if projected.length_squared() < 1e-8 {
                    orthogonal_to(*n)
                } else {
                    projected.normalize()
                }
            };

            *t = repaired.extend(sign);
        }
    }
}

fn apply_axes(vectors: &mut [Vec3], flags: u8) {
    for v in vectors {
        if flags & TRANSFORM_SWAP_XY != 0 {
            *v = Vec3::new(v.y, v.x, v.z);
        }
        if flags & TRANSFORM_SWAP_YZ != 0 {
            *v = Vec3::new(v.x, v.z, v.y);
        }
        if flags & TRANSFORM_REVERSE_X != 0 {
            v.x = -v.x;
        }
        if flags & TRANSFORM_REVERSE_Y != 0 {
            v.y = -v.y;
        }
        if flags & TRANSFORM_REVERSE_Z != 0 {
            v.z = -v.z;
        }
    }
}

/// Any unit vector orthogonal to `n`, biased away from its dominant axis
fn orthogonal_to(n: Vec3) -> Vec3 {
    let axis = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    n.cross(axis).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Model {
        Model {
            parts: vec![Part {
                start_index: 0,
                num_indices: 6,
                material_index: 0,
            }],
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_scale() {
        let mut model = quad();
        model.scale(2.0);
        assert_eq!(model.positions[2], Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_reverse_x_flips_winding() {
        let mut model = quad();
        model.transform(TRANSFORM_REVERSE_X);
        assert_eq!(model.positions[1].x, -1.0);
        assert_eq!(model.indices, vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_reverse_x_and_z_keeps_winding() {
        let mut model = quad();
        model.transform(TRANSFORM_REVERSE_X | TRANSFORM_REVERSE_Z);
        assert_eq!(model.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_reverse_y_keeps_winding() {
        let mut model = quad();
        model.transform(TRANSFORM_REVERSE_Y);
        assert_eq!(model.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(model.positions[2].y, -1.0);
    }

    #[test]
    fn test_swap_yz() {
        let mut model = quad();
        model.transform(TRANSFORM_SWAP_YZ);
        assert_eq!(model.positions[2], Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_aabb_and_center_bottom() {
        let mut model = quad();
        model.scale(2.0);

        let aabb = model.aabb();
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::new(2.0, 2.0, 0.0));

        model.set_origin(Origin::CenterBottom);
        let aabb = model.aabb();
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_fix_tangent_space_repairs_degenerate() {
        let mut model = quad();
        model.normals = Some(vec![Vec3::Z; 4]);
        model.tangents = Some(vec![
            Vec4::new(1.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 0.0, 0.0, -1.0),
            Vec4::new(f32::NAN, 0.0, 0.0, 1.0),
            // Collapsed onto the normal
            Vec4::new(0.0, 0.0, 1.0, 1.0),
        ]);

        model.fix_tangent_space();

        let tangents = model.tangents.as_ref().unwrap();
        for t in tangents {
            let v = t.truncate();
            assert!(v.is_finite());
            assert!((v.length() - 1.0).abs() < 1e-5);
            assert!(v.dot(Vec3::Z).abs() < 1e-5);
        }
        assert_eq!(tangents[1].w, -1.0);
    }
}
