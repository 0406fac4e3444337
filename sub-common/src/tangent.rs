//! Tangent-space quaternion compression
//!
//! A per-vertex orthonormal frame (tangent, bitangent, normal) is a rotation,
//! so it can be stored as a single unit quaternion instead of two vectors and
//! a sign. The handedness of the frame is carried in the sign of `w`:
//! encoding canonicalizes the quaternion to the `w >= 0` hemisphere, then
//! negates `w` when the bitangent sign is negative. Consumers recover the
//! sign from `sign(w)` and must flip back to the positive hemisphere before
//! using the quaternion as a rotation.

use glam::{Mat3, Quat, Vec3};

/// Below this |w| a near-180° rotation would lose the sign bit to rounding
const W_THRESHOLD: f32 = 1e-6;

/// Compress a tangent frame to a unit quaternion.
///
/// The bitangent is rebuilt as `cross(normal, tangent)`, so only the stored
/// sign distinguishes left- from right-handed frames. `tangent` and `normal`
/// must be unit length and orthogonal; `bitangent_sign` is ±1.
pub fn encode_tangent_space(tangent: Vec3, normal: Vec3, bitangent_sign: f32) -> Quat {
    let bitangent = normal.cross(tangent);

    let tbn = Mat3::from_cols(tangent, bitangent, normal);
    let q = Quat::from_mat3(&tbn);

    let (mut x, mut y, mut z, mut w) = (q.x, q.y, q.z, q.w);

    // Keep w away from zero so its sign survives the round-trip
    if w.abs() < W_THRESHOLD {
        let renormalization = (1.0 - W_THRESHOLD * W_THRESHOLD).sqrt();

        x *= renormalization;
        y *= renormalization;
        z *= renormalization;
        w = if w < 0.0 { -W_THRESHOLD } else { W_THRESHOLD };
    }

    // Hemisphere fix: w >= 0 is the stored convention
    if w < 0.0 {
        x = -x;
        y = -y;
        z = -z;
        w = -w;
    }

    if bitangent_sign < 0.0 {
        w = -w;
    }

    Quat::from_xyzw(x, y, z, w)
}

/// Recover `(tangent, normal, bitangent_sign)` from a stored quaternion
pub fn decode_tangent_space(q: Quat) -> (Vec3, Vec3, f32) {
    let bitangent_sign = if q.w < 0.0 { -1.0 } else { 1.0 };

    let rotation = Quat::from_xyzw(q.x, q.y, q.z, q.w.abs());
    let tbn = Mat3::from_quat(rotation);

    (tbn.x_axis, tbn.z_axis, bitangent_sign)
}
