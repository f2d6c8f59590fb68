use glam::{Quat, Vec3};

/// Camera-local forward axis. The camera looks down -Z (right-handed).
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;
/// Camera-local up axis.
pub const LOCAL_UP: Vec3 = Vec3::Y;
/// Camera-local right axis.
pub const LOCAL_RIGHT: Vec3 = Vec3::X;

/// Rotate `v` by `q` and normalize the result.
///
/// Falls back to `v` when the rotated vector degenerates (zero length or NaN).
pub fn rotate_unit(q: Quat, v: Vec3) -> Vec3 {
    (q * v).normalize_or(v)
}

/// Bring a quaternion back to unit length.
///
/// A quaternion that has collapsed to zero or picked up NaN cannot be
/// recovered, so it resets to identity.
pub fn renormalize(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > f32::EPSILON {
        q.normalize()
    } else {
        Quat::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_keeps_axes() {
        assert_eq!(rotate_unit(Quat::IDENTITY, LOCAL_FORWARD), LOCAL_FORWARD);
        assert_eq!(rotate_unit(Quat::IDENTITY, LOCAL_UP), LOCAL_UP);
    }

    #[test]
    fn quarter_yaw_turns_forward_to_left() {
        let q = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let f = rotate_unit(q, LOCAL_FORWARD);
        assert!(f.abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn rotate_unit_normalizes_scaled_quaternion() {
        let q = Quat::from_axis_angle(Vec3::X, 0.3) * 2.0;
        let v = rotate_unit(q, LOCAL_UP);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn renormalize_scaled() {
        let q = Quat::from_axis_angle(Vec3::Z, 1.0) * 3.5;
        let n = renormalize(q);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn renormalize_degenerate_is_identity() {
        assert_eq!(renormalize(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(
            renormalize(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)),
            Quat::IDENTITY
        );
    }
}
