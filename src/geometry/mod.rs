//! # Geometry Primitives
//!
//! Stateless vector operations used by every other part of the engine:
//! angular separation, spherical conversions, line-sphere intersection, and
//! projection into an orthonormal basis.
//!
//! ## Coordinate Convention
//!
//! The engine works in a right-handed ecliptic frame with **Y up**:
//! - **X-axis**: in the ecliptic plane, toward the vernal equinox
//! - **Y-axis**: toward the north ecliptic pole
//! - **Z-axis**: in the ecliptic plane, completing the right-handed frame
//!
//! Spherical coordinates follow the same convention: `theta` is the azimuth
//! measured in the X-Z plane from +X, `phi` is the polar angle measured from
//! +Y. The polar angle is where the camera's gimbal singularity lives, so
//! callers clamp it to the open interval (0, pi).
//!
//! ## Degenerate Input
//!
//! Zero-length vectors and rays that miss their target sphere are expected
//! inputs, not errors. `angle_between_deg` returns 0 for a zero-magnitude
//! operand, and `intersect_line_sphere` returns `None` for a miss; callers
//! must branch on these outcomes explicitly.

use crate::constants::RAD2DEG;
use nalgebra::Vector3;

/// Angle between two vectors in degrees, in [0, 180].
///
/// Returns 0 when either vector has zero magnitude.
pub fn angle_between_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let mag_product = a.norm() * b.norm();
    if mag_product == 0.0 {
        return 0.0;
    }
    let cos_angle = (a.dot(b) / mag_product).clamp(-1.0, 1.0);
    cos_angle.acos() * RAD2DEG
}

/// Converts a vector to spherical coordinates `(rho, theta, phi)`.
///
/// `rho` is the magnitude, `theta` the azimuth in the X-Z plane measured
/// from +X toward +Z, `phi` the polar angle from +Y. A zero vector maps to
/// `(0, 0, 0)`.
pub fn to_spherical(v: &Vector3<f64>) -> (f64, f64, f64) {
    let rho = v.norm();
    if rho == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let theta = v.z.atan2(v.x);
    let phi = (v.y / rho).clamp(-1.0, 1.0).acos();
    (rho, theta, phi)
}

/// Converts spherical coordinates `(rho, theta, phi)` back to a vector.
///
/// Inverse of [`to_spherical`] for `rho > 0`, `phi` in [0, pi].
pub fn from_spherical(rho: f64, theta: f64, phi: f64) -> Vector3<f64> {
    let sin_phi = phi.sin();
    Vector3::new(
        rho * sin_phi * theta.cos(),
        rho * phi.cos(),
        rho * sin_phi * theta.sin(),
    )
}

/// Nearest intersection of a ray with a sphere, or `None` on a miss.
///
/// The ray starts at `origin` and extends along `direction` (not required
/// to be unit length; a zero direction is a miss). Only intersections at or
/// ahead of the origin count: a sphere entirely behind the ray origin is a
/// miss. A miss is an expected outcome -- for shadow casting it means the
/// occulter's shadow does not currently fall on the target sphere.
pub fn intersect_line_sphere(
    direction: &Vector3<f64>,
    origin: &Vector3<f64>,
    center: &Vector3<f64>,
    diameter: f64,
) -> Option<Vector3<f64>> {
    let dir_norm = direction.norm();
    if dir_norm == 0.0 {
        return None;
    }
    let d = direction / dir_norm;
    let radius = diameter / 2.0;

    // Standard quadratic: |origin + t*d - center|^2 = r^2
    let oc = origin - center;
    let b = oc.dot(&d);
    let c = oc.dot(&oc) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    // Nearest root at or ahead of the origin
    let t_near = -b - sqrt_disc;
    let t_far = -b + sqrt_disc;
    let t = if t_near >= 0.0 {
        t_near
    } else if t_far >= 0.0 {
        t_far
    } else {
        return None;
    };

    Some(origin + d * t)
}

/// Projects `v` into the orthonormal basis `(x_axis, y_axis, z_axis)`.
///
/// The result's components are the coordinates of `v` expressed in the
/// given basis. Callers are responsible for supplying axes close to
/// orthonormal unit vectors; the camera basis built by the frame
/// orchestrator satisfies this by construction.
pub fn rotate_into_basis(
    v: &Vector3<f64>,
    x_axis: &Vector3<f64>,
    y_axis: &Vector3<f64>,
    z_axis: &Vector3<f64>,
) -> Vector3<f64> {
    Vector3::new(v.dot(x_axis), v.dot(y_axis), v.dot(z_axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_between_axes() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(angle_between_deg(&x, &y), 90.0, epsilon = 1e-12);
        assert_relative_eq!(angle_between_deg(&x, &(-x)), 180.0, epsilon = 1e-12);
        assert_relative_eq!(angle_between_deg(&x, &(x * 2.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_between_zero_vector() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let zero = Vector3::zeros();
        assert_eq!(angle_between_deg(&x, &zero), 0.0);
    }

    #[test]
    fn test_spherical_round_trip() {
        let cases = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(3.0, -4.0, 12.0),
            Vector3::new(-1.0, 2.0, -0.5),
        ];
        for v in cases {
            let (rho, theta, phi) = to_spherical(&v);
            let back = from_spherical(rho, theta, phi);
            assert_relative_eq!(v.x, back.x, epsilon = 1e-12);
            assert_relative_eq!(v.y, back.y, epsilon = 1e-12);
            assert_relative_eq!(v.z, back.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_spherical_pole() {
        let up = Vector3::new(0.0, 5.0, 0.0);
        let (rho, _theta, phi) = to_spherical(&up);
        assert_relative_eq!(rho, 5.0, epsilon = 1e-12);
        assert_relative_eq!(phi, 0.0, epsilon = 1e-12);

        let down = Vector3::new(0.0, -5.0, 0.0);
        let (_, _, phi) = to_spherical(&down);
        assert_relative_eq!(phi, PI, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_hit_is_on_surface() {
        let origin = Vector3::new(-10.0, 0.0, 0.0);
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let center = Vector3::zeros();
        let hit = intersect_line_sphere(&dir, &origin, &center, 2.0).unwrap();
        assert_relative_eq!((hit - center).norm(), 1.0, epsilon = 1e-12);
        // Nearest face of the sphere
        assert_relative_eq!(hit.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_miss() {
        let origin = Vector3::new(-10.0, 5.0, 0.0);
        let dir = Vector3::new(1.0, 0.0, 0.0);
        // Closest approach (5.0) exceeds the radius (1.0)
        let miss = intersect_line_sphere(&dir, &origin, &Vector3::zeros(), 2.0);
        assert!(miss.is_none());
    }

    #[test]
    fn test_intersect_sphere_behind_origin() {
        let origin = Vector3::new(10.0, 0.0, 0.0);
        let dir = Vector3::new(1.0, 0.0, 0.0);
        let miss = intersect_line_sphere(&dir, &origin, &Vector3::zeros(), 2.0);
        assert!(miss.is_none());
    }

    #[test]
    fn test_intersect_origin_inside_sphere() {
        let origin = Vector3::zeros();
        let dir = Vector3::new(0.0, 0.0, 1.0);
        let hit = intersect_line_sphere(&dir, &origin, &Vector3::zeros(), 4.0).unwrap();
        assert_relative_eq!(hit.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_zero_direction() {
        let miss = intersect_line_sphere(
            &Vector3::zeros(),
            &Vector3::new(-10.0, 0.0, 0.0),
            &Vector3::zeros(),
            2.0,
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_rotate_into_basis_identity() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let out = rotate_into_basis(
            &v,
            &Vector3::x_axis(),
            &Vector3::y_axis(),
            &Vector3::z_axis(),
        );
        assert_relative_eq!(out.x, 1.0, epsilon = 1e-15);
        assert_relative_eq!(out.y, 2.0, epsilon = 1e-15);
        assert_relative_eq!(out.z, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rotate_into_rotated_basis() {
        // Basis rotated 90 degrees about Y: new x = -z_world, new z = x_world
        let x_axis = Vector3::new(0.0, 0.0, -1.0);
        let y_axis = Vector3::new(0.0, 1.0, 0.0);
        let z_axis = Vector3::new(1.0, 0.0, 0.0);
        // Verify the basis is orthonormal before relying on it
        assert_relative_eq!(x_axis.dot(&y_axis), 0.0, epsilon = 1e-15);
        assert_relative_eq!(x_axis.dot(&z_axis), 0.0, epsilon = 1e-15);
        assert_relative_eq!(x_axis.norm(), 1.0, epsilon = 1e-15);

        let v = Vector3::new(1.0, 0.0, 0.0);
        let out = rotate_into_basis(&v, &x_axis, &y_axis, &z_axis);
        assert_relative_eq!(out.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(out.y, 0.0, epsilon = 1e-15);
        assert_relative_eq!(out.z, 1.0, epsilon = 1e-15);
    }
}
