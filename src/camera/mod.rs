//! # Orbit Camera Controller
//!
//! Owns the user-driven view state: azimuth/elevation offsets accumulated
//! from pointer drags, and a zoom level accumulated from scroll deltas.
//! `look_at` folds these offsets into a physical camera position by taking
//! the spherical detour around the look-at point: convert the camera's
//! offset from the target to (rho, theta, phi), add the drag angles, clamp
//! the polar angle away from the gimbal singularities, and convert back at
//! the same radius.
//!
//! In observer mode the camera is additionally re-projected to a fixed
//! standoff distance along the computed direction, so a look-at target a
//! few thousand kilometers away and one forty AU away both render at the
//! same, numerically comfortable distance.
//!
//! All three input callbacks only mutate scalars on this struct; the heavy
//! lifting happens once per frame in `look_at`. That keeps the input path
//! safe to call from the frame thread with no synchronization.

use crate::config::EngineConfig;
use crate::constants::{MAX_FOV_DEG, MIN_FOV_DEG, OBSERVER_STANDOFF_M};
use crate::geometry::{from_spherical, to_spherical};
use crate::view::ViewMode;
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Polar-angle clamp keeping phi inside the open interval (0, pi)
const POLE_EPSILON: f64 = 1.0e-6;

/// User-driven orbit/zoom state plus the per-frame computed camera pose
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Accumulated azimuth drag, degrees, wrapped modulo 360
    pub azimuth_deg: f64,
    /// Accumulated elevation drag, degrees, clamped to [-180, 180]
    pub elevation_deg: f64,
    /// Zoom level in [min_zoom, max_zoom]; default yields the base fov
    pub zoom: f64,
    /// Field of view computed for the current frame, degrees
    pub fov_deg: f64,
    /// Near clip distance, meters
    pub near_m: f64,
    /// Far clip distance, meters
    pub far_m: f64,
    /// Camera position computed by the last `look_at`
    pub position: Vector3<f64>,
    /// Unit direction computed by the last `look_at`
    pub direction: Vector3<f64>,

    drag_anchor: Option<(f64, f64)>,
    drag_sensitivity: f64,
    scroll_sensitivity: f64,
    min_zoom: f64,
    max_zoom: f64,
    default_zoom: f64,
}

impl OrbitCamera {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            zoom: config.default_zoom,
            fov_deg: 45.0,
            near_m: 1.0,
            far_m: OBSERVER_STANDOFF_M * 4.0,
            position: Vector3::zeros(),
            direction: Vector3::new(0.0, 0.0, -1.0),
            drag_anchor: None,
            drag_sensitivity: config.drag_sensitivity_deg_per_px,
            scroll_sensitivity: config.scroll_sensitivity,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            default_zoom: config.default_zoom,
        }
    }

    /// Zero the drag offsets and restore the default zoom. Called when the
    /// selection target changes; the pose fields are overwritten by the
    /// next frame anyway.
    pub fn reset(&mut self) {
        self.azimuth_deg = 0.0;
        self.elevation_deg = 0.0;
        self.zoom = self.default_zoom;
        self.drag_anchor = None;
    }

    // Input callbacks. State-mutating only; no geometry here.

    pub fn on_drag_start(&mut self, x: f64, y: f64) {
        self.drag_anchor = Some((x, y));
    }

    pub fn on_drag_move(&mut self, x: f64, y: f64) {
        let Some((ax, ay)) = self.drag_anchor else {
            return;
        };
        let dx = x - ax;
        let dy = y - ay;
        self.azimuth_deg =
            (self.azimuth_deg + dx * self.drag_sensitivity).rem_euclid(360.0);
        self.elevation_deg =
            (self.elevation_deg + dy * self.drag_sensitivity).clamp(-180.0, 180.0);
        self.drag_anchor = Some((x, y));
    }

    pub fn on_drag_end(&mut self) {
        self.drag_anchor = None;
    }

    pub fn on_scroll(&mut self, delta_y: f64) {
        self.zoom =
            (self.zoom + delta_y * self.scroll_sensitivity).clamp(self.min_zoom, self.max_zoom);
    }

    /// Compute the final camera pose for this frame.
    ///
    /// Orbits `camera_pos` around `look_at_pos` by the accumulated drag
    /// offsets, then re-projects to the fixed standoff distance in observer
    /// mode. Returns the (position, direction) pair and stores it on the
    /// struct for the frame orchestrator.
    ///
    /// A camera exactly at the look-at point is degenerate; the direction
    /// falls back to -Z rather than propagating a NaN.
    pub fn look_at(
        &mut self,
        camera_pos: &Vector3<f64>,
        look_at_pos: &Vector3<f64>,
        mode: ViewMode,
    ) -> (Vector3<f64>, Vector3<f64>) {
        let offset = camera_pos - look_at_pos;
        let (rho, theta, phi) = to_spherical(&offset);

        let adjusted = if rho > 0.0 {
            let theta = theta + self.azimuth_deg.to_radians();
            let phi = (phi - self.elevation_deg.to_radians())
                .clamp(POLE_EPSILON, PI - POLE_EPSILON);
            look_at_pos + from_spherical(rho, theta, phi)
        } else {
            *camera_pos
        };

        let direction = (look_at_pos - adjusted)
            .try_normalize(0.0)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, -1.0));

        let position = match mode {
            ViewMode::Observer => look_at_pos - direction * OBSERVER_STANDOFF_M,
            ViewMode::Onboard => adjusted,
        };

        self.position = position;
        self.direction = direction;
        (position, direction)
    }

    /// Field of view after the zoom multiplier, clamped to (0, 90].
    ///
    /// zoom = default (90) yields the base fov; zoom = 0 yields 10x
    /// magnification; zoom near the upper bound approaches zero fov.
    pub fn zoomed_fov(&mut self, fov_base_deg: f64) -> f64 {
        let fov = (10.0 - 0.1 * self.zoom) * fov_base_deg;
        let fov = fov.clamp(MIN_FOV_DEG, MAX_FOV_DEG);
        self.fov_deg = fov;
        fov
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::to_spherical;
    use approx::assert_relative_eq;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(&EngineConfig::default())
    }

    #[test]
    fn test_drag_accumulation_and_wrap() {
        let mut cam = camera();
        cam.on_drag_start(0.0, 0.0);
        // 0.25 deg/px default sensitivity: 2000 px -> 500 deg -> wraps to 140
        cam.on_drag_move(2000.0, 0.0);
        assert_relative_eq!(cam.azimuth_deg, 140.0, epsilon = 1e-9);
        assert!(cam.azimuth_deg >= 0.0 && cam.azimuth_deg < 360.0);
    }

    #[test]
    fn test_elevation_clamped() {
        let mut cam = camera();
        cam.on_drag_start(0.0, 0.0);
        cam.on_drag_move(0.0, 1.0e6);
        assert_eq!(cam.elevation_deg, 180.0);
        cam.on_drag_start(0.0, 0.0);
        cam.on_drag_move(0.0, -1.0e7);
        assert_eq!(cam.elevation_deg, -180.0);
    }

    #[test]
    fn test_drag_without_start_is_ignored() {
        let mut cam = camera();
        cam.on_drag_move(500.0, 500.0);
        assert_eq!(cam.azimuth_deg, 0.0);
        assert_eq!(cam.elevation_deg, 0.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = camera();
        cam.on_scroll(1.0e9);
        assert_eq!(cam.zoom, crate::constants::MAX_ZOOM);
        cam.on_scroll(-1.0e9);
        assert_eq!(cam.zoom, crate::constants::MIN_ZOOM);
    }

    #[test]
    fn test_look_at_no_drag_points_at_target() {
        let mut cam = camera();
        let pos = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(1.5e11, 0.0, 0.0);
        let (p, d) = cam.look_at(&pos, &target, ViewMode::Observer);
        assert_relative_eq!(d.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        // Observer mode re-projects to the standoff distance
        assert_relative_eq!((target - p).norm(), OBSERVER_STANDOFF_M, epsilon = 1.0);
    }

    #[test]
    fn test_look_at_onboard_keeps_radius() {
        let mut cam = camera();
        cam.azimuth_deg = 90.0;
        let pos = Vector3::new(1.0e9, 0.0, 0.0);
        let target = Vector3::zeros();
        let (p, _) = cam.look_at(&pos, &target, ViewMode::Onboard);
        // Orbit preserves the radius around the target
        assert_relative_eq!(p.norm(), 1.0e9, epsilon = 1e-3);
        // 90 degrees of azimuth moves the camera out of the X axis
        assert!(p.x.abs() < 1.0);
        assert_relative_eq!(p.z.abs(), 1.0e9, epsilon = 1e-3);
    }

    #[test]
    fn test_phi_stays_in_open_interval() {
        let mut cam = camera();
        // Extreme elevation drag tries to push phi past the pole
        cam.elevation_deg = 180.0;
        let pos = Vector3::new(0.0, 1.0e9, 1.0e5);
        let target = Vector3::zeros();
        let (p, _) = cam.look_at(&pos, &target, ViewMode::Onboard);
        let (_, _, phi) = to_spherical(&(p - target));
        assert!(phi > 0.0 && phi < PI);
    }

    #[test]
    fn test_degenerate_colocated_camera() {
        let mut cam = camera();
        let pos = Vector3::new(5.0, 5.0, 5.0);
        let (_, d) = cam.look_at(&pos, &pos, ViewMode::Onboard);
        // Sentinel direction, not NaN
        assert!(d.iter().all(|c| c.is_finite()));
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zoomed_fov_bounds() {
        let mut cam = camera();
        // Default zoom (90): multiplier is exactly 1
        assert_relative_eq!(cam.zoomed_fov(30.0), 30.0, epsilon = 1e-12);
        // Zoom 0: 10x the base, clamped to 90
        cam.zoom = 0.0;
        assert_eq!(cam.zoomed_fov(30.0), 90.0);
        // Near max zoom: tiny but strictly positive
        cam.zoom = 99.9;
        let fov = cam.zoomed_fov(30.0);
        assert!(fov > 0.0 && fov <= 90.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut cam = camera();
        cam.azimuth_deg = 123.0;
        cam.elevation_deg = -45.0;
        cam.zoom = 10.0;
        cam.reset();
        assert_eq!(cam.azimuth_deg, 0.0);
        assert_eq!(cam.elevation_deg, 0.0);
        assert_eq!(cam.zoom, 90.0);
    }
}
