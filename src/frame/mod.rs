//! # Frame Update Orchestrator
//!
//! The per-frame entry point. One call to [`FrameEngine::update`] pulls
//! physical state for the registered bodies, runs camera placement, the
//! coordinate transform into the camera basis, the orientation model, and
//! the eclipse/shadow detectors, and emits a [`FrameOutput`] for the
//! renderer. Data flows one way; nothing here persists across frames
//! except the camera's user-input state and the registry snapshots.
//!
//! The whole pass is O(number of registered bodies), synchronous, and
//! allocation-light; it is intended to run on the same thread that
//! receives input events.

use crate::bodies::{BodyId, BodyRegistry};
use crate::camera::OrbitCamera;
use crate::config::EngineConfig;
use crate::geometry::rotate_into_basis;
use crate::orientation::{body_orientation, days_since_j2000, vehicle_orientation};
use crate::provider::StateProvider;
use crate::scale::screen_diameter;
use crate::shadows::{
    lunar_eclipse, moon_shadow_on_planet, planet_shadow_cylinder, solar_eclipse, LunarEclipse,
    ShadowGeometry, SolarEclipse,
};
use crate::view::{compute_plan, effective_mode, select_strategy, Selection};
use crate::Result;
use log::{debug, trace};
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::collections::HashSet;

/// Hosts of the self-shadow cylinders and moon-shadow casting
pub const GAS_GIANTS: [&str; 4] = ["Jupiter", "Saturn", "Uranus", "Neptune"];

/// Screen-space result for one body
#[derive(Debug, Clone)]
pub struct RenderTransform {
    pub id: BodyId,
    pub name: String,
    /// Camera-relative position in screen pixels (x right, y up, z depth)
    pub screen_pos: Vector3<f64>,
    /// Spin/obliquity (or vehicle pointing) orientation
    pub rotation: UnitQuaternion<f64>,
    pub visible: bool,
    pub screen_diameter_px: f64,
}

/// Final camera parameters for the renderer
#[derive(Debug, Clone, Copy)]
pub struct CameraOutput {
    pub position: Vector3<f64>,
    pub direction: Vector3<f64>,
    pub fov_deg: f64,
    pub near_m: f64,
    pub far_m: f64,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub camera: CameraOutput,
    pub transforms: Vec<RenderTransform>,
    /// Solar eclipse/transit state (meaningful when the Sun is selected)
    pub solar: SolarEclipse,
    /// Lunar eclipse state (computed when the Moon is selected)
    pub lunar: Option<LunarEclipse>,
    /// Anti-sunward shadow cylinders, per visible gas giant
    pub shadows: Vec<(String, ShadowGeometry)>,
    /// Shadow markers cast by moons onto their host planets
    pub moon_shadows: Vec<(String, Vector3<f64>)>,
}

/// Owns the registry, the camera, and the per-frame pass over both
#[derive(Debug)]
pub struct FrameEngine {
    config: EngineConfig,
    registry: BodyRegistry,
    camera: OrbitCamera,
    last_selected: Option<String>,
    /// Display size for text-overlay consumers; resizes never touch the
    /// geometry, which uses the fixed configured screen dimensions
    overlay_size: (f64, f64),
}

impl FrameEngine {
    pub fn new(config: EngineConfig, registry: BodyRegistry) -> Self {
        let camera = OrbitCamera::new(&config);
        let overlay_size = (config.screen_width_px, config.screen_height_px);
        Self {
            config,
            registry,
            camera,
            last_selected: None,
            overlay_size,
        }
    }

    /// Engine over the built-in body table and default configuration
    pub fn with_builtin_bodies() -> Self {
        Self::new(EngineConfig::default(), BodyRegistry::builtin())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BodyRegistry {
        &mut self.registry
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    // Input surface: state mutation only, no geometry.

    pub fn on_drag_start(&mut self, x: f64, y: f64) {
        self.camera.on_drag_start(x, y);
    }

    pub fn on_drag_move(&mut self, x: f64, y: f64) {
        self.camera.on_drag_move(x, y);
    }

    pub fn on_drag_end(&mut self) {
        self.camera.on_drag_end();
    }

    pub fn on_scroll(&mut self, delta_y: f64) {
        self.camera.on_scroll(delta_y);
    }

    /// Affects text-overlay placement only, never the geometry
    pub fn on_resize(&mut self, width_px: f64, height_px: f64) {
        self.overlay_size = (width_px, height_px);
    }

    pub fn overlay_size(&self) -> (f64, f64) {
        self.overlay_size
    }

    /// Run one frame: camera placement, screen transforms, orientation,
    /// and transient-effect detection.
    pub fn update<P: StateProvider>(
        &mut self,
        provider: &P,
        selection: &Selection,
    ) -> Result<FrameOutput> {
        // Camera state survives frames but not a change of target
        if self.last_selected.as_deref() != Some(selection.selected.as_str()) {
            self.camera.reset();
            self.last_selected = Some(selection.selected.clone());
        }

        let mode = effective_mode(selection, &self.registry);
        let strategy = select_strategy(selection, &self.registry);
        trace!("frame: selected={:?} strategy={:?}", selection.selected, strategy);
        let plan = compute_plan(strategy, selection, provider, &self.registry, &self.config)?;

        let (position, mut direction) =
            self.camera
                .look_at(&plan.position, &plan.look_at, mode);

        // Fixed strategy tilt about the camera's right axis
        if plan.tilt_deg != 0.0 {
            let right = Vector3::y().cross(&direction);
            if let Some(right) = Unit::try_new(right, 0.0) {
                direction = UnitQuaternion::from_axis_angle(&right, plan.tilt_deg.to_radians())
                    * direction;
            }
        }

        let fov_deg = self.camera.zoomed_fov(plan.fov_base_deg);
        self.camera.near_m = plan.near_m;
        self.camera.far_m = plan.far_m;

        let (x_axis, y_axis, z_axis) = camera_basis(&direction);
        let px_per_m = self.config.px_per_m();
        let hidden: HashSet<&str> = plan.hide.iter().map(String::as_str).collect();
        let days = days_since_j2000(provider.current_time());

        let mut transforms = Vec::with_capacity(self.registry.len());
        let ids: Vec<BodyId> = self.registry.iter().map(|(id, _)| id).collect();
        for id in ids {
            let record = self.registry.record(id).clone();
            let host_visible = self.registry.state(id).visible;
            let shown = host_visible && !hidden.contains(record.name.as_str());

            let mut visible = shown;
            let mut screen_pos = Vector3::zeros();
            let diameter_px = screen_diameter(&record, &self.config);

            if shown {
                match provider.position(&record.name) {
                    Ok(pos) => {
                        let rel = pos - position;
                        screen_pos = rotate_into_basis(&rel, &x_axis, &y_axis, &z_axis) * px_per_m;
                        let state = self.registry.state_mut(id);
                        state.position = pos;
                        if let Ok(vel) = provider.velocity(&record.name) {
                            state.velocity = vel;
                        }
                    }
                    Err(err) => {
                        // Recoverable: the body simply vanishes for this frame
                        debug!("no state for {:?}: {}; hiding for this frame", record.name, err);
                        visible = false;
                    }
                }
            }

            let rotation = if record.is_vehicle {
                vehicle_orientation(&record.name, provider)
                    .unwrap_or_else(|_| UnitQuaternion::identity())
            } else {
                body_orientation(
                    &record,
                    days,
                    self.camera.azimuth_deg,
                    self.camera.elevation_deg,
                )
            };

            self.registry.state_mut(id).screen_diameter_px = diameter_px;

            transforms.push(RenderTransform {
                id,
                name: record.name,
                screen_pos,
                rotation,
                visible,
                screen_diameter_px: diameter_px,
            });
        }

        let solar = self.detect_solar(provider, selection, &plan.position);
        let lunar = self.detect_lunar(provider, selection);
        let (shadows, moon_shadows) = self.detect_giant_shadows(provider);

        Ok(FrameOutput {
            camera: CameraOutput {
                position,
                direction,
                fov_deg,
                near_m: plan.near_m,
                far_m: plan.far_m,
            },
            transforms,
            solar,
            lunar,
            shadows,
            moon_shadows,
        })
    }

    fn diameter_of(&self, name: &str) -> Option<f64> {
        self.registry.id_of(name).map(|id| self.registry.record(id).diameter_m)
    }

    fn is_shown(&self, name: &str) -> bool {
        self.registry
            .id_of(name)
            .map(|id| self.registry.state(id).visible)
            .unwrap_or(false)
    }

    /// Solar eclipses are only evaluated for the surface observer looking
    /// at the Sun, i.e. when the Sun is the selected body.
    fn detect_solar<P: StateProvider>(
        &self,
        provider: &P,
        selection: &Selection,
        observer: &Vector3<f64>,
    ) -> SolarEclipse {
        if selection.selected != "Sun" {
            return SolarEclipse::default();
        }
        let (Ok(sun_pos), Ok(moon_pos)) = (provider.position("Sun"), provider.position("Moon"))
        else {
            return SolarEclipse::default();
        };
        let (Some(sun_d), Some(moon_d)) = (self.diameter_of("Sun"), self.diameter_of("Moon"))
        else {
            return SolarEclipse::default();
        };
        solar_eclipse(observer, &sun_pos, sun_d, &moon_pos, moon_d)
    }

    /// Lunar eclipses are only evaluated when the Moon is selected.
    fn detect_lunar<P: StateProvider>(
        &self,
        provider: &P,
        selection: &Selection,
    ) -> Option<LunarEclipse> {
        if selection.selected != "Moon" {
            return None;
        }
        let sun_pos = provider.position("Sun").ok()?;
        let earth_pos = provider.position("Earth").ok()?;
        let moon_pos = provider.position("Moon").ok()?;
        Some(lunar_eclipse(
            &sun_pos,
            self.diameter_of("Sun")?,
            &earth_pos,
            self.diameter_of("Earth")?,
            &moon_pos,
            self.diameter_of("Moon")?,
        ))
    }

    /// Self-shadow cylinders for visible gas giants, plus shadow markers
    /// for their visible moons.
    fn detect_giant_shadows<P: StateProvider>(
        &self,
        provider: &P,
    ) -> (Vec<(String, ShadowGeometry)>, Vec<(String, Vector3<f64>)>) {
        let mut shadows = Vec::new();
        let mut moon_shadows = Vec::new();
        let Ok(sun_pos) = provider.position("Sun") else {
            return (shadows, moon_shadows);
        };

        for giant in GAS_GIANTS {
            if !self.is_shown(giant) {
                continue;
            }
            let Ok(planet_pos) = provider.position(giant) else {
                continue;
            };
            let Some(planet_d) = self.diameter_of(giant) else {
                continue;
            };
            shadows.push((
                giant.to_string(),
                planet_shadow_cylinder(&sun_pos, &planet_pos, planet_d),
            ));

            for (_, record) in self.registry.iter() {
                if record.parent.as_deref() != Some(giant) || !self.is_shown(&record.name) {
                    continue;
                }
                let Ok(moon_pos) = provider.position(&record.name) else {
                    continue;
                };
                if let Some(point) =
                    moon_shadow_on_planet(&sun_pos, &moon_pos, &planet_pos, planet_d)
                {
                    moon_shadows.push((record.name.clone(), point));
                }
            }
        }
        (shadows, moon_shadows)
    }
}

fn camera_basis(direction: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let forward = *direction;
    let right = Vector3::y()
        .cross(&forward)
        .try_normalize(0.0)
        // Looking straight up or down: any horizontal right-axis works
        .unwrap_or_else(Vector3::x);
    let up = forward.cross(&right);
    (right, up, forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AU_M;
    use crate::provider::StaticProvider;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn provider() -> StaticProvider {
        let mut p = StaticProvider::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        p.set_position("Sun", Vector3::zeros());
        p.set_position("Earth", Vector3::new(AU_M, 0.0, 0.0));
        p.set_position("Moon", Vector3::new(AU_M - 3.844e8, 0.0, 0.0));
        p.set_position("Jupiter", Vector3::new(0.0, 0.0, 5.2 * AU_M));
        p.set_position("Io", Vector3::new(0.0, 0.0, 5.2 * AU_M - 4.2e8));
        p
    }

    fn engine() -> FrameEngine {
        FrameEngine::with_builtin_bodies()
    }

    #[test]
    fn test_update_produces_transform_per_body() {
        let mut eng = engine();
        let out = eng.update(&provider(), &Selection::observer("Earth")).unwrap();
        assert_eq!(out.transforms.len(), eng.registry().len());
    }

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let (x, y, z) = camera_basis(&Vector3::new(0.3, -0.4, 0.866).normalize());
        assert_relative_eq!(x.dot(&y), 0.0, epsilon = 1e-12);
        assert_relative_eq!(x.dot(&z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(y.dot(&z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(x.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(y.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_camera_basis_degenerate_vertical() {
        let (x, y, z) = camera_basis(&Vector3::y());
        assert_relative_eq!(x.dot(&z), 0.0, epsilon = 1e-12);
        assert_relative_eq!(y.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_selection_change_resets_camera() {
        let mut eng = engine();
        let p = provider();
        eng.update(&p, &Selection::observer("Earth")).unwrap();
        eng.on_drag_start(0.0, 0.0);
        eng.on_drag_move(100.0, 0.0);
        eng.on_scroll(50.0);
        assert!(eng.camera().azimuth_deg != 0.0);

        eng.update(&p, &Selection::observer("Jupiter")).unwrap();
        assert_eq!(eng.camera().azimuth_deg, 0.0);
        assert_eq!(eng.camera().zoom, eng.config().default_zoom);
    }

    #[test]
    fn test_same_selection_preserves_camera() {
        let mut eng = engine();
        let p = provider();
        eng.update(&p, &Selection::observer("Earth")).unwrap();
        eng.on_drag_start(0.0, 0.0);
        eng.on_drag_move(100.0, 0.0);
        let az = eng.camera().azimuth_deg;
        eng.update(&p, &Selection::observer("Earth")).unwrap();
        assert_eq!(eng.camera().azimuth_deg, az);
    }

    #[test]
    fn test_missing_body_hidden_not_fatal() {
        let mut eng = engine();
        // Provider knows nothing about the outer planets or vehicles
        let mut p = StaticProvider::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        p.set_position("Sun", Vector3::zeros());
        p.set_position("Earth", Vector3::new(AU_M, 0.0, 0.0));
        let out = eng.update(&p, &Selection::observer("Earth")).unwrap();
        let mars = out.transforms.iter().find(|t| t.name == "Mars").unwrap();
        assert!(!mars.visible);
        let earth = out.transforms.iter().find(|t| t.name == "Earth").unwrap();
        assert!(earth.visible);
    }

    #[test]
    fn test_gas_giant_shadow_outputs() {
        let mut eng = engine();
        let out = eng.update(&provider(), &Selection::observer("Earth")).unwrap();
        // Jupiter has state; the other giants are unknown to the provider
        assert_eq!(out.shadows.len(), 1);
        assert_eq!(out.shadows[0].0, "Jupiter");
        // Io sits between the Sun and Jupiter: its shadow lands
        assert_eq!(out.moon_shadows.len(), 1);
        assert_eq!(out.moon_shadows[0].0, "Io");
    }

    #[test]
    fn test_hidden_giant_casts_nothing() {
        let mut eng = engine();
        let id = eng.registry().id_of("Jupiter").unwrap();
        eng.registry_mut().set_visible(id, false);
        let out = eng.update(&provider(), &Selection::observer("Earth")).unwrap();
        assert!(out.shadows.is_empty());
        assert!(out.moon_shadows.is_empty());
    }

    #[test]
    fn test_resize_does_not_move_geometry() {
        let mut eng = engine();
        let p = provider();
        let before = eng.update(&p, &Selection::observer("Earth")).unwrap();
        eng.on_resize(640.0, 480.0);
        let after = eng.update(&p, &Selection::observer("Earth")).unwrap();
        assert_eq!(eng.overlay_size(), (640.0, 480.0));
        let e0 = before.transforms.iter().find(|t| t.name == "Earth").unwrap();
        let e1 = after.transforms.iter().find(|t| t.name == "Earth").unwrap();
        assert_relative_eq!(e0.screen_pos.x, e1.screen_pos.x, epsilon = 1e-9);
    }
}
