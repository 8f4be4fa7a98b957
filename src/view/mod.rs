//! # View Strategy Selector
//!
//! Camera placement is a pure function of (view mode, selected body,
//! observed body, vehicle membership). Each strategy produces a
//! [`CameraPlan`]: a physical camera position, a look-at point, a base
//! field of view (before the user's zoom multiplier), near/far clip
//! distances, and any transient visibility overrides.
//!
//! The dispatch is an exhaustive enum rather than name-keyed branching, so
//! adding a strategy is a compile-time checklist and each arm is
//! independently testable.
//!
//! Several clip and field-of-view constants below are empirically tuned
//! for visual appearance at specific documented encounters. They are fixed
//! policy; see the comment on each.

use crate::bodies::BodyRegistry;
use crate::config::EngineConfig;
use crate::constants::{DEG2RAD, MAX_FOV_DEG, MIN_FOV_DEG, RAD2DEG, TRANSIT_PROXIMITY_DEG};
use crate::geometry::angle_between_deg;
use crate::provider::{ProviderError, StateProvider};
use log::debug;
use nalgebra::Vector3;

/// Clip-plane margin bracketing the Sun-Earth distance in the
/// sun-relative strategy, meters
const SUN_RELATIVE_CLIP_MARGIN_M: f64 = 1.0e9;
/// Sun-relative framing: base fov is the target's apparent diameter times
/// this factor, putting the Earth disk at roughly 1/30 of the frame
const SUN_RELATIVE_FRAMING: f64 = 30.0;
/// Surface-observer framing factor for the Sun and generic targets
const SURFACE_FRAMING: f64 = 4.0;
/// Minimum fov for vehicle strategies, degrees
const VEHICLE_MIN_FOV_DEG: f64 = 4.0;
/// Below this distance from the target's surface the close-approach clip
/// and framing constants apply, meters
const CLOSE_APPROACH_M: f64 = 1.0e9;
/// Close-approach near-clip fraction of the surface distance. Tuned so the
/// Rosetta 2007 Mars swing-by keeps the planet limb inside the frustum.
const CLOSE_NEAR_FRACTION: f64 = 1.0e-3;
/// Far-approach near-clip fraction of the surface distance
const FAR_NEAR_FRACTION: f64 = 0.5;
/// Close-approach camera pull-back along the approach line, as a fraction
/// of the surface distance. Keeps a sub-pixel flyby target visible.
const FLYBY_PULLBACK_FRACTION: f64 = 0.1;
/// Close-approach fov widening applied to the target's apparent diameter
const FLYBY_FOV_WIDENING: f64 = 2.5;
/// Station strategy constants (low Earth orbit framing)
const STATION_FOV_DEG: f64 = 60.0;
const STATION_NEAR_M: f64 = 1.0;
const STATION_FAR_M: f64 = 1.0e8;
/// Crewed-capsule strategy constants
const CAPSULE_FOV_DEG: f64 = 40.0;
const CAPSULE_NEAR_M: f64 = 10.0;
const CAPSULE_FAR_M: f64 = 1.0e10;
/// Fixed downward tilt reproducing the Apollo 8 "Earthrise" framing, with
/// the lunar horizon in the lower third of the frame
const EARTHRISE_TILT_DEG: f64 = 15.0;

// Transit apparent-radius corrections. When one of these bodies sits
// within 1 degree of the Sun, the rendered solar radius is inflated by the
// body's factor so the occultation reads at display scale.
/// Moon: sized against the 2017-08-21 total-eclipse framing
const MOON_TRANSIT_FACTOR: f64 = 1.6;
/// Mercury: sized against the 2019-11-11 transit imagery
const MERCURY_TRANSIT_FACTOR: f64 = 1.02;
/// Venus: sized against the 2012-06-05 transit imagery
const VENUS_TRANSIT_FACTOR: f64 = 1.05;

/// How the camera relates to the selected body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Telescope-like orbit around a look-at target
    Observer,
    /// Co-located with a moving vehicle
    Onboard,
}

/// Host-driven selection for the frame
#[derive(Debug, Clone)]
pub struct Selection {
    /// Body the camera belongs to or orbits
    pub selected: String,
    /// Body the camera looks toward (vehicle strategies)
    pub observed: String,
    /// Requested mode; non-vehicle selections force [`ViewMode::Observer`]
    pub mode: ViewMode,
}

impl Selection {
    pub fn observer(selected: &str) -> Self {
        Self {
            selected: selected.to_string(),
            observed: selected.to_string(),
            mode: ViewMode::Observer,
        }
    }

    pub fn onboard(vehicle: &str, observed: &str) -> Self {
        Self {
            selected: vehicle.to_string(),
            observed: observed.to_string(),
            mode: ViewMode::Onboard,
        }
    }
}

/// Camera-placement strategies, one per distinct framing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStrategy {
    /// Camera at the Sun, looking at the Earth
    SunRelative,
    /// Surface observer looking at the Sun, with transit corrections
    SurfaceToSun,
    /// Surface observer looking at an arbitrary body
    SurfaceToBody,
    /// Camera aboard a vehicle, looking at the observed body
    OnboardVehicle,
    /// Low-orbit station framing with fixed optics
    StationOrbit,
    /// Crewed-capsule framing with the historical tilt
    CrewedCapsule,
}

/// Everything `look_at` and the projection step need from a strategy
#[derive(Debug, Clone)]
pub struct CameraPlan {
    pub position: Vector3<f64>,
    pub look_at: Vector3<f64>,
    /// Base field of view before the zoom multiplier, degrees
    pub fov_base_deg: f64,
    pub near_m: f64,
    pub far_m: f64,
    /// Extra fixed camera tilt about the horizontal screen axis, degrees
    pub tilt_deg: f64,
    /// Bodies to hide this frame (e.g. the vehicle the camera sits in)
    pub hide: Vec<String>,
}

/// Effective mode after the vehicle rule: only vehicles may be Onboard.
pub fn effective_mode(selection: &Selection, registry: &BodyRegistry) -> ViewMode {
    if selection.mode == ViewMode::Onboard && registry.is_vehicle(&selection.selected) {
        ViewMode::Onboard
    } else {
        ViewMode::Observer
    }
}

/// Pure strategy dispatch on (mode, selected body identity).
pub fn select_strategy(selection: &Selection, registry: &BodyRegistry) -> ViewStrategy {
    match effective_mode(selection, registry) {
        ViewMode::Onboard => match selection.selected.as_str() {
            "ISS" => ViewStrategy::StationOrbit,
            "Apollo" => ViewStrategy::CrewedCapsule,
            _ => ViewStrategy::OnboardVehicle,
        },
        ViewMode::Observer => match selection.selected.as_str() {
            "Earth" => ViewStrategy::SunRelative,
            "Sun" => ViewStrategy::SurfaceToSun,
            _ => ViewStrategy::SurfaceToBody,
        },
    }
}

/// Apparent angular diameter of a sphere, degrees
fn apparent_diameter_deg(diameter_m: f64, distance_m: f64) -> f64 {
    if distance_m <= 0.0 {
        return MAX_FOV_DEG;
    }
    2.0 * (diameter_m / (2.0 * distance_m)).atan() * RAD2DEG
}

/// Position lookup with the documented single-retry fallback.
///
/// Returns the name actually used alongside its position, so callers know
/// when the substitution happened.
fn position_with_fallback<P: StateProvider>(
    provider: &P,
    name: &str,
    fallback: &str,
) -> Result<(String, Vector3<f64>), ProviderError> {
    match provider.position(name) {
        Ok(pos) => Ok((name.to_string(), pos)),
        Err(ProviderError::UnknownBody(_)) => {
            debug!("body {:?} unknown to provider, falling back to {:?}", name, fallback);
            let pos = provider.position(fallback)?;
            Ok((fallback.to_string(), pos))
        }
    }
}

/// Surface-observer site on Earth from the configured lat/lon/height.
///
/// The site ignores Earth's diurnal spin: the surface strategies model a
/// generic ground observer, not a specific longitude at a specific hour.
fn surface_site<P: StateProvider>(
    provider: &P,
    registry: &BodyRegistry,
    config: &EngineConfig,
) -> Result<Vector3<f64>, ProviderError> {
    let earth_pos = provider.position("Earth")?;
    let radius = registry
        .id_of("Earth")
        .map(|id| registry.record(id).diameter_m / 2.0)
        .unwrap_or(6.378e6);
    let lat = config.surface_lat_deg * DEG2RAD;
    let lon = config.surface_lon_deg * DEG2RAD;
    let up = Vector3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin());
    Ok(earth_pos + up * (radius + config.surface_height_m))
}

fn body_diameter(registry: &BodyRegistry, name: &str) -> f64 {
    registry
        .id_of(name)
        .map(|id| registry.record(id).diameter_m)
        .unwrap_or(0.0)
}

/// Compute the camera plan for the chosen strategy.
///
/// Unknown-body conditions inside a strategy follow the documented
/// fallbacks (Sun for solar-relative targets, Earth for vehicle targets);
/// only a failure of the fallback itself propagates.
pub fn compute_plan<P: StateProvider>(
    strategy: ViewStrategy,
    selection: &Selection,
    provider: &P,
    registry: &BodyRegistry,
    config: &EngineConfig,
) -> Result<CameraPlan, ProviderError> {
    match strategy {
        ViewStrategy::SunRelative => sun_relative_plan(provider, registry),
        ViewStrategy::SurfaceToSun => surface_to_sun_plan(provider, registry, config),
        ViewStrategy::SurfaceToBody => {
            surface_to_body_plan(&selection.selected, provider, registry, config)
        }
        ViewStrategy::OnboardVehicle => onboard_vehicle_plan(selection, provider, registry),
        ViewStrategy::StationOrbit => fixed_optics_plan(
            selection,
            provider,
            STATION_FOV_DEG,
            STATION_NEAR_M,
            STATION_FAR_M,
            0.0,
        ),
        ViewStrategy::CrewedCapsule => fixed_optics_plan(
            selection,
            provider,
            CAPSULE_FOV_DEG,
            CAPSULE_NEAR_M,
            CAPSULE_FAR_M,
            EARTHRISE_TILT_DEG,
        ),
    }
}

fn sun_relative_plan<P: StateProvider>(
    provider: &P,
    registry: &BodyRegistry,
) -> Result<CameraPlan, ProviderError> {
    let sun_pos = provider.position("Sun")?;
    let earth_pos = provider.position("Earth")?;
    let distance = (earth_pos - sun_pos).norm();
    let fov_base = (apparent_diameter_deg(body_diameter(registry, "Earth"), distance)
        * SUN_RELATIVE_FRAMING)
        .clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    Ok(CameraPlan {
        position: sun_pos,
        look_at: earth_pos,
        fov_base_deg: fov_base,
        near_m: (distance - SUN_RELATIVE_CLIP_MARGIN_M).max(1.0),
        far_m: distance + SUN_RELATIVE_CLIP_MARGIN_M,
        tilt_deg: 0.0,
        hide: Vec::new(),
    })
}

fn surface_to_sun_plan<P: StateProvider>(
    provider: &P,
    registry: &BodyRegistry,
    config: &EngineConfig,
) -> Result<CameraPlan, ProviderError> {
    let observer = surface_site(provider, registry, config)?;
    let sun_pos = provider.position("Sun")?;
    let to_sun = sun_pos - observer;
    let sun_distance = to_sun.norm();

    let mut radius_factor: f64 = 1.0;
    let mut near = (sun_distance * 0.5).max(1.0);

    // Transit/eclipse correction: an occulter within 1 degree of the Sun
    // inflates the rendered solar radius and pulls the near clip in to its
    // own distance.
    for (occulter, factor) in [
        ("Moon", MOON_TRANSIT_FACTOR),
        ("Mercury", MERCURY_TRANSIT_FACTOR),
        ("Venus", VENUS_TRANSIT_FACTOR),
    ] {
        let Ok(occ_pos) = provider.position(occulter) else {
            continue;
        };
        let to_occ = occ_pos - observer;
        if angle_between_deg(&to_sun, &to_occ) < TRANSIT_PROXIMITY_DEG {
            radius_factor = radius_factor.max(factor);
            near = near.min(to_occ.norm());
        }
    }

    let fov_base = (apparent_diameter_deg(body_diameter(registry, "Sun"), sun_distance)
        * radius_factor
        * SURFACE_FRAMING)
        .clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    Ok(CameraPlan {
        position: observer,
        look_at: sun_pos,
        fov_base_deg: fov_base,
        near_m: near,
        far_m: sun_distance + SUN_RELATIVE_CLIP_MARGIN_M,
        tilt_deg: 0.0,
        hide: Vec::new(),
    })
}

fn surface_to_body_plan<P: StateProvider>(
    target: &str,
    provider: &P,
    registry: &BodyRegistry,
    config: &EngineConfig,
) -> Result<CameraPlan, ProviderError> {
    let observer = surface_site(provider, registry, config)?;
    let (target_name, target_pos) = position_with_fallback(provider, target, "Sun")?;
    let to_target = target_pos - observer;
    let distance = to_target.norm();

    let fov_base = (apparent_diameter_deg(body_diameter(registry, &target_name), distance)
        * SURFACE_FRAMING)
        .clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    Ok(CameraPlan {
        position: observer,
        look_at: target_pos,
        fov_base_deg: fov_base,
        near_m: (distance * 0.5).max(1.0),
        far_m: distance + SUN_RELATIVE_CLIP_MARGIN_M,
        tilt_deg: 0.0,
        hide: Vec::new(),
    })
}

fn onboard_vehicle_plan<P: StateProvider>(
    selection: &Selection,
    provider: &P,
    registry: &BodyRegistry,
) -> Result<CameraPlan, ProviderError> {
    let vehicle_pos = provider.position(&selection.selected)?;
    let (target_name, target_pos) =
        position_with_fallback(provider, &selection.observed, "Earth")?;
    let to_target = target_pos - vehicle_pos;
    let distance = to_target.norm();
    let target_radius = body_diameter(registry, &target_name) / 2.0;
    let surface_distance = (distance - target_radius).max(0.0);

    let apparent = apparent_diameter_deg(target_radius * 2.0, distance);
    let mut position = vehicle_pos;
    let near;
    let fov_base;
    if surface_distance < CLOSE_APPROACH_M {
        // Close approach: pull the camera back along the approach line and
        // widen the fov so the target is not sub-pixel at encounter speed.
        if let Some(dir) = to_target.try_normalize(0.0) {
            position -= dir * (surface_distance * FLYBY_PULLBACK_FRACTION);
        }
        near = (surface_distance * CLOSE_NEAR_FRACTION).max(1.0);
        fov_base = (apparent * FLYBY_FOV_WIDENING).clamp(VEHICLE_MIN_FOV_DEG, MAX_FOV_DEG);
    } else {
        near = (surface_distance * FAR_NEAR_FRACTION).max(1.0);
        fov_base = (apparent * FLYBY_FOV_WIDENING).clamp(VEHICLE_MIN_FOV_DEG, MAX_FOV_DEG);
    }

    Ok(CameraPlan {
        position,
        look_at: target_pos,
        fov_base_deg: fov_base,
        near_m: near,
        far_m: distance + target_radius * 20.0,
        tilt_deg: 0.0,
        hide: vec![selection.selected.clone()],
    })
}

fn fixed_optics_plan<P: StateProvider>(
    selection: &Selection,
    provider: &P,
    fov_deg: f64,
    near_m: f64,
    far_m: f64,
    tilt_deg: f64,
) -> Result<CameraPlan, ProviderError> {
    let vehicle_pos = provider.position(&selection.selected)?;
    let (_, target_pos) = position_with_fallback(provider, &selection.observed, "Earth")?;
    Ok(CameraPlan {
        position: vehicle_pos,
        look_at: target_pos,
        fov_base_deg: fov_deg,
        near_m,
        far_m,
        tilt_deg,
        hide: vec![selection.selected.clone()],
    })
}
