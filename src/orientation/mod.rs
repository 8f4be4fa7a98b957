//! # Body Orientation Model
//!
//! Natural bodies compose three rotations each frame:
//!
//! 1. **Sidereal spin**: rotation phase from days-since-J2000 and the
//!    body's sidereal period, negated, plus the body's empirical
//!    prime-meridian offset.
//! 2. **Obliquity**: the equatorial rotation-pole direction converted to
//!    ecliptic longitude/latitude (lambda, beta); the tilt axis is
//!    `(cos lambda, 0, sin lambda)` and the tilt angle `90 deg - beta`.
//! 3. **Camera-facing correction**: rotations about the vertical and
//!    horizontal screen axes by the camera's own azimuth/elevation, keeping
//!    the body's apparent "up" consistent as the camera orbits.
//!
//! Vehicles are pointing-derived instead: the modeled antenna axis (+Z)
//! points toward Earth, except the crewed capsule which aligns with its own
//! velocity relative to Earth or the Moon, whichever sphere of influence it
//! is inside.

use crate::bodies::BodyRecord;
use crate::constants::{DAY_H, DAY_S, DEG2RAD, ECLIPTIC_OBLIQUITY_DEG};
use crate::provider::{ProviderError, StateProvider};
use chrono::{DateTime, TimeZone, Utc};
use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Vehicles closer to the Moon than this use the Moon as the velocity
/// reference; the bound approximates the lunar sphere of influence.
const MOON_REFERENCE_THRESHOLD_M: f64 = 6.6e7;

/// The vehicle that flies velocity-aligned instead of antenna-to-Earth
const VELOCITY_ALIGNED_VEHICLE: &str = "Apollo";

/// Days elapsed since the J2000 epoch (2000-01-01 12:00 UTC)
pub fn days_since_j2000(time: DateTime<Utc>) -> f64 {
    let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    (time - epoch).num_milliseconds() as f64 / (DAY_S * 1000.0)
}

/// Sidereal spin phase in degrees, normalized to [0, 360).
///
/// Negated so that increasing time turns the body the way an external
/// observer sees it; the offset pins the prime meridian to its calibrated
/// position at the epoch. A zero period (vehicles) returns the offset.
pub fn revolution_phase_deg(days_since_epoch: f64, period_h: f64, offset_deg: f64) -> f64 {
    if period_h == 0.0 {
        return offset_deg.rem_euclid(360.0);
    }
    let period_days = period_h / DAY_H;
    let turns = (days_since_epoch / period_days).rem_euclid(1.0);
    (-turns * 360.0 + offset_deg).rem_euclid(360.0)
}

/// Converts an equatorial pole direction to ecliptic (lambda, beta), degrees
pub fn pole_to_ecliptic(pole_ra_deg: f64, pole_dec_deg: f64) -> (f64, f64) {
    let ra = pole_ra_deg * DEG2RAD;
    let dec = pole_dec_deg * DEG2RAD;
    let eps = ECLIPTIC_OBLIQUITY_DEG * DEG2RAD;

    let sin_beta = dec.sin() * eps.cos() - dec.cos() * eps.sin() * ra.sin();
    let beta = sin_beta.clamp(-1.0, 1.0).asin();
    let y = dec.sin() * eps.sin() + dec.cos() * eps.cos() * ra.sin();
    let x = dec.cos() * ra.cos();
    let lambda = y.atan2(x).rem_euclid(std::f64::consts::TAU);

    (lambda.to_degrees(), beta.to_degrees())
}

/// Axial-tilt rotation from the body's equatorial pole direction
pub fn obliquity_rotation(pole_ra_deg: f64, pole_dec_deg: f64) -> UnitQuaternion<f64> {
    let (lambda_deg, beta_deg) = pole_to_ecliptic(pole_ra_deg, pole_dec_deg);
    let lambda = lambda_deg * DEG2RAD;
    let axis = Vector3::new(lambda.cos(), 0.0, lambda.sin());
    let angle = (90.0 - beta_deg) * DEG2RAD;
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle)
}

/// Spin about the body's local vertical axis
pub fn spin_rotation(phase_deg: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), phase_deg * DEG2RAD)
}

/// Camera-relative facing correction: rotations about the vertical and
/// horizontal screen axes by the camera's own orbit angles
pub fn camera_facing_rotation(azimuth_deg: f64, elevation_deg: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), azimuth_deg * DEG2RAD)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), elevation_deg * DEG2RAD)
}

/// Full orientation of a natural body for this frame
pub fn body_orientation(
    record: &BodyRecord,
    days_since_epoch: f64,
    camera_azimuth_deg: f64,
    camera_elevation_deg: f64,
) -> UnitQuaternion<f64> {
    let phase = revolution_phase_deg(
        days_since_epoch,
        record.sidereal_period_h,
        record.phase_offset_deg,
    );
    camera_facing_rotation(camera_azimuth_deg, camera_elevation_deg)
        * obliquity_rotation(record.pole_ra_deg, record.pole_dec_deg)
        * spin_rotation(phase)
}

/// Rotation pointing the +Z reference axis along `direction`
fn point_axis_along(direction: &Vector3<f64>) -> UnitQuaternion<f64> {
    let Some(d) = direction.try_normalize(0.0) else {
        return UnitQuaternion::identity();
    };
    let azimuth = d.x.atan2(d.z);
    let elevation = d.y.clamp(-1.0, 1.0).asin();
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), azimuth)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -elevation)
}

/// Vehicle orientation: antenna toward Earth, or velocity-aligned for the
/// crewed capsule (reference body chosen by the lunar-SOI threshold).
pub fn vehicle_orientation<P: StateProvider>(
    name: &str,
    provider: &P,
) -> Result<UnitQuaternion<f64>, ProviderError> {
    let vehicle_pos = provider.position(name)?;

    if name == VELOCITY_ALIGNED_VEHICLE {
        let moon_distance = provider
            .position("Moon")
            .map(|moon| (vehicle_pos - moon).norm());
        let reference = match moon_distance {
            Ok(d) if d < MOON_REFERENCE_THRESHOLD_M => "Moon",
            _ => "Earth",
        };
        let rel_velocity = provider.velocity(name)? - provider.velocity(reference)?;
        return Ok(point_axis_along(&rel_velocity));
    }

    let earth_pos = provider.position("Earth")?;
    Ok(point_axis_along(&(earth_pos - vehicle_pos)))
}

/// Orientation aligning a gas giant's shadow cylinder with the
/// instantaneous Sun-to-body direction
pub fn shadow_alignment(body_pos: &Vector3<f64>, sun_pos: &Vector3<f64>) -> UnitQuaternion<f64> {
    let anti_sunward = body_pos - sun_pos;
    UnitQuaternion::rotation_between(&Vector3::y(), &anti_sunward)
        .unwrap_or_else(UnitQuaternion::identity)
}
