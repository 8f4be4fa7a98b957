//! # Eclipse, Transit, and Shadow Detection
//!
//! Pure functions of the current physical state; identical input yields
//! identical output, with no hidden timing dependence. Misses -- the Moon's
//! shadow not falling on the planet, the Moon clearing the umbra -- are
//! expected outcomes, not errors, and are expressed as `None` / cleared
//! flags.
//!
//! Nothing here caches across frames: eclipse state and shadow geometry
//! are derived ephemeral values, recomputed every frame.

use crate::constants::{
    CORONA_RADIUS_FACTOR, ECLIPSE_ALIGNMENT_DEG, SHADOW_CYLINDER_LENGTH_RADII,
    SHADOW_CYLINDER_OFFSET_RADII, TOTALITY_RATIO,
};
use crate::geometry::{angle_between_deg, intersect_line_sphere};
use crate::orientation::shadow_alignment;
use nalgebra::{UnitQuaternion, Vector3};

/// Point-light color during a total lunar eclipse ("blood moon")
pub const BLOOD_MOON_LIGHT: (f64, f64, f64) = (0.65, 0.2, 0.1);
/// Point-light color outside totality
pub const NEUTRAL_LIGHT: (f64, f64, f64) = (1.0, 1.0, 1.0);
/// Opacity of the umbra disk when the Moon is partially shadowed
pub const PARTIAL_SHADOW_ALPHA: f64 = 0.7;

/// Ephemeral per-frame placement of a shadow caster
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowGeometry {
    /// Center of the shadow volume, meters
    pub position: Vector3<f64>,
    /// Shadow radius, meters
    pub radius_m: f64,
    /// Extent along the shadow axis, meters
    pub length_m: f64,
    /// Rotation taking the +Y cylinder axis onto the shadow axis
    pub orientation: UnitQuaternion<f64>,
}

/// Solar-eclipse classification for a surface observer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolarEclipse {
    /// Sun and Moon aligned within the eclipse threshold
    pub flagged: bool,
    /// Apparent-diameter ratio in [0.99, 1.0): a bright ring remains
    pub annular: bool,
    /// Ratio at or above 1.0: the disk is fully covered
    pub total: bool,
    /// Hide the solid Sun disk and render the corona instead
    pub hide_sun_disk: bool,
    /// Corona disk radius, meters (2x the Sun's radius when shown)
    pub corona_radius_m: f64,
}

/// Lunar-eclipse state for the Earth-Moon-Sun geometry
#[derive(Debug, Clone, PartialEq)]
pub struct LunarEclipse {
    /// Moon at least partially inside the umbra
    pub flagged: bool,
    /// Moon fully inside the umbra ("blood moon")
    pub total: bool,
    /// Umbra diameter at the Moon's distance, meters
    pub umbra_diameter_m: f64,
    /// Umbra disk placement along the Earth-Moon line
    pub shadow: ShadowGeometry,
    /// Umbra disk opacity: transparent during totality, dark otherwise
    pub shadow_alpha: f64,
    /// Point-light color: reddish during totality, neutral otherwise
    pub light_color: (f64, f64, f64),
}

/// Classify a solar eclipse/transit as seen from `observer`.
///
/// Candidate when the observer's directions to the Sun and Moon are
/// separated by less than 0.01 degrees; the annular/total split compares
/// the apparent-diameter ratio against the 0.99 display threshold.
pub fn solar_eclipse(
    observer: &Vector3<f64>,
    sun_pos: &Vector3<f64>,
    sun_diameter_m: f64,
    moon_pos: &Vector3<f64>,
    moon_diameter_m: f64,
) -> SolarEclipse {
    let to_sun = sun_pos - observer;
    let to_moon = moon_pos - observer;
    let sun_distance = to_sun.norm();
    let moon_distance = to_moon.norm();
    if sun_distance == 0.0 || moon_distance == 0.0 {
        return SolarEclipse::default();
    }
    if angle_between_deg(&to_sun, &to_moon) >= ECLIPSE_ALIGNMENT_DEG {
        return SolarEclipse::default();
    }
    // The Moon must be the nearer body for an eclipse at all
    if moon_distance >= sun_distance {
        return SolarEclipse::default();
    }

    let ratio = (moon_diameter_m / moon_distance) / (sun_diameter_m / sun_distance);
    let covered = ratio >= TOTALITY_RATIO;
    SolarEclipse {
        flagged: true,
        annular: covered && ratio < 1.0,
        total: ratio >= 1.0,
        hide_sun_disk: covered,
        corona_radius_m: if covered {
            sun_diameter_m / 2.0 * CORONA_RADIUS_FACTOR
        } else {
            0.0
        },
    }
}

/// Evaluate the Earth's umbra at the Moon.
///
/// The umbra diameter comes from similar triangles on the Sun/Earth disks;
/// the umbra disk sits on the anti-sunward axis at the Moon's projected
/// distance. Totality requires the Moon's offset from the axis to be less
/// than half the umbra-minus-Moon diameter.
pub fn lunar_eclipse(
    sun_pos: &Vector3<f64>,
    sun_diameter_m: f64,
    earth_pos: &Vector3<f64>,
    earth_diameter_m: f64,
    moon_pos: &Vector3<f64>,
    moon_diameter_m: f64,
) -> LunarEclipse {
    let sun_earth = earth_pos - sun_pos;
    let sun_earth_distance = sun_earth.norm();
    let axis = sun_earth / sun_earth_distance;

    let earth_moon = moon_pos - earth_pos;
    let along_axis = earth_moon.dot(&axis);
    let axis_offset = (earth_moon - axis * along_axis).norm();

    // Shadow cone narrows with distance; negative means the cone has
    // closed before reaching the Moon
    let umbra_diameter = earth_diameter_m
        - along_axis.max(0.0) * (sun_diameter_m - earth_diameter_m) / sun_earth_distance;

    let night_side = along_axis > 0.0;
    let flagged = night_side
        && umbra_diameter > 0.0
        && axis_offset < (umbra_diameter + moon_diameter_m) / 2.0;
    let total = flagged && axis_offset < (umbra_diameter - moon_diameter_m) / 2.0;

    let shadow = ShadowGeometry {
        position: earth_pos + axis * along_axis.max(0.0),
        radius_m: umbra_diameter.max(0.0) / 2.0,
        length_m: moon_diameter_m * 4.0,
        orientation: shadow_alignment(earth_pos, sun_pos),
    };

    LunarEclipse {
        flagged,
        total,
        umbra_diameter_m: umbra_diameter.max(0.0),
        shadow,
        shadow_alpha: if total { 0.0 } else { PARTIAL_SHADOW_ALPHA },
        light_color: if total { BLOOD_MOON_LIGHT } else { NEUTRAL_LIGHT },
    }
}

/// Where a moon's shadow lands on its host planet, if anywhere.
///
/// `None` when the Sun-through-moon ray misses the planet's sphere or the
/// moon is farther from the Sun than the planet (shadow points away).
pub fn moon_shadow_on_planet(
    sun_pos: &Vector3<f64>,
    moon_pos: &Vector3<f64>,
    planet_pos: &Vector3<f64>,
    planet_diameter_m: f64,
) -> Option<Vector3<f64>> {
    if (moon_pos - sun_pos).norm() >= (planet_pos - sun_pos).norm() {
        return None;
    }
    let direction = moon_pos - sun_pos;
    intersect_line_sphere(&direction, moon_pos, planet_pos, planet_diameter_m)
}

/// Anti-sunward shadow cylinder darkening rings and inner moons behind a
/// gas giant
pub fn planet_shadow_cylinder(
    sun_pos: &Vector3<f64>,
    planet_pos: &Vector3<f64>,
    planet_diameter_m: f64,
) -> ShadowGeometry {
    let radius = planet_diameter_m / 2.0;
    let axis = (planet_pos - sun_pos)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::y);
    ShadowGeometry {
        position: planet_pos + axis * (radius * SHADOW_CYLINDER_OFFSET_RADII),
        radius_m: radius,
        length_m: radius * SHADOW_CYLINDER_LENGTH_RADII,
        orientation: shadow_alignment(planet_pos, sun_pos),
    }
}
