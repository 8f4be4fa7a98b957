//! Constants shared across the view-geometry engine

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in meters (per IAU 2012 Resolution B2)
pub const AU_M: f64 = 149_597_870_700.0;

// Screen mapping
/// Single linear scale mapping physical space into the cubic screen volume.
/// All spatial-to-screen conversions (x, y, z, and diameter) divide by this.
pub const SCREEN_SCALE_M: f64 = 3.0 * AU_M;
/// Fixed standoff distance for observer-mode cameras. Re-projecting the
/// camera to this distance keeps very near and very far look-at targets at
/// a numerically stable rendering distance.
pub const OBSERVER_STANDOFF_M: f64 = SCREEN_SCALE_M / 2.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Mean obliquity of the ecliptic at J2000, degrees (IAU 2006)
pub const ECLIPTIC_OBLIQUITY_DEG: f64 = 23.439_291_1;

// Time
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Hours in a day
pub const DAY_H: f64 = 24.0;

// Camera and zoom policy
/// Lower zoom bound (maximum magnification)
pub const MIN_ZOOM: f64 = 0.0;
/// Upper zoom bound (field of view approaches zero)
pub const MAX_ZOOM: f64 = 99.9;
/// Initial zoom; yields exactly the strategy's base field of view
pub const DEFAULT_ZOOM: f64 = 90.0;
/// Degrees of orbit per pixel of pointer drag
pub const DRAG_SENSITIVITY_DEG_PER_PX: f64 = 0.25;
/// Zoom units per scroll-wheel delta unit
pub const SCROLL_SENSITIVITY: f64 = 0.05;
/// Upper field-of-view bound, degrees
pub const MAX_FOV_DEG: f64 = 90.0;
/// Smallest representable field of view; keeps fov within (0, 90]
pub const MIN_FOV_DEG: f64 = 1.0e-3;

// Size exaggeration policy
/// Bodies at or below this diameter get the small-body exaggeration
pub const SMALL_BODY_THRESHOLD_M: f64 = 1.0e5;
/// Multiplier keeping asteroids and comet nuclei visible on screen
pub const SMALL_BODY_EXAGGERATION: f64 = 50.0;

// Eclipse and transit policy
/// Angular separation below which the Sun and an occulter count as aligned
pub const ECLIPSE_ALIGNMENT_DEG: f64 = 0.01;
/// Occulters within this separation of the Sun trigger the transit
/// apparent-radius correction
pub const TRANSIT_PROXIMITY_DEG: f64 = 1.0;
/// Moon/Sun apparent-diameter ratio at or above which the solid Sun disk is
/// hidden and the corona disk shown instead
pub const TOTALITY_RATIO: f64 = 0.99;
/// Corona disk radius as a multiple of the Sun's apparent radius
pub const CORONA_RADIUS_FACTOR: f64 = 2.0;

// Shadow cylinder policy (gas giants)
/// Cylinder center offset along the anti-sunward direction, in planet radii
pub const SHADOW_CYLINDER_OFFSET_RADII: f64 = 10.0;
/// Cylinder length, in planet radii
pub const SHADOW_CYLINDER_LENGTH_RADII: f64 = 20.0;
