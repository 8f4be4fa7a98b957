//! Body registry and built-in solar-system table
//!
//! Per-frame bookkeeping lives in an arena of `(BodyRecord, BodyState)`
//! pairs indexed by a stable [`BodyId`], with a name-to-id lookup on the
//! side. Static attributes (diameter, spin period, pole direction) are
//! separated from the per-frame mutable state (visibility, screen diameter,
//! latest position snapshot) so a frame diff only ever touches the latter.
//!
//! Rotation-phase offsets are empirical calibration constants tied to the
//! IAU prime-meridian definitions and historical spacecraft mapping; they
//! are policy, not derived values, and must not be "corrected".

use lazy_static::lazy_static;
use nalgebra::Vector3;
use std::collections::{HashMap, HashSet};

// Prime-meridian phase offsets, degrees at the J2000 epoch.
// Each value is anchored to a reference observation; see the comment on
// each entry.

/// Sun: W0 of the IAU solar prime meridian (Carrington rotation origin).
pub const SUN_PHASE_OFFSET_DEG: f64 = 84.176;
/// Mercury: W0 referenced to the crater Hun Kal, Mariner 10 mapping.
pub const MERCURY_PHASE_OFFSET_DEG: f64 = 329.548;
/// Venus: W0 referenced to the central peak of Ariadne, Magellan radar.
pub const VENUS_PHASE_OFFSET_DEG: f64 = 160.20;
/// Earth: rotation angle of the prime meridian at J2000 (IERS ERA).
pub const EARTH_PHASE_OFFSET_DEG: f64 = 280.46;
/// Moon: W0 of the mean-Earth/polar-axis frame, LRO ephemeris.
pub const MOON_PHASE_OFFSET_DEG: f64 = 38.321_3;
/// Mars: W0 placing the crater Airy-0 on the prime meridian, Mariner 9.
pub const MARS_PHASE_OFFSET_DEG: f64 = 176.630;
/// Jupiter: System III meridian from Voyager radio rotation data.
pub const JUPITER_PHASE_OFFSET_DEG: f64 = 284.95;
/// Saturn: System III meridian from Voyager SKR periodicity.
pub const SATURN_PHASE_OFFSET_DEG: f64 = 38.90;
/// Uranus: W0 from Voyager 2 magnetospheric rotation.
pub const URANUS_PHASE_OFFSET_DEG: f64 = 203.81;
/// Neptune: W0 from Voyager 2 radio rotation.
pub const NEPTUNE_PHASE_OFFSET_DEG: f64 = 249.978;
/// Io: W0 aligning the sub-Jupiter point, Galileo SSI control network.
pub const IO_PHASE_OFFSET_DEG: f64 = 200.39;
/// Europa: W0 from the Galileo control network.
pub const EUROPA_PHASE_OFFSET_DEG: f64 = 36.022;
/// Ganymede: W0 from the Galileo control network.
pub const GANYMEDE_PHASE_OFFSET_DEG: f64 = 44.064;
/// Callisto: W0 from the Galileo control network.
pub const CALLISTO_PHASE_OFFSET_DEG: f64 = 259.51;

lazy_static! {
    /// Bodies whose orientation is pointing-derived rather than
    /// spin/obliquity-derived, and which use an override diameter.
    pub static ref VEHICLE_NAMES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert("ISS");
        set.insert("Apollo");
        set.insert("Rosetta");
        set
    };

    /// Hand-tuned display diameters, meters. Real spacecraft are sub-pixel
    /// at the shared screen scale, so they render at exaggerated sizes.
    pub static ref DIAMETER_OVERRIDES: HashMap<&'static str, f64> = {
        let mut map = HashMap::new();
        map.insert("ISS", 1.0e8);
        map.insert("Apollo", 8.0e7);
        map.insert("Rosetta", 6.0e7);
        map
    };
}

/// Stable arena index for a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub(crate) usize);

/// Static attributes of a body, fixed at registration
#[derive(Debug, Clone)]
pub struct BodyRecord {
    /// Unique name, also the key into the physics provider
    pub name: String,
    /// Equatorial diameter in meters
    pub diameter_m: f64,
    /// Polar flattening (0 for a sphere)
    pub flattening: f64,
    /// Sidereal rotation period in hours; negative for retrograde spin
    pub sidereal_period_h: f64,
    /// Rotation-pole right ascension, degrees (equatorial frame)
    pub pole_ra_deg: f64,
    /// Rotation-pole declination, degrees (equatorial frame)
    pub pole_dec_deg: f64,
    /// Empirical prime-meridian phase offset, degrees
    pub phase_offset_deg: f64,
    /// Pointing-derived orientation and exaggerated display size
    pub is_vehicle: bool,
    /// Host body for moons; used for shadow casting
    pub parent: Option<String>,
}

impl BodyRecord {
    /// Minimal record for a spacecraft or station
    pub fn vehicle(name: &str) -> Self {
        Self {
            name: name.to_string(),
            diameter_m: DIAMETER_OVERRIDES.get(name).copied().unwrap_or(5.0e7),
            flattening: 0.0,
            sidereal_period_h: 0.0,
            pole_ra_deg: 0.0,
            pole_dec_deg: 90.0,
            phase_offset_deg: 0.0,
            is_vehicle: true,
            parent: None,
        }
    }
}

/// Per-frame mutable state, owned by the engine
#[derive(Debug, Clone)]
pub struct BodyState {
    /// Whether the renderer should draw the body this frame
    pub visible: bool,
    /// Computed on-screen diameter, pixels
    pub screen_diameter_px: f64,
    /// Latest position snapshot from the provider, meters
    pub position: Vector3<f64>,
    /// Latest velocity snapshot from the provider, m/s
    pub velocity: Vector3<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            visible: true,
            screen_diameter_px: 0.0,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }
}

/// Arena of bodies with a name lookup
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    records: Vec<BodyRecord>,
    states: Vec<BodyState>,
    by_name: HashMap<String, BodyId>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body, returning its stable id. Re-registering a name
    /// replaces the record and resets the state.
    pub fn register(&mut self, record: BodyRecord) -> BodyId {
        if let Some(&id) = self.by_name.get(&record.name) {
            self.records[id.0] = record;
            self.states[id.0] = BodyState::default();
            return id;
        }
        let id = BodyId(self.records.len());
        self.by_name.insert(record.name.clone(), id);
        self.records.push(record);
        self.states.push(BodyState::default());
        id
    }

    pub fn id_of(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(name).copied()
    }

    pub fn record(&self, id: BodyId) -> &BodyRecord {
        &self.records[id.0]
    }

    pub fn state(&self, id: BodyId) -> &BodyState {
        &self.states[id.0]
    }

    pub fn state_mut(&mut self, id: BodyId) -> &mut BodyState {
        &mut self.states[id.0]
    }

    pub fn set_visible(&mut self, id: BodyId, visible: bool) {
        self.states[id.0].visible = visible;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &BodyRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (BodyId(i), r))
    }

    /// Whether the named body is a vehicle. Unregistered names fall back to
    /// the static vehicle set so selection logic works before registration.
    pub fn is_vehicle(&self, name: &str) -> bool {
        match self.id_of(name) {
            Some(id) => self.record(id).is_vehicle,
            None => VEHICLE_NAMES.contains(name),
        }
    }

    /// Registry pre-populated with the classical bodies, the Galilean
    /// moons, a comet target, and the built-in vehicles. Hosts may register
    /// further bodies on top.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        let natural = |name: &str,
                       diameter_m: f64,
                       flattening: f64,
                       period_h: f64,
                       pole_ra: f64,
                       pole_dec: f64,
                       offset: f64,
                       parent: Option<&str>| BodyRecord {
            name: name.to_string(),
            diameter_m,
            flattening,
            sidereal_period_h: period_h,
            pole_ra_deg: pole_ra,
            pole_dec_deg: pole_dec,
            phase_offset_deg: offset,
            is_vehicle: false,
            parent: parent.map(str::to_string),
        };

        // Diameters, flattening, and pole directions per the IAU/IAG
        // cartographic reports; periods are sidereal.
        reg.register(natural("Sun", 1.392e9, 0.0, 609.12, 286.13, 63.87, SUN_PHASE_OFFSET_DEG, None));
        reg.register(natural("Mercury", 4.879e6, 0.0, 1407.6, 281.01, 61.41, MERCURY_PHASE_OFFSET_DEG, None));
        // Venus spins retrograde
        reg.register(natural("Venus", 1.2104e7, 0.0, -5832.5, 272.76, 67.16, VENUS_PHASE_OFFSET_DEG, None));
        reg.register(natural("Earth", 1.2756e7, 0.003_35, 23.934_5, 0.0, 90.0, EARTH_PHASE_OFFSET_DEG, None));
        reg.register(natural("Moon", 3.4748e6, 0.001_2, 655.728, 266.86, 66.54, MOON_PHASE_OFFSET_DEG, Some("Earth")));
        reg.register(natural("Mars", 6.7792e6, 0.005_89, 24.622_9, 317.68, 52.89, MARS_PHASE_OFFSET_DEG, None));
        reg.register(natural("Jupiter", 1.42984e8, 0.064_87, 9.925, 268.06, 64.50, JUPITER_PHASE_OFFSET_DEG, None));
        reg.register(natural("Saturn", 1.20536e8, 0.097_96, 10.656, 40.59, 83.54, SATURN_PHASE_OFFSET_DEG, None));
        reg.register(natural("Uranus", 5.1118e7, 0.022_9, -17.24, 257.31, -15.18, URANUS_PHASE_OFFSET_DEG, None));
        reg.register(natural("Neptune", 4.9528e7, 0.017_1, 16.11, 299.36, 43.46, NEPTUNE_PHASE_OFFSET_DEG, None));
        reg.register(natural("Io", 3.6432e6, 0.0, 42.459, 268.05, 64.50, IO_PHASE_OFFSET_DEG, Some("Jupiter")));
        reg.register(natural("Europa", 3.1216e6, 0.0, 85.228, 268.08, 64.51, EUROPA_PHASE_OFFSET_DEG, Some("Jupiter")));
        reg.register(natural("Ganymede", 5.2682e6, 0.0, 171.709, 268.20, 64.57, GANYMEDE_PHASE_OFFSET_DEG, Some("Jupiter")));
        reg.register(natural("Callisto", 4.8208e6, 0.0, 400.536, 268.72, 64.83, CALLISTO_PHASE_OFFSET_DEG, Some("Jupiter")));
        // Comet nucleus; diameter under the small-body threshold, so the
        // display exaggeration applies.
        reg.register(natural("67P", 4.0e3, 0.0, 12.404, 69.3, 64.1, 0.0, None));

        reg.register(BodyRecord::vehicle("ISS"));
        reg.register(BodyRecord::vehicle("Apollo"));
        reg.register(BodyRecord::vehicle("Rosetta"));
        reg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut reg = BodyRegistry::new();
        let id = reg.register(BodyRecord::vehicle("Probe-1"));
        assert_eq!(reg.id_of("Probe-1"), Some(id));
        assert!(reg.record(id).is_vehicle);
        assert!(reg.state(id).visible);
    }

    #[test]
    fn test_reregister_keeps_id() {
        let mut reg = BodyRegistry::new();
        let id1 = reg.register(BodyRecord::vehicle("Probe-1"));
        reg.state_mut(id1).visible = false;
        let id2 = reg.register(BodyRecord::vehicle("Probe-1"));
        assert_eq!(id1, id2);
        // State resets on re-registration
        assert!(reg.state(id2).visible);
    }

    #[test]
    fn test_builtin_table() {
        let reg = BodyRegistry::builtin();
        for name in ["Sun", "Earth", "Moon", "Jupiter", "Io", "67P", "ISS"] {
            assert!(reg.id_of(name).is_some(), "{} missing from builtin table", name);
        }
        let earth = reg.record(reg.id_of("Earth").unwrap());
        assert!(!earth.is_vehicle);
        assert!(earth.diameter_m > 1.2e7 && earth.diameter_m < 1.3e7);

        let moon = reg.record(reg.id_of("Moon").unwrap());
        assert_eq!(moon.parent.as_deref(), Some("Earth"));
    }

    #[test]
    fn test_vehicle_classification() {
        let reg = BodyRegistry::builtin();
        assert!(reg.is_vehicle("ISS"));
        assert!(reg.is_vehicle("Rosetta"));
        assert!(!reg.is_vehicle("Earth"));
        // Unregistered names consult the static set
        let empty = BodyRegistry::new();
        assert!(empty.is_vehicle("Apollo"));
        assert!(!empty.is_vehicle("Earth"));
    }

    #[test]
    fn test_venus_spins_retrograde() {
        let reg = BodyRegistry::builtin();
        let venus = reg.record(reg.id_of("Venus").unwrap());
        assert!(venus.sidereal_period_h < 0.0);
    }
}
