//! Physical-to-screen size model
//!
//! One linear scale maps metric space to screen pixels for positions and
//! diameters alike, so a body's disk and its travel across the screen stay
//! consistent. Two display corrections sit on top: vehicles use hand-tuned
//! override diameters (real spacecraft are sub-pixel at this scale), and
//! natural bodies at or below the small-body threshold are multiplied by a
//! fixed exaggeration factor so asteroids and comet nuclei stay visible.

use crate::bodies::{BodyRecord, DIAMETER_OVERRIDES};
use crate::config::EngineConfig;

/// Display diameter in meters, after vehicle overrides and small-body
/// exaggeration. Pure and deterministic for identical input.
pub fn physical_diameter(record: &BodyRecord, config: &EngineConfig) -> f64 {
    if record.is_vehicle {
        // Table miss falls back to the record's own diameter rather than
        // failing; registration already seeded a sensible value.
        return DIAMETER_OVERRIDES
            .get(record.name.as_str())
            .copied()
            .unwrap_or(record.diameter_m);
    }
    if record.diameter_m <= config.small_body_threshold_m {
        record.diameter_m * config.small_body_exaggeration
    } else {
        record.diameter_m
    }
}

/// On-screen diameter in pixels at the shared screen scale
pub fn screen_diameter(record: &BodyRecord, config: &EngineConfig) -> f64 {
    config.screen_width_px * physical_diameter(record, config) / config.screen_scale_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyRegistry;
    use rstest::rstest;

    fn test_record(name: &str, diameter_m: f64) -> BodyRecord {
        BodyRecord {
            name: name.to_string(),
            diameter_m,
            flattening: 0.0,
            sidereal_period_h: 24.0,
            pole_ra_deg: 0.0,
            pole_dec_deg: 90.0,
            phase_offset_deg: 0.0,
            is_vehicle: false,
            parent: None,
        }
    }

    #[rstest]
    // At the threshold: exaggeration applies
    #[case(1.0e5, 1.0e5 * 50.0)]
    // Just above: true diameter
    #[case(1.0e5 + 1.0, 1.0e5 + 1.0)]
    // Well below: exaggerated
    #[case(4.0e3, 4.0e3 * 50.0)]
    // Planet-sized: untouched
    #[case(1.2756e7, 1.2756e7)]
    fn test_small_body_threshold(#[case] diameter: f64, #[case] expected: f64) {
        let config = EngineConfig::default();
        let record = test_record("X", diameter);
        assert_eq!(physical_diameter(&record, &config), expected);
    }

    #[test]
    fn test_vehicle_override() {
        let config = EngineConfig::default();
        let reg = BodyRegistry::builtin();
        let iss = reg.record(reg.id_of("ISS").unwrap());
        assert_eq!(physical_diameter(iss, &config), DIAMETER_OVERRIDES["ISS"]);
    }

    #[test]
    fn test_unknown_vehicle_falls_back_to_record_diameter() {
        let config = EngineConfig::default();
        let mut record = test_record("Probe-X", 3.3e7);
        record.is_vehicle = true;
        assert_eq!(physical_diameter(&record, &config), 3.3e7);
    }

    #[test]
    fn test_screen_diameter_monotonic_in_physical_diameter() {
        let config = EngineConfig::default();
        let mut last = 0.0;
        // Spans the exaggeration boundary; monotonic because the factor
        // only ever inflates the smaller diameters
        for d in [1.0e3, 1.0e4, 1.0e5, 6.0e6, 1.4e8, 1.4e9] {
            let px = screen_diameter(&test_record("X", d), &config);
            assert!(px > last, "screen diameter not monotonic at {}", d);
            last = px;
        }
    }

    #[test]
    fn test_screen_diameter_formula() {
        let config = EngineConfig {
            screen_width_px: 1000.0,
            ..Default::default()
        };
        let record = test_record("Earth", 1.2756e7);
        let expected = 1000.0 * 1.2756e7 / config.screen_scale_m;
        assert_eq!(screen_diameter(&record, &config), expected);
    }

    #[test]
    fn test_call_order_invariance() {
        let config = EngineConfig::default();
        let record = test_record("X", 5.0e4);
        let first = screen_diameter(&record, &config);
        let _other = screen_diameter(&test_record("Y", 9.9e9), &config);
        assert_eq!(screen_diameter(&record, &config), first);
    }
}
