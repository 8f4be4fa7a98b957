//! Physical state provider interface
//!
//! The engine never integrates orbits itself; it queries an external
//! provider for positions and velocities by body name, at the provider's
//! current simulated time. An unknown name is a recoverable condition:
//! callers substitute a documented default body and retry once.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use std::collections::HashMap;
use thiserror::Error;

/// Error type for state lookups
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown body: {0}")]
    UnknownBody(String),
}

/// Source of physical state for the engine, queried once per frame per body.
///
/// Positions are meters in the engine's ecliptic frame, velocities are
/// meters per second.
pub trait StateProvider {
    /// Position of the named body at the current simulated time
    fn position(&self, name: &str) -> Result<Vector3<f64>, ProviderError>;

    /// Velocity of the named body at the current simulated time
    fn velocity(&self, name: &str) -> Result<Vector3<f64>, ProviderError>;

    /// The simulated date/time the state refers to
    fn current_time(&self) -> DateTime<Utc>;
}

/// Map-backed provider for hosts that precompute state, and for tests.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    states: HashMap<String, (Vector3<f64>, Vector3<f64>)>,
    time: DateTime<Utc>,
}

impl StaticProvider {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            states: HashMap::new(),
            time,
        }
    }

    /// Set or replace a body's position and velocity
    pub fn set_state(&mut self, name: &str, position: Vector3<f64>, velocity: Vector3<f64>) {
        self.states
            .insert(name.to_string(), (position, velocity));
    }

    /// Convenience for bodies whose velocity is irrelevant to the scenario
    pub fn set_position(&mut self, name: &str, position: Vector3<f64>) {
        self.set_state(name, position, Vector3::zeros());
    }

    /// Advance the simulated clock
    pub fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = time;
    }
}

impl StateProvider for StaticProvider {
    fn position(&self, name: &str) -> Result<Vector3<f64>, ProviderError> {
        self.states
            .get(name)
            .map(|(p, _)| *p)
            .ok_or_else(|| ProviderError::UnknownBody(name.to_string()))
    }

    fn velocity(&self, name: &str) -> Result<Vector3<f64>, ProviderError> {
        self.states
            .get(name)
            .map(|(_, v)| *v)
            .ok_or_else(|| ProviderError::UnknownBody(name.to_string()))
    }

    fn current_time(&self) -> DateTime<Utc> {
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_static_provider_lookup() {
        let mut provider = StaticProvider::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        provider.set_state(
            "Earth",
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.1, 0.2, 0.3),
        );

        assert_eq!(provider.position("Earth").unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(provider.velocity("Earth").unwrap(), Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_unknown_body_is_error_not_panic() {
        let provider = StaticProvider::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let err = provider.position("Vulcan").unwrap_err();
        assert!(matches!(err, ProviderError::UnknownBody(ref name) if name == "Vulcan"));
    }
}
