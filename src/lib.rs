//! # helioview
//!
//! View and shadow geometry for an interactive solar-system display.
//!
//! The crate sits between a physics source and a renderer. The caller
//! supplies body positions through the [`StateProvider`] trait and a
//! selection describing what the user wants to look at; once per frame,
//! [`FrameEngine::update`] turns that into camera placement, per-body
//! screen transforms and orientations, and eclipse/shadow geometry. It
//! performs no rendering and no orbit propagation of its own.
//!
//! ## Conventions
//!
//! All physical positions are meters in a right-handed heliocentric
//! ecliptic frame with +Y toward the north ecliptic pole. Angles cross
//! the public API in degrees and are converted to radians internally.
//!
//! ## Example
//!
//! ```
//! use helioview::{FrameEngine, Selection, StaticProvider};
//! use chrono::{TimeZone, Utc};
//! use nalgebra::Vector3;
//!
//! let mut provider = StaticProvider::new(Utc.with_ymd_and_hms(2024, 4, 8, 18, 0, 0).unwrap());
//! provider.set_position("Sun", Vector3::zeros());
//! provider.set_position("Earth", Vector3::new(helioview::constants::AU_M, 0.0, 0.0));
//!
//! let mut engine = FrameEngine::with_builtin_bodies();
//! let frame = engine.update(&provider, &Selection::observer("Earth")).unwrap();
//! assert!(frame.camera.fov_deg > 0.0);
//! ```

pub mod bodies;
pub mod camera;
pub mod config;
pub mod constants;
pub mod frame;
pub mod geometry;
pub mod orientation;
pub mod provider;
pub mod scale;
pub mod shadows;
pub mod view;

use thiserror::Error;

pub use bodies::{BodyId, BodyRecord, BodyRegistry, BodyState};
pub use camera::OrbitCamera;
pub use config::EngineConfig;
pub use frame::{CameraOutput, FrameEngine, FrameOutput, RenderTransform};
pub use provider::{ProviderError, StateProvider, StaticProvider};
pub use shadows::{LunarEclipse, ShadowGeometry, SolarEclipse};
pub use view::{CameraPlan, Selection, ViewMode, ViewStrategy};

/// Errors surfaced by the engine
#[derive(Error, Debug)]
pub enum HelioviewError {
    /// The physics provider had no state for a required body
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Malformed configuration document
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HelioviewError>;
