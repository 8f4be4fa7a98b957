//! Engine configuration, read at setup and constant thereafter

use crate::constants::{
    DEFAULT_ZOOM, DRAG_SENSITIVITY_DEG_PER_PX, MAX_ZOOM, MIN_ZOOM, SCREEN_SCALE_M,
    SCROLL_SENSITIVITY, SMALL_BODY_EXAGGERATION, SMALL_BODY_THRESHOLD_M,
};
use serde::{Deserialize, Serialize};

/// Setup-time constants for the view engine.
///
/// `Default` yields the documented values; hosts may load a variant from
/// JSON instead. None of these change after engine construction -- display
/// resizes only move text overlays, not the geometry, so `on_resize` does
/// not touch this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Screen width in pixels
    pub screen_width_px: f64,
    /// Screen height in pixels
    pub screen_height_px: f64,
    /// Meters spanned by one screen width
    pub screen_scale_m: f64,
    /// Zoom bounds and starting value
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_zoom: f64,
    /// Degrees of camera orbit per pixel of drag
    pub drag_sensitivity_deg_per_px: f64,
    /// Zoom units per scroll delta unit
    pub scroll_sensitivity: f64,
    /// Small-body display exaggeration
    pub small_body_threshold_m: f64,
    pub small_body_exaggeration: f64,
    /// Surface-observer site on Earth
    pub surface_lat_deg: f64,
    pub surface_lon_deg: f64,
    pub surface_height_m: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width_px: 1920.0,
            screen_height_px: 1080.0,
            screen_scale_m: SCREEN_SCALE_M,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            default_zoom: DEFAULT_ZOOM,
            drag_sensitivity_deg_per_px: DRAG_SENSITIVITY_DEG_PER_PX,
            scroll_sensitivity: SCROLL_SENSITIVITY,
            small_body_threshold_m: SMALL_BODY_THRESHOLD_M,
            small_body_exaggeration: SMALL_BODY_EXAGGERATION,
            // Temperate northern site; hosts override for local horizons
            surface_lat_deg: 45.0,
            surface_lon_deg: 0.0,
            surface_height_m: 0.0,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON document. Missing fields take the
    /// default values.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pixels per meter at the shared screen scale
    pub fn px_per_m(&self) -> f64 {
        self.screen_width_px / self.screen_scale_m
    }
}
