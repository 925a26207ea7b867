//! Injected camera defaults and scene unit-conversion context.
//!
//! The editor keeps one [`CameraDefaults`] per project (persisted as TOML)
//! and passes it to camera construction, zoom, and viewpoint placement.
//! [`SceneContext`] carries the per-scene values needed to convert between
//! document distance units and internal camera units; spherical placement
//! ([`crate::camera::Camera::set_angles`]) goes through its two conversion
//! functions. Nothing in this crate reads global state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::VantageError;

/// Reference distance used to normalize document units,
/// `10 / tan(0.005 degrees)`.
const REFERENCE_DISTANCE: f32 = 114_591.56;

/// Resolution (DPI) at which one model unit maps to [`UNIT_PIXELS`] pixels.
const REFERENCE_RESOLUTION: f32 = 150.0;

/// Pixels covered by one model unit at the reference resolution.
const UNIT_PIXELS: f32 = 20.0;

// ---------------------------------------------------------------------------
// Camera defaults
// ---------------------------------------------------------------------------

/// Default lens and placement scalars for new cameras. All fields use
/// `#[serde(default)]` so partial TOML files work correctly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraDefaults {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clipping plane distance.
    pub z_near: f32,
    /// Far clipping plane distance.
    pub z_far: f32,
    /// Default camera position scalar (distance of preset viewpoints from
    /// the origin, in internal units).
    pub default_position: f32,
    /// Default distance factor dividing `default_position` into the eye
    /// offset of a freshly constructed camera; also scales interactive zoom.
    pub distance_factor: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            fov: 30.0,
            z_near: 25.0,
            z_far: 50_000.0,
            default_position: 1250.0,
            distance_factor: 8.0,
        }
    }
}

impl CameraDefaults {
    /// Load defaults from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VantageError> {
        let content = std::fs::read_to_string(path).map_err(VantageError::Io)?;
        toml::from_str(&content)
            .map_err(|e| VantageError::DefaultsParse(e.to_string()))
    }

    /// Load defaults from a TOML file, falling back to built-in values when
    /// the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(defaults) => defaults,
            Err(e) => {
                log::warn!("Using built-in camera defaults: {e}");
                Self::default()
            }
        }
    }

    /// Save defaults to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VantageError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VantageError::DefaultsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VantageError::Io)?;
        }
        std::fs::write(path, content).map_err(VantageError::Io)
    }

    /// Serialize to a compact JSON string (project preset payloads).
    pub fn to_json(&self) -> Result<String, VantageError> {
        serde_json::to_string(self)
            .map_err(|e| VantageError::DefaultsParse(e.to_string()))
    }

    /// Parse from a JSON string produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, VantageError> {
        serde_json::from_str(json)
            .map_err(|e| VantageError::DefaultsParse(e.to_string()))
    }

    /// Horizontal eye offset of a freshly constructed camera,
    /// `default_position / distance_factor`.
    pub fn eye_offset(&self) -> f32 {
        self.default_position / self.distance_factor
    }

    /// Scale applied to interactive zoom deltas. Negative: a positive zoom
    /// amount moves the eye toward the target.
    pub fn distance_scale(&self) -> f32 {
        -self.distance_factor
    }

    /// Camera distance factor relating internal camera units to document
    /// distance units, `default_position * 5 / distance_factor`.
    pub fn camera_distance_factor(&self) -> f32 {
        self.default_position * 5.0 / self.distance_factor
    }
}

// ---------------------------------------------------------------------------
// Scene context
// ---------------------------------------------------------------------------

/// Rendering backend a document camera distance is calibrated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    /// The editor's own interactive renderer.
    #[default]
    Native,
    /// External ray-tracing export backend.
    Raytraced,
    /// External offscreen renderer used for high-quality snapshots.
    Offscreen,
}

impl Renderer {
    /// Calibration factor folded into the unit conversion for this backend.
    pub fn calibration(self) -> f32 {
        match self {
            Self::Native => 1.0,
            Self::Raytraced => 0.455,
            Self::Offscreen => 0.775,
        }
    }
}

/// Per-scene parameters of the document-unit/internal-unit distance
/// conversion used by spherical camera placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneContext {
    /// Width in pixels of the rendered model image.
    pub model_width: f32,
    /// Render resolution in DPI.
    pub resolution: f32,
    /// Backend the document distances are calibrated for.
    pub renderer: Renderer,
    /// Camera distance factor, normally
    /// [`CameraDefaults::camera_distance_factor`].
    pub camera_distance_factor: f32,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self {
            model_width: 800.0,
            resolution: REFERENCE_RESOLUTION,
            renderer: Renderer::default(),
            camera_distance_factor: CameraDefaults::default().camera_distance_factor(),
        }
    }
}

impl SceneContext {
    /// Build a context from scene parameters and the project defaults.
    pub fn new(model_width: f32, resolution: f32, renderer: Renderer, defaults: &CameraDefaults) -> Self {
        Self {
            model_width,
            resolution,
            renderer,
            camera_distance_factor: defaults.camera_distance_factor(),
        }
    }

    /// Internal units per document distance unit.
    fn unit_ratio(&self) -> f32 {
        let pixels_per_unit = UNIT_PIXELS * self.resolution / REFERENCE_RESOLUTION;
        (self.model_width / pixels_per_unit) * self.renderer.calibration() * self.camera_distance_factor
            / REFERENCE_DISTANCE
    }

    /// Convert a document distance to internal camera units.
    pub fn internal_distance(&self, external: f32) -> f32 {
        external * self.unit_ratio()
    }

    /// Convert an internal camera distance back to document units. Exact
    /// inverse of [`Self::internal_distance`].
    pub fn external_distance(&self, internal: f32) -> f32 {
        internal / self.unit_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let defaults = CameraDefaults::default();
        let toml_str = toml::to_string_pretty(&defaults).unwrap();
        let parsed: CameraDefaults = toml::from_str(&toml_str).unwrap();
        assert_eq!(defaults, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = "fov = 45.0\n";
        let defaults: CameraDefaults = toml::from_str(toml_str).unwrap();
        assert_eq!(defaults.fov, 45.0);
        // Everything else should be default
        assert_eq!(defaults.z_near, 25.0);
        assert_eq!(defaults.default_position, 1250.0);
    }

    #[test]
    fn json_round_trip() {
        let defaults = CameraDefaults::default();
        let json = defaults.to_json().unwrap();
        let parsed = CameraDefaults::from_json(&json).unwrap();
        assert_eq!(defaults, parsed);
    }

    #[test]
    fn derived_factors() {
        let defaults = CameraDefaults::default();
        assert_eq!(defaults.eye_offset(), 156.25);
        assert_eq!(defaults.distance_scale(), -8.0);
        assert_eq!(defaults.camera_distance_factor(), 781.25);
    }

    #[test]
    fn renderer_calibration() {
        assert_eq!(Renderer::Native.calibration(), 1.0);
        assert_eq!(Renderer::Raytraced.calibration(), 0.455);
        assert_eq!(Renderer::Offscreen.calibration(), 0.775);
    }

    #[test]
    fn distance_conversion_round_trips() {
        let scene = SceneContext::default();
        let external = 1250.0;
        let internal = scene.internal_distance(external);
        assert!(internal > 0.0);
        assert!((scene.external_distance(internal) - external).abs() < 1e-3);
    }

    #[test]
    fn renderer_changes_conversion() {
        let defaults = CameraDefaults::default();
        let native = SceneContext::new(800.0, 150.0, Renderer::Native, &defaults);
        let raytraced = SceneContext::new(800.0, 150.0, Renderer::Raytraced, &defaults);
        let d_native = native.internal_distance(100.0);
        let d_raytraced = raytraced.internal_distance(100.0);
        assert!((d_raytraced / d_native - 0.455).abs() < 1e-5);
    }
}
