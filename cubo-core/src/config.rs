/// Scene configuration.
///
/// Every field has a default, so an empty JSON object (or no configuration at
/// all) yields the stock viewer. Shells load it once at startup.
use serde::Deserialize;

use crate::error::ConfigError;
use crate::palette::{Palette, Rgb, DEFAULT_FACE_COLORS};
use crate::polyhedron::{ShadingPolicy, FACE_COUNT};

/// Drag, zoom and idle-spin tuning for a [`crate::ViewRig`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Radians of rotation per pixel of pointer travel
    pub drag_sensitivity: f32,
    /// Camera distance change per unit of wheel delta
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub initial_distance: f32,
    /// Radians added to the X rotation per idle step
    pub idle_spin_x: f32,
    /// Radians added to the Y rotation per idle step
    pub idle_spin_y: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            zoom_speed: 0.01,
            min_distance: 2.0,
            max_distance: 10.0,
            initial_distance: 5.0,
            idle_spin_x: 0.001,
            idle_spin_y: 0.002,
        }
    }
}

impl RigConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_distance < self.max_distance) {
            return Err(ConfigError::InvertedBounds {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if !(self.min_distance..=self.max_distance).contains(&self.initial_distance) {
            return Err(ConfigError::InitialOutOfBounds {
                initial: self.initial_distance,
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub rig: RigConfig,
    pub shading: ShadingPolicy,
    pub fov_degrees: f32,
    pub background: String,
    /// One color per triangle, in face-emission order
    pub face_colors: Vec<String>,
    pub show_labels: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rig: RigConfig::default(),
            shading: ShadingPolicy::Flat,
            fov_degrees: 75.0,
            background: "#1a1a1a".to_string(),
            face_colors: DEFAULT_FACE_COLORS.iter().map(|c| c.to_string()).collect(),
            show_labels: true,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rig.validate()?;
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        self.background_color()?;
        self.palette()?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Rgb, ConfigError> {
        Ok(Rgb::parse_hex(&self.background)?)
    }

    /// The face palette, checked to cover every triangle
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let palette = Palette::from_hex(&self.face_colors)?;
        Ok(palette.for_faces(FACE_COUNT)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ColorError, MeshError};

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.rig.drag_sensitivity, 0.01);
        assert_eq!(config.rig.initial_distance, 5.0);
    }

    #[test]
    fn test_partial_override() {
        let config =
            SceneConfig::from_json(r#"{"shading": "smooth", "rig": {"max_distance": 20.0}}"#)
                .unwrap();
        assert_eq!(config.shading, ShadingPolicy::Smooth);
        assert_eq!(config.rig.max_distance, 20.0);
        assert_eq!(config.rig.min_distance, 2.0);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = SceneConfig::from_json(r#"{"rig": {"min_distance": 12.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    }

    #[test]
    fn test_initial_distance_outside_bounds_rejected() {
        let err = SceneConfig::from_json(r#"{"rig": {"initial_distance": 1.0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InitialOutOfBounds { .. }));
    }

    #[test]
    fn test_degenerate_fov_rejected() {
        for fov in ["0.0", "180.0", "-30.0"] {
            let err = SceneConfig::from_json(&format!(r#"{{"fov_degrees": {}}}"#, fov)).unwrap_err();
            assert!(matches!(err, ConfigError::FieldOfView(_)), "fov {}", fov);
        }
        assert!(SceneConfig::from_json(r#"{"fov_degrees": 90.0}"#).is_ok());
    }

    #[test]
    fn test_short_palette_rejected() {
        let err = SceneConfig::from_json(r##"{"face_colors": ["#ffffff"]}"##).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Mesh(MeshError::PaletteTooShort { colors: 1, faces: 20 })
        ));
    }

    #[test]
    fn test_bad_background_rejected() {
        let err = SceneConfig::from_json(r#"{"background": "black"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Color(ColorError::InvalidHex(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            SceneConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
