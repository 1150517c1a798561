/// Fixed scene lighting evaluated per face
use nalgebra::Vector3;
use std::f32::consts::FRAC_1_PI;

use crate::palette::Rgb;

/// A light infinitely far away, shining toward the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector from the lit surface toward the light
    pub direction: Vector3<f32>,
    pub color: Rgb,
    pub intensity: f32,
}

impl DirectionalLight {
    /// A light placed at `position` and aimed at the origin
    pub fn from_position(position: Vector3<f32>, color: Rgb, intensity: f32) -> Self {
        Self {
            direction: position.normalize(),
            color,
            intensity,
        }
    }
}

/// Ambient term plus directional lights, Lambert diffuse only
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: Rgb,
    pub ambient_intensity: f32,
    pub lights: Vec<DirectionalLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Rgb::new(0x40, 0x40, 0x40),
            ambient_intensity: 2.0,
            lights: vec![
                DirectionalLight::from_position(Vector3::new(1.0, 1.0, 1.0), Rgb::WHITE, 2.0),
                DirectionalLight::from_position(
                    Vector3::new(-1.0, -1.0, -1.0),
                    Rgb::new(0x4a, 0x90, 0xe2),
                    1.0,
                ),
            ],
        }
    }
}

impl Lighting {
    /// Lit color of a surface with world-space unit `normal`.
    ///
    /// Irradiance is scaled by the Lambert BRDF factor `1/π`, so a light of
    /// intensity π head-on reproduces the base color.
    pub fn shade(&self, base: Rgb, normal: &Vector3<f32>) -> Rgb {
        let mut irradiance = self.ambient.to_unit().map(|c| c * self.ambient_intensity);
        for light in &self.lights {
            let lambert = normal.dot(&light.direction).max(0.0) * light.intensity;
            for (total, channel) in irradiance.iter_mut().zip(light.color.to_unit()) {
                *total += channel * lambert;
            }
        }
        let base = base.to_unit();
        Rgb::from_unit([0, 1, 2].map(|i| base[i] * irradiance[i] * FRAC_1_PI))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlit() -> Lighting {
        Lighting {
            ambient: Rgb::new(0, 0, 0),
            ambient_intensity: 0.0,
            lights: vec![DirectionalLight::from_position(
                Vector3::z(),
                Rgb::WHITE,
                std::f32::consts::PI,
            )],
        }
    }

    #[test]
    fn test_head_on_light_reproduces_base() {
        let base = Rgb::new(200, 100, 50);
        assert_eq!(unlit().shade(base, &Vector3::z()), base);
    }

    #[test]
    fn test_back_facing_surface_gets_no_direct_light() {
        let shaded = unlit().shade(Rgb::WHITE, &-Vector3::z());
        assert_eq!(shaded, Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_key_light_brightens_facing_surfaces() {
        let lighting = Lighting::default();
        let toward_key = Vector3::new(1.0, 1.0, 1.0).normalize();
        let lit = lighting.shade(Rgb::WHITE, &toward_key);
        let dark = lighting.shade(Rgb::WHITE, &Vector3::new(1.0, -1.0, 0.0).normalize());
        assert!(lit.luminance() > dark.luminance());
    }

    #[test]
    fn test_back_light_tints_blue() {
        let lighting = Lighting::default();
        let away = Vector3::new(-1.0, -1.0, -1.0).normalize();
        let shaded = lighting.shade(Rgb::WHITE, &away);
        assert!(shaded.b > shaded.r);
    }
}
