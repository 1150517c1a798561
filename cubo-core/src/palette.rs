/// Face colors and hex color parsing
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    combinator::{all_consuming, map, map_res},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::{ColorError, MeshError};

/// Default face colors, one per triangle in face-emission order
pub const DEFAULT_FACE_COLORS: [&str; 20] = [
    "#9b87f5", "#7E69AB", "#6E59A5", "#F2FCE2", "#FEF7CD", "#FEC6A1", "#E5DEFF", "#FFDEE2",
    "#FDE1D3", "#D3E4FD", "#F1F0FB", "#8B5CF6", "#D946EF", "#F97316", "#0EA5E9", "#1EAEDB",
    "#33C3F0", "#0FA0CE", "#888888", "#F1F1F1",
];

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (case-insensitive)
    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        all_consuming(hex_color)(input.trim())
            .map(|(_, color)| color)
            .map_err(|_| ColorError::InvalidHex(input.to_string()))
    }

    /// Channels scaled to `[0, 1]`
    pub fn to_unit(self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| f32::from(c) / 255.0)
    }

    /// Build from `[0, 1]` channels, clamping out-of-range values
    pub fn from_unit(channels: [f32; 3]) -> Self {
        let [r, g, b] = channels.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self { r, g, b }
    }

    /// Relative luminance in `[0, 1]` (Rec. 709 weights)
    pub fn luminance(self) -> f32 {
        let [r, g, b] = self.to_unit();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

fn is_hex(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn channel_pair(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, is_hex), |s| u8::from_str_radix(s, 16))(input)
}

fn channel_single(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, is_hex), |s| {
        u8::from_str_radix(s, 16).map(|v| v * 17)
    })(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    preceded(
        tag("#"),
        alt((
            map(tuple((channel_pair, channel_pair, channel_pair)), |(r, g, b)| {
                Rgb::new(r, g, b)
            }),
            map(tuple((channel_single, channel_single, channel_single)), |(r, g, b)| {
                Rgb::new(r, g, b)
            }),
        )),
    )(input)
}

/// Ordered face colors; entry `i` paints triangle `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, ColorError> {
        let colors = colors
            .iter()
            .map(|c| Rgb::parse_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(colors))
    }

    /// Accept the palette only if it can color `faces` triangles
    pub fn for_faces(self, faces: usize) -> Result<Self, MeshError> {
        if self.colors.len() < faces {
            return Err(MeshError::PaletteTooShort {
                colors: self.colors.len(),
                faces,
            });
        }
        Ok(self)
    }

    /// Color of triangle `face`.
    ///
    /// # Panics
    /// If the palette was not checked with [`Palette::for_faces`] and is too short.
    pub fn color_for(&self, face: usize) -> Rgb {
        self.colors[face]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_FACE_COLORS
                .iter()
                .filter_map(|c| Rgb::parse_hex(c).ok())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedron::FACE_COUNT;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(Rgb::parse_hex("#9b87f5").unwrap(), Rgb::new(0x9b, 0x87, 0xf5));
        assert_eq!(Rgb::parse_hex("#4A90E2").unwrap(), Rgb::new(0x4a, 0x90, 0xe2));
        assert_eq!(Rgb::parse_hex("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::parse_hex(" #1a1a1a ").unwrap(), Rgb::new(0x1a, 0x1a, 0x1a));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "9b87f5", "#9b87f", "#9b87f5a", "#ggg", "#abcd", "red"] {
            assert_eq!(
                Rgb::parse_hex(bad),
                Err(ColorError::InvalidHex(bad.to_string())),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_unit_conversion_clamps() {
        assert_eq!(Rgb::from_unit([1.5, -0.2, 0.5]), Rgb::new(255, 0, 128));
        assert_eq!(Rgb::WHITE.to_unit(), [1.0, 1.0, 1.0]);
        assert!((Rgb::WHITE.luminance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_palette_covers_every_face() {
        let palette = Palette::default();
        assert_eq!(palette.colors().len(), DEFAULT_FACE_COLORS.len());
        assert!(palette.clone().for_faces(FACE_COUNT).is_ok());
    }

    #[test]
    fn test_color_index_matches_face_index() {
        let palette = Palette::default();
        for (face, hex) in DEFAULT_FACE_COLORS.iter().enumerate() {
            assert_eq!(palette.color_for(face), Rgb::parse_hex(hex).unwrap());
        }
    }

    #[test]
    fn test_short_palette_rejected() {
        let palette = Palette::from_hex(&["#000000"; 19]).unwrap();
        assert_eq!(
            palette.for_faces(FACE_COUNT),
            Err(MeshError::PaletteTooShort {
                colors: 19,
                faces: FACE_COUNT
            })
        );
    }
}
