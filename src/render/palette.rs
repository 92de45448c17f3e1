use crate::utils::error::{ReportError, Result};
use plotters::style::RGBColor;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A brand color, carried as RGB and converted on demand to whichever form
/// the active render backend wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let stripped = hex.strip_prefix('#').unwrap_or(hex);
        if stripped.len() != 6 || !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ReportError::InvalidConfigValueError {
                field: "color".to_string(),
                value: hex.to_string(),
                reason: "Expected a hex color in #RRGGBB form".to_string(),
            });
        }

        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&stripped[range], 16).map_err(|e| {
                ReportError::InvalidConfigValueError {
                    field: "color".to_string(),
                    value: hex.to_string(),
                    reason: e.to_string(),
                }
            })
        };

        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn plotters(&self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    pub fn xlsx(&self) -> rust_xlsxwriter::Color {
        rust_xlsxwriter::Color::RGB(
            ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32),
        )
    }

    pub fn pdf(&self) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            None,
        ))
    }

    pub fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
    }

    /// Relative luminance, used to decide black vs white cell labels.
    pub fn luminance(&self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Rgb::from_hex(&hex).map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// Yellow -> orange -> dark red ramp for the orders heatmap, `t` in `[0, 1]`.
pub fn heat_ramp(t: f64) -> Rgb {
    const LOW: Rgb = Rgb::new(0xFF, 0xFF, 0xCC);
    const MID: Rgb = Rgb::new(0xFD, 0x8D, 0x3C);
    const HIGH: Rgb = Rgb::new(0x80, 0x00, 0x26);

    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        Rgb::lerp(LOW, MID, t * 2.0)
    } else {
        Rgb::lerp(MID, HIGH, (t - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Rgb::from_hex("#822F23").unwrap();
        assert_eq!(color, Rgb::new(0x82, 0x2F, 0x23));
        assert_eq!(color.to_hex(), "#822F23");
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Rgb::from_hex("#82F2").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(Rgb::lerp(a, b, 0.0), a);
        assert_eq!(Rgb::lerp(a, b, 1.0), b);
        assert_eq!(Rgb::lerp(a, b, 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn test_heat_ramp_bounds() {
        assert_eq!(heat_ramp(0.0), Rgb::new(0xFF, 0xFF, 0xCC));
        assert_eq!(heat_ramp(1.0), Rgb::new(0x80, 0x00, 0x26));
    }

    #[test]
    fn test_luminance_ordering() {
        assert!(Rgb::new(255, 255, 255).luminance() > Rgb::new(20, 20, 20).luminance());
    }
}
