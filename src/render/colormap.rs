//! Sequential color maps and color parsing.

/// RGB color with components in 0.0..=1.0.
pub type Rgb = [f32; 3];

/// Number of discrete entries a color map is sampled into.
const LUT_SIZE: usize = 256;

/// Nine-stop sequential color ramp, linearly interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colormap {
    name: &'static str,
    stops: [u32; 9],
}

impl Colormap {
    pub const OR_RD: Colormap = Colormap {
        name: "OrRd",
        stops: [
            0xfff7ec, 0xfee8c8, 0xfdd49e, 0xfdbb84, 0xfc8d59, 0xef6548, 0xd7301f, 0xb30000,
            0x7f0000,
        ],
    };

    pub const BLUES: Colormap = Colormap {
        name: "Blues",
        stops: [
            0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c,
            0x08306b,
        ],
    };

    pub const PURPLES: Colormap = Colormap {
        name: "Purples",
        stops: [
            0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f,
            0x3f007d,
        ],
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Map a value to a color. Values are clamped to [0,1] and quantized to
    /// 256 levels before interpolation.
    pub fn sample(&self, value: f32) -> Rgb {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let index = ((value * LUT_SIZE as f32) as usize).min(LUT_SIZE - 1);
        let x = index as f32 / (LUT_SIZE - 1) as f32;

        let segments = (self.stops.len() - 1) as f32;
        let pos = x * segments;
        let lo = (pos.floor() as usize).min(self.stops.len() - 2);
        let t = pos - lo as f32;

        let a = hex_to_rgb(self.stops[lo]);
        let b = hex_to_rgb(self.stops[lo + 1]);
        [
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
        ]
    }
}

/// Unpack a `0xRRGGBB` literal.
pub fn hex_to_rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Parse hex color to RGB floats (accepts 6-char RGB or 8-char RGBA, alpha is ignored).
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let value = u32::from_str_radix(&hex[..6], 16).ok()?;
    Some(hex_to_rgb(value))
}

/// Format as `#rrggbb`.
pub fn to_hex_color(color: Rgb) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(color[0]), byte(color[1]), byte(color[2]))
}

/// Serde adapter storing an [`Rgb`] as a hex string.
pub mod hex_color {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_hex_color, to_hex_color, Rgb};

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_hex_color(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid hex color '{}'", text)))
    }
}
