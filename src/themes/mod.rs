//! Theme profiles.
//!
//! Three fixed profiles select every per-run constant of the simulation and
//! the renderer:
//! - Agni: fire, saffron pulse, star markers
//! - Vayu: wind, teal pulse, pentagon markers with swirl
//! - Indra: storm, gold pulse, hexagon markers with flashes

use std::f32::consts::TAU;
use std::ops::Range;

use crate::render::colormap::{hex_to_rgb, Colormap, Rgb};
use crate::render::markers::MarkerShape;

/// Errors from theme selection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Invalid theme number {0}. Choose 1, 2, or 3.")]
    InvalidNumber(i64),
}

/// Available themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Agni,
    Vayu,
    Indra,
}

impl Theme {
    /// Theme from its command-line number.
    pub fn from_number(number: i64) -> Result<Self, ThemeError> {
        match number {
            1 => Ok(Self::Agni),
            2 => Ok(Self::Vayu),
            3 => Ok(Self::Indra),
            other => Err(ThemeError::InvalidNumber(other)),
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Agni => 1,
            Self::Vayu => 2,
            Self::Indra => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Agni => "agni",
            Self::Vayu => "vayu",
            Self::Indra => "indra",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Agni => "Agni (Fire)",
            Self::Vayu => "Vayu (Wind)",
            Self::Indra => "Indra (Thunder/Storm)",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Agni, Self::Vayu, Self::Indra]
    }

    /// The fixed profile of this theme.
    pub fn profile(&self) -> ThemeProfile {
        match self {
            Self::Agni => ThemeProfile {
                theme: *self,
                threshold: 0.2,
                max_lifetime: 60,
                pulse_color: hex_to_rgb(0xff4500),
                pulse_alpha: 0.6,
                pulse_scale: 0.4,
                colormap: Colormap::OR_RD,
                alpha: 0.8,
                marker: MarkerShape::Star,
                speed: 0.03..0.1,
                color_seed: 0.5..1.0,
                flash_chance: 0.0,
                size: 5.0..15.0,
                swirl: None,
                fade: 0.9,
                shrink: 0.98,
            },
            Self::Vayu => ThemeProfile {
                theme: *self,
                threshold: 0.25,
                max_lifetime: 40,
                pulse_color: hex_to_rgb(0x00ced1),
                pulse_alpha: 0.6,
                pulse_scale: 0.4,
                colormap: Colormap::BLUES,
                alpha: 0.8,
                marker: MarkerShape::Pentagon,
                speed: 0.05..0.12,
                color_seed: 0.3..1.0,
                flash_chance: 0.0,
                size: 3.0..10.0,
                swirl: Some(-0.02..0.02),
                fade: 1.0,
                shrink: 0.95,
            },
            Self::Indra => ThemeProfile {
                theme: *self,
                threshold: 0.4,
                max_lifetime: 30,
                pulse_color: hex_to_rgb(0xffd700),
                pulse_alpha: 0.7,
                pulse_scale: 0.5,
                colormap: Colormap::PURPLES,
                alpha: 0.9,
                marker: MarkerShape::Hexagon,
                speed: 0.06..0.15,
                color_seed: 0.0..1.0,
                flash_chance: 0.3,
                size: 5.0..20.0,
                swirl: None,
                fade: 0.8,
                shrink: 0.9,
            },
        }
    }
}

/// Immutable per-run configuration of the simulator and renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeProfile {
    pub theme: Theme,
    /// Intensity that must be exceeded to spawn a burst.
    pub threshold: f32,
    /// Lifetime of a freshly spawned particle, in frames.
    pub max_lifetime: u32,
    pub pulse_color: Rgb,
    pub pulse_alpha: f32,
    /// Pulse radius per unit of intensity, in data units.
    pub pulse_scale: f32,
    pub colormap: Colormap,
    /// Scatter alpha.
    pub alpha: f32,
    pub marker: MarkerShape,
    /// Radial speed range, scaled by intensity at spawn.
    pub speed: Range<f32>,
    pub color_seed: Range<f32>,
    /// Probability that a spawned particle's color is forced to 1.0.
    pub flash_chance: f64,
    /// Marker area range in points².
    pub size: Range<f32>,
    /// Angular drift range in radians per frame, when enabled.
    pub swirl: Option<Range<f32>>,
    /// Multiplier on the lifetime ratio applied to color each frame.
    pub fade: f32,
    /// Multiplicative size decay per frame.
    pub shrink: f32,
}

impl ThemeProfile {
    /// Full circle spawn range.
    pub fn angle_range(&self) -> Range<f32> {
        0.0..TAU
    }

    pub fn has_swirl(&self) -> bool {
        self.swirl.is_some()
    }

    pub fn silent_filename(&self) -> String {
        format!("{}_silent.mp4", self.theme.name())
    }

    pub fn output_filename(&self) -> String {
        format!("{}_with_audio.mp4", self.theme.name())
    }
}
