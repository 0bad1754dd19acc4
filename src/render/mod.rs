//! CPU frame rasterization.
//!
//! Each frame is a polar plot inscribed in the image: a black background
//! with faint dashed rings, a central pulse disc whose radius follows the
//! intensity, and one marker per live particle.

pub mod colormap;
pub mod markers;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::particles::Particle;
use crate::themes::ThemeProfile;
use colormap::{hex_color, hex_to_rgb, Rgb};
use markers::MarkerStencil;

/// Dash and gap lengths of the background rings, in points.
const RING_DASH: (f32, f32) = (3.7, 1.6);

/// Frame geometry and background styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Pixels per inch; marker sizes are given in points.
    pub dpi: f32,
    /// Radius, in data units, at the edge of the plot.
    pub radial_limit: f32,
    /// Written as `"#rrggbb"` in configuration files.
    #[serde(with = "hex_color")]
    pub background: Rgb,
    #[serde(with = "hex_color")]
    pub ring_color: Rgb,
    pub ring_alpha: f32,
    pub ring_radii: Vec<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            dpi: 100.0,
            radial_limit: 2.5,
            background: hex_to_rgb(0x000000),
            ring_color: hex_to_rgb(0x8a2be2),
            ring_alpha: 0.1,
            ring_radii: vec![0.5, 1.0, 1.5, 2.0],
        }
    }
}

impl RenderConfig {
    /// Pixels per point.
    pub fn points_to_pixels(&self) -> f32 {
        self.dpi / 72.0
    }

    /// Number of bytes in one RGBA frame.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Source-over blend of `color` at `alpha` onto an opaque pixel.
#[inline]
fn blend(pixel: &mut image::Rgba<u8>, color: Rgb, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    for c in 0..3 {
        let dst = pixel.0[c] as f32;
        let src = color[c] * 255.0;
        pixel.0[c] = (src * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
    }
    pixel.0[3] = 255;
}

/// Rasterizer for one theme and frame size.
pub struct FrameRenderer {
    config: RenderConfig,
    profile: ThemeProfile,
    stencil: MarkerStencil,
    background: RgbaImage,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig, profile: ThemeProfile) -> Self {
        let stencil = MarkerStencil::new(profile.marker);
        let background = Self::draw_background(&config);
        Self {
            config,
            profile,
            stencil,
            background,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Pixel center of the plot.
    pub fn center(&self) -> (f32, f32) {
        (self.config.width as f32 / 2.0, self.config.height as f32 / 2.0)
    }

    /// Radius of the plot in pixels.
    pub fn plot_radius(&self) -> f32 {
        self.config.width.min(self.config.height) as f32 / 2.0
    }

    /// Pixels per data unit.
    pub fn scale(&self) -> f32 {
        self.plot_radius() / self.config.radial_limit
    }

    /// Map polar data coordinates to pixel coordinates (y down).
    pub fn to_pixel(&self, theta: f32, radius: f32) -> (f32, f32) {
        let (cx, cy) = self.center();
        let r = radius * self.scale();
        (cx + r * theta.cos(), cy - r * theta.sin())
    }

    /// Pulse radius in data units for an intensity.
    pub fn pulse_radius(&self, intensity: f32) -> f32 {
        intensity * self.profile.pulse_scale
    }

    /// Render one frame.
    pub fn render(&self, particles: &[Particle], intensity: f32) -> RgbaImage {
        let mut frame = self.background.clone();
        self.draw_pulse(&mut frame, self.pulse_radius(intensity));
        for particle in particles {
            self.draw_particle(&mut frame, particle);
        }
        frame
    }

    fn draw_background(config: &RenderConfig) -> RgbaImage {
        let bg = config.background;
        let mut image = RgbaImage::from_pixel(
            config.width,
            config.height,
            image::Rgba([
                (bg[0] * 255.0) as u8,
                (bg[1] * 255.0) as u8,
                (bg[2] * 255.0) as u8,
                255,
            ]),
        );

        let cx = config.width as f32 / 2.0;
        let cy = config.height as f32 / 2.0;
        let scale = config.width.min(config.height) as f32 / 2.0 / config.radial_limit;
        let pt = config.points_to_pixels();
        let (dash, gap) = (RING_DASH.0 * pt, RING_DASH.1 * pt);
        let half_width = 0.5 * pt;

        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - cx;
            let dy = cy - (y as f32 + 0.5);
            let dist = (dx * dx + dy * dy).sqrt();
            for &ring in &config.ring_radii {
                let ring_px = ring * scale;
                if (dist - ring_px).abs() > half_width {
                    continue;
                }
                let angle = dy.atan2(dx).rem_euclid(std::f32::consts::TAU);
                if (angle * ring_px) % (dash + gap) < dash {
                    blend(pixel, config.ring_color, config.ring_alpha);
                }
            }
        }
        image
    }

    fn draw_pulse(&self, frame: &mut RgbaImage, radius: f32) {
        let radius_px = radius * self.scale();
        if radius_px <= 0.0 {
            return;
        }
        let (cx, cy) = self.center();
        let paint = (self.profile.pulse_color, self.profile.pulse_alpha);
        self.fill_box(frame, (cx, cy), radius_px, paint, |dx, dy| {
            dx * dx + dy * dy <= radius_px * radius_px
        });
    }

    fn draw_particle(&self, frame: &mut RgbaImage, particle: &Particle) {
        let half = particle.size.max(0.0).sqrt() * self.config.points_to_pixels() / 2.0;
        if half <= 0.0 {
            return;
        }
        let (px, py) = self.to_pixel(particle.theta, particle.radius);
        let paint = (self.profile.colormap.sample(particle.color), self.profile.alpha);
        let stencil = &self.stencil;
        self.fill_box(frame, (px, py), half, paint, |dx, dy| {
            stencil.contains(dx / half, dy / half)
        });
    }

    /// Blend every pixel of the square `origin ± half` for which `inside`
    /// holds, clipped to the plot circle. `inside` receives offsets from the
    /// origin with y pointing up.
    fn fill_box<F>(
        &self,
        frame: &mut RgbaImage,
        (x0, y0): (f32, f32),
        half: f32,
        (color, alpha): (Rgb, f32),
        inside: F,
    ) where
        F: Fn(f32, f32) -> bool,
    {
        let (cx, cy) = self.center();
        let limit = self.plot_radius();
        let (w, h) = (frame.width() as i64, frame.height() as i64);

        let x_min = ((x0 - half).floor() as i64).max(0);
        let x_max = ((x0 + half).ceil() as i64).min(w - 1);
        let y_min = ((y0 - half).floor() as i64).max(0);
        let y_max = ((y0 + half).ceil() as i64).min(h - 1);

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let fx = x as f32 + 0.5;
                let fy = y as f32 + 0.5;
                if (fx - cx).powi(2) + (fy - cy).powi(2) > limit * limit {
                    continue;
                }
                if inside(fx - x0, y0 - fy) {
                    blend(frame.get_pixel_mut(x as u32, y as u32), color, alpha);
                }
            }
        }
    }
}
