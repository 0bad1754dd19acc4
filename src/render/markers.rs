//! Scatter marker shapes.

use std::f32::consts::{FRAC_PI_2, TAU};

/// Inner radius of the five-pointed star relative to its outer radius.
const STAR_INNER: f32 = 0.381966;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    /// Five-pointed star, point up.
    Star,
    /// Regular pentagon, point up.
    Pentagon,
    /// Regular hexagon, point up.
    Hexagon,
}

impl MarkerShape {
    /// Outline of the marker at unit radius, y pointing up. Circles have no
    /// polygon.
    pub fn outline(&self) -> Option<Vec<(f32, f32)>> {
        let vertex = |i: usize, n: usize, r: f32| {
            let angle = FRAC_PI_2 + TAU * i as f32 / n as f32;
            (r * angle.cos(), r * angle.sin())
        };
        match self {
            Self::Circle => None,
            Self::Star => Some(
                (0..10)
                    .map(|i| vertex(i, 10, if i % 2 == 0 { 1.0 } else { STAR_INNER }))
                    .collect(),
            ),
            Self::Pentagon => Some((0..5).map(|i| vertex(i, 5, 1.0)).collect()),
            Self::Hexagon => Some((0..6).map(|i| vertex(i, 6, 1.0)).collect()),
        }
    }
}

/// A marker outline resolved once for repeated hit testing.
#[derive(Debug, Clone)]
pub struct MarkerStencil {
    outline: Option<Vec<(f32, f32)>>,
}

impl MarkerStencil {
    pub fn new(shape: MarkerShape) -> Self {
        Self {
            outline: shape.outline(),
        }
    }

    /// Whether a point in unit marker space (y up) lies inside the marker.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        if x * x + y * y > 1.0 {
            return false;
        }
        let Some(outline) = &self.outline else {
            return true;
        };

        // Even-odd ray cast towards +x.
        let mut inside = false;
        let mut j = outline.len() - 1;
        for i in 0..outline.len() {
            let (xi, yi) = outline[i];
            let (xj, yj) = outline[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
