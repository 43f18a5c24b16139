//! Abstract drawing surface
//!
//! The simulation does not render anything itself. Once per frame the host
//! hands every entity a [`DrawSurface`] together with the ratio between the
//! actual pixel size and the 800x320 reference playfield, and the entity
//! issues plain shape calls. A canvas, a GPU pipeline or a test recorder can
//! all sit behind the trait.

use serde::{Deserialize, Serialize};

/// An sRGB color. Obstacle templates and player colors are plain RGB values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const LIGHT_BLUE: Color = Color::rgb(173, 216, 230);
    pub const GROUND_GREEN: Color = Color::rgb(0x18, 0x9b, 0x18);
}

/// Minimal 2D shape surface. All coordinates are in pixels, already scaled
/// by the ratio the entity received.
pub trait DrawSurface {
    /// Axis-aligned filled rectangle; (x, y) is the top-left corner.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    /// Filled circle around (x, y).
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    /// Stroked line segment.
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color);
}

/// Recording surface for tests: stores every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub rects: Vec<(f32, f32, f32, f32, Color)>,
    pub circles: Vec<(f32, f32, f32, Color)>,
    pub lines: Vec<(f32, f32, f32, f32, f32, Color)>,
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.rects.push((x, y, w, h, color));
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.circles.push((x, y, radius, color));
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color) {
        self.lines.push((x0, y0, x1, y1, width, color));
    }
}
