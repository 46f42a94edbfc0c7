//! Drawing-surface seam. Visualizations paint through [`Surface`]; the browser
//! implements it over a 2D canvas context and tests record the calls.

use std::f64::consts::PI;
use std::fmt;

use crate::error::VizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn w(&self) -> f64 {
        self.width as f64
    }

    pub fn h(&self) -> f64 {
        self.height as f64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A CSS colour value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
    /// Hue in degrees, saturation and lightness in percent.
    Hsla(f64, f64, f64, f64),
    Hex(&'static str),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgb(r, g, b) => write!(f, "rgb({r}, {g}, {b})"),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({r}, {g}, {b}, {a})"),
            Color::Hsla(h, s, l, a) => write!(f, "hsla({h}, {s}%, {l}%, {a})"),
            Color::Hex(hex) => f.write_str(hex),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Minimal immediate-mode drawing API used by every visualization.
pub trait Surface {
    /// Resize the backing store. Implementations may discard pixels.
    fn resize(&mut self, size: Size) -> Result<(), VizError>;

    fn clear(&mut self) -> Result<(), VizError>;

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<(), VizError>;

    /// Arc from `start` to `end` (radians, clockwise in screen space).
    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    ) -> Result<(), VizError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), VizError>;

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) -> Result<(), VizError>;

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), VizError>;

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) -> Result<(), VizError> {
        self.stroke_arc(center, radius, 0.0, 2.0 * PI, stroke)
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), VizError> {
        self.stroke_polyline(&[from, to], stroke)
    }
}
