use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::VizError;
use crate::surface::{Color, Point, Size, Stroke, Surface};

/// [`Surface`] backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, VizError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| VizError::Surface("2d context not supported".into()))?
            .dyn_into()
            .map_err(|_| VizError::Surface("context is not 2d".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn trace(&self, points: &[Point]) {
        self.ctx.begin_path();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.ctx.move_to(p.x, p.y);
            } else {
                self.ctx.line_to(p.x, p.y);
            }
        }
    }

    fn apply_stroke(&self, stroke: Stroke) {
        self.ctx.set_stroke_style_str(&stroke.color.to_string());
        self.ctx.set_line_width(stroke.width);
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, size: Size) -> Result<(), VizError> {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), VizError> {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<(), VizError> {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(x, y, w, h);
        Ok(())
    }

    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    ) -> Result<(), VizError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius.max(0.0), start, end)?;
        self.apply_stroke(stroke);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), VizError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, PI * 2.0)?;
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill();
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) -> Result<(), VizError> {
        self.trace(points);
        self.apply_stroke(stroke);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), VizError> {
        self.trace(points);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill();
        Ok(())
    }
}
