//! `Surface` over a browser canvas 2D context

use web_sys::CanvasRenderingContext2d as Ctx;

use super::surface::{Color, Surface};

const FONT_FAMILY: &str = "'Helvetica Neue', Arial, sans-serif";

// Inherent context methods share names with the trait, so calls are spelled
// out to avoid resolving back to `Surface`.
impl Surface for Ctx {
    fn clear(&mut self, width: f64, height: f64) {
        Ctx::clear_rect(self, 0.0, 0.0, width, height);
    }

    fn set_stroke_color(&mut self, color: Color) {
        Ctx::set_stroke_style_str(self, &color.to_css());
    }

    fn set_fill_color(&mut self, color: Color) {
        Ctx::set_fill_style_str(self, &color.to_css());
    }

    fn set_line_width(&mut self, width: f64) {
        Ctx::set_line_width(self, width);
    }

    fn begin_path(&mut self) {
        Ctx::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        Ctx::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        Ctx::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        Ctx::close_path(self);
    }

    fn stroke(&mut self) {
        Ctx::stroke(self);
    }

    fn fill(&mut self) {
        Ctx::fill(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size_px: f64) {
        Ctx::set_font(self, &format!("300 {size_px:.0}px {FONT_FAMILY}"));
        Ctx::set_text_align(self, "center");
        let _ = Ctx::fill_text(self, text, x, y);
    }
}
