//! Immediate-mode drawing surface
//!
//! The renderer never owns its target: each frame it is handed something that
//! implements `Surface`. The browser build wraps a canvas 2D context; tests and
//! the native binary use `RecordingSurface`.

/// RGBA colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with alpha multiplied by `alpha`
    pub fn faded(self, alpha: f64) -> Self {
        Self {
            a: self.a * alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` string for canvas style setters
    pub fn to_css(&self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const SNOW: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const SNOW_FILL: Color = Color::rgba(0.85, 0.92, 1.0, 0.35);
    pub const DECOR: Color = Color::rgba(1.0, 1.0, 1.0, 0.6);
    pub const CAPTION: Color = Color::rgba(1.0, 1.0, 1.0, 0.6);
    pub const TARGET: Color = Color::rgba(0.55, 0.8, 1.0, 0.25);
    pub const PLATFORM: Color = Color::rgba(0.7, 0.75, 0.85, 1.0);
    pub const MESSAGE: Color = Color::rgba(1.0, 1.0, 1.0, 0.9);
}

/// The subset of a canvas 2D context the renderer relies on
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);
    /// Centred text with the given font size in pixels
    fn fill_text(&mut self, text: &str, x: f64, y: f64, size_px: f64);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f64, height: f64 },
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Stroke,
    Fill,
    Text { text: String, x: f64, y: f64, size_px: f64 },
}

/// Surface that records every call, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Number of `LineTo` segments emitted
    pub fn segment_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::LineTo(..)))
    }

    pub fn fill_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Fill))
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, size_px: f64) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size_px,
        });
    }
}
