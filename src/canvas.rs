//! The drawing surface a planned page is rendered onto.
//!
//! Layout never touches pixels; it hands numbers to something implementing
//! [`Canvas`]. [`SvgCanvas`] is the implementation shipped with the crate.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Color::rgb(level, level, level)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f64,
    pub align: HorizontalAlign,
    pub baseline: VerticalAlign,
    pub color: Color,
}

/// The drawing primitives needed to render chromosome ideograms.
///
/// Segment and circle coordinates are relative to the current origin, which
/// starts at the top-left corner. Text positions are too.
pub trait Canvas {
    /// Move the origin by `(dx, dy)` relative to where it currently is.
    fn translate_origin(&mut self, dx: f64, dy: f64);

    /// Move the origin back to the top-left corner.
    fn reset_origin(&mut self);

    /// A horizontal line on the origin's row, from `x0` to `x1`, with
    /// rounded ends.
    fn draw_segment(&mut self, x0: f64, x1: f64, stroke_width: f64, color: Color);

    /// A filled circle centred on the origin.
    fn draw_circle(&mut self, radius: f64, fill: Color);

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Accumulates drawing calls into an SVG document.
pub struct SvgCanvas {
    svg: String,
    origin: (f64, f64),
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<style>
  text {{ font-family: 'DejaVu Sans', Helvetica, Arial, sans-serif; }}
</style>
<rect width="100%" height="100%" fill="{bg}"/>
"#,
            w = width,
            h = height,
            bg = background
        ));
        SvgCanvas {
            svg,
            origin: (0.0, 0.0),
        }
    }

    /// Close the document and return it.
    pub fn finish(mut self) -> String {
        self.svg.push_str("</svg>\n");
        self.svg
    }
}

impl Canvas for SvgCanvas {
    fn translate_origin(&mut self, dx: f64, dy: f64) {
        self.origin.0 += dx;
        self.origin.1 += dy;
    }

    fn reset_origin(&mut self) {
        self.origin = (0.0, 0.0);
    }

    fn draw_segment(&mut self, x0: f64, x1: f64, stroke_width: f64, color: Color) {
        let (ox, oy) = self.origin;
        // writing into a String cannot fail
        let _ = writeln!(
            self.svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            ox + x0,
            oy,
            ox + x1,
            oy,
            color,
            stroke_width
        );
    }

    fn draw_circle(&mut self, radius: f64, fill: Color) {
        let (ox, oy) = self.origin;
        let _ = writeln!(
            self.svg,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            ox, oy, radius, fill
        );
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let (ox, oy) = self.origin;
        let anchor = match style.align {
            HorizontalAlign::Left => "start",
            HorizontalAlign::Center => "middle",
            HorizontalAlign::Right => "end",
        };
        let baseline = match style.baseline {
            VerticalAlign::Top => "hanging",
            VerticalAlign::Middle => "central",
            VerticalAlign::Bottom => "text-after-edge",
        };
        let _ = writeln!(
            self.svg,
            r#"<text x="{}" y="{}" font-size="{}" text-anchor="{}" dominant-baseline="{}" fill="{}">{}</text>"#,
            ox + x,
            oy + y,
            style.size,
            anchor,
            baseline,
            style.color,
            escape_xml(text)
        );
    }
}
