//! Canvas subsystem: the `Canvas` drawing trait, the palette, and
//! `RecordingCanvas`, an in-memory display list that can be exported as SVG.

use crate::types::Point;
use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed map palette.
pub mod palette {
    use super::Color;

    pub const HAZARD: Color = Color::rgb(0xe7, 0x4c, 0x3c);
    pub const NODE: Color = Color::rgb(0x2e, 0xcc, 0x71);
    pub const EDGE: Color = Color::rgb(0x55, 0x55, 0x55);
    pub const LABEL: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BACKGROUND: Color = Color::rgb(0x1e, 0x1e, 0x1e);
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A 2D immediate-mode drawing surface.
pub trait Canvas {
    /// Canvas size in pixels, `(width, height)`.
    fn size(&self) -> (u32, u32);
    /// Erase everything drawn so far.
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    /// Draw `text` horizontally centred on `at`.
    fn fill_text(&mut self, text: &str, at: Point, color: Color);
}

// ---------------------------------------------------------------------------
// Recording canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        color: Color,
    },
}

/// Records draw calls instead of rasterising them.
///
/// The recorded frame is the canvas "pixel output": two frames are equal
/// iff their display lists are equal, and [`RecordingCanvas::digest`] is a
/// stable fingerprint of the SVG serialisation.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    /// Number of `clear()` calls, i.e. full repaints started.
    frames: u64,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Fill colour of the circle drawn at `center`, if any.
    ///
    /// Later circles paint over earlier ones, so the last match wins.
    pub fn circle_color_at(&self, center: Point) -> Option<Color> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            DrawCommand::Circle {
                center: c, color, ..
            } if *c == center => Some(*color),
            _ => None,
        })
    }

    /// Serialise the current frame as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            palette::BACKGROUND
        );
        for cmd in &self.commands {
            let _ = match cmd {
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                } => writeln!(
                    svg,
                    r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
                    from.x, from.y, to.x, to.y, color, width
                ),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => writeln!(
                    svg,
                    r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
                    center.x, center.y, radius, color
                ),
                DrawCommand::Text { text, at, color } => writeln!(
                    svg,
                    r#"  <text x="{:.1}" y="{:.1}" fill="{}" text-anchor="middle" font-family="sans-serif" font-size="12">{}</text>"#,
                    at.x,
                    at.y,
                    color,
                    escape_xml(text)
                ),
            };
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Hex MD5 of [`RecordingCanvas::to_svg`].
    pub fn digest(&self) -> String {
        format!("{:x}", md5::compute(self.to_svg().as_bytes()))
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color,
        });
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
