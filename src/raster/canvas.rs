//! Software renderer for the PDF drawing subset the exporter emits.
//!
//! Supported operators: `q`/`Q`, `rg`/`RG`, `g`/`G`, `w`, `re`, `m`, `l`,
//! `h`, `f`/`F`/`f*`, `S`, `B`, `n`, `BT`, `Tf`, `Td`, `Tj`, `ET`. Anything else
//! is skipped. Text is drawn with an 8x8 bitmap font stretched to the glyph
//! box, so output is legible rather than typographically faithful.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use lopdf::{content::Operation, Object};

use crate::errors::PageError;
use crate::export::layout::GLYPH_ADVANCE;

/// Largest pixel buffer a single page may allocate.
pub const MAX_PIXELS: u64 = 64_000_000;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Fraction of the font size drawn above the baseline.
const ASCENT: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Rect { x: f32, y: f32, w: f32, h: f32 },
    Line { from: (f32, f32), to: (f32, f32) },
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill: Rgb<u8>,
    stroke: Rgb<u8>,
    line_width: f32,
    font_size: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill: BLACK,
            stroke: BLACK,
            line_width: 1.0,
            font_size: 12.0,
        }
    }
}

/// A page-sized pixel buffer addressed in PDF points.
pub struct Canvas {
    image: RgbImage,
    scale: f32,
    page_height: f32,
}

impl Canvas {
    /// Fails with [`PageError::TooLarge`] when the scaled page would exceed
    /// [`MAX_PIXELS`].
    pub fn new(page_width: f32, page_height: f32, scale: f32) -> Result<Self, PageError> {
        let width = pixels(page_width, scale);
        let height = pixels(page_height, scale);
        if !(width.is_finite() && height.is_finite()) || width * height > MAX_PIXELS as f64 {
            return Err(PageError::TooLarge {
                width,
                height,
                limit: MAX_PIXELS,
            });
        }
        Ok(Self {
            image: RgbImage::from_pixel(width as u32, height as u32, WHITE),
            scale,
            page_height,
        })
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Paints a page content stream.
    pub fn paint(&mut self, operations: &[Operation]) {
        let mut state = GraphicsState::default();
        let mut saved: Vec<GraphicsState> = Vec::new();
        let mut path: Vec<Segment> = Vec::new();
        let mut current_point = (0.0, 0.0);
        let mut text_origin = (0.0, 0.0);

        for op in operations {
            let args = numbers(&op.operands);
            match op.operator.as_str() {
                "q" => saved.push(state.clone()),
                "Q" => {
                    if let Some(previous) = saved.pop() {
                        state = previous;
                    }
                }
                "rg" => state.fill = rgb(&args).unwrap_or(state.fill),
                "RG" => state.stroke = rgb(&args).unwrap_or(state.stroke),
                "g" => state.fill = gray(&args).unwrap_or(state.fill),
                "G" => state.stroke = gray(&args).unwrap_or(state.stroke),
                "w" => state.line_width = args.first().copied().unwrap_or(state.line_width),
                "re" => {
                    if let [x, y, w, h, ..] = args[..] {
                        path.push(Segment::Rect { x, y, w, h });
                    }
                }
                "m" => {
                    if let [x, y, ..] = args[..] {
                        current_point = (x, y);
                    }
                }
                "l" => {
                    if let [x, y, ..] = args[..] {
                        path.push(Segment::Line {
                            from: current_point,
                            to: (x, y),
                        });
                        current_point = (x, y);
                    }
                }
                "f" | "F" | "f*" => self.fill_path(path.drain(..), state.fill),
                "S" => self.stroke_path(path.drain(..), &state),
                "B" | "B*" => {
                    self.fill_path(path.iter().copied(), state.fill);
                    self.stroke_path(path.drain(..), &state);
                }
                "n" => path.clear(),
                "BT" => text_origin = (0.0, 0.0),
                "Tf" => {
                    if let Some(size) = args.last() {
                        state.font_size = *size;
                    }
                }
                "Td" => {
                    if let [tx, ty, ..] = args[..] {
                        text_origin = (text_origin.0 + tx, text_origin.1 + ty);
                    }
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        self.draw_text(text_origin, state.font_size, bytes, state.fill);
                    }
                }
                _ => {}
            }
        }
    }

    fn fill_path(&mut self, segments: impl Iterator<Item = Segment>, color: Rgb<u8>) {
        for segment in segments {
            if let Segment::Rect { x, y, w, h } = segment {
                self.fill_rect(x, y, w, h, color);
            }
        }
    }

    fn stroke_path(&mut self, segments: impl Iterator<Item = Segment>, state: &GraphicsState) {
        let half = state.line_width / 2.0;
        for segment in segments {
            match segment {
                Segment::Rect { x, y, w, h } => {
                    self.stroke_line((x, y), (x + w, y), half, state.stroke);
                    self.stroke_line((x + w, y), (x + w, y + h), half, state.stroke);
                    self.stroke_line((x + w, y + h), (x, y + h), half, state.stroke);
                    self.stroke_line((x, y + h), (x, y), half, state.stroke);
                }
                Segment::Line { from, to } => self.stroke_line(from, to, half, state.stroke),
            }
        }
    }

    /// Draws a line as a filled quad along its bounding box; exact for the
    /// axis-aligned grid lines tables use.
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), half: f32, color: Rgb<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        if dx.abs() < f32::EPSILON || dy.abs() < f32::EPSILON {
            let x = from.0.min(to.0) - half;
            let y = from.1.min(to.1) - half;
            self.fill_rect(x, y, dx.abs() + 2.0 * half, dy.abs() + 2.0 * half, color);
            return;
        }
        let steps = (dx.abs().max(dy.abs()) * self.scale).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let (x, y) = (from.0 + dx * t, from.1 + dy * t);
            self.fill_rect(x - half, y - half, 2.0 * half, 2.0 * half, color);
        }
    }

    /// Fills a rectangle given in points (origin bottom-left).
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
        let (x0, x1) = (x.min(x + w), x.max(x + w));
        let (y0, y1) = (y.min(y + h), y.max(y + h));
        let left = self.to_px_x(x0);
        let right = self.to_px_x(x1).max(left + 1);
        let top = self.to_px_y(y1);
        let bottom = self.to_px_y(y0).max(top + 1);
        self.fill_px(left, top, right, bottom, color);
    }

    fn fill_px(&mut self, left: i64, top: i64, right: i64, bottom: i64, color: Rgb<u8>) {
        let (width, height) = (i64::from(self.image.width()), i64::from(self.image.height()));
        for py in top.max(0)..bottom.min(height) {
            for px in left.max(0)..right.min(width) {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    fn draw_text(&mut self, origin: (f32, f32), size: f32, bytes: &[u8], color: Rgb<u8>) {
        let advance = size * GLYPH_ADVANCE;
        let glyph_top = origin.1 + size * ASCENT;
        for (idx, byte) in bytes.iter().enumerate() {
            let Some(glyph) = glyph(char::from(*byte)) else {
                continue;
            };
            let left = origin.0 + advance * idx as f32;
            let (px_left, px_right) = (self.to_px_x(left), self.to_px_x(left + advance));
            let (px_top, px_bottom) = (self.to_px_y(glyph_top), self.to_px_y(glyph_top - size));
            let (box_w, box_h) = ((px_right - px_left).max(1), (px_bottom - px_top).max(1));
            for py in px_top..px_top + box_h {
                let row = ((py - px_top) * 8 / box_h) as usize;
                for px in px_left..px_left + box_w {
                    let bit = ((px - px_left) * 8 / box_w) as usize;
                    if glyph[row.min(7)] & (1 << bit.min(7)) != 0 {
                        self.fill_px(px, py, px + 1, py + 1, color);
                    }
                }
            }
        }
    }

    fn to_px_x(&self, x: f32) -> i64 {
        (x * self.scale).round() as i64
    }

    fn to_px_y(&self, y: f32) -> i64 {
        ((self.page_height - y) * self.scale).round() as i64
    }
}

fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch))
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().filter_map(number).collect()
}

pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn rgb(args: &[f32]) -> Option<Rgb<u8>> {
    match args {
        [r, g, b, ..] => Some(Rgb([channel(*r), channel(*g), channel(*b)])),
        _ => None,
    }
}

fn gray(args: &[f32]) -> Option<Rgb<u8>> {
    args.first().map(|level| {
        let value = channel(*level);
        Rgb([value, value, value])
    })
}

fn pixels(points: f32, scale: f32) -> f64 {
    (f64::from(points) * f64::from(scale)).round().max(1.0)
}
