//! Host-side output - strokes a `ScreenPath` into SVG, PNG or JSON

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use svg::node::element::path::Data;
use svg::node::element::{Path as SvgPath, Rectangle};
use svg::Document;

use crate::error::{FractalError, Result};
use crate::path::{Point, ScreenPath};
use crate::view::check_viewport;

/// Stroke and background colors (`#rrggbb`) and line width in screen units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub background: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#000000".to_string(),
            stroke_width: 1.0,
            background: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &FsPath) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "json" => Ok(OutputFormat::Json),
            other => Err(FractalError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Write `screen` to `output`, choosing the format by extension
pub fn write_screen_path(screen: &ScreenPath, style: &RenderStyle, output: &FsPath) -> Result<()> {
    let format = OutputFormat::from_path(output)?;
    tracing::info!(
        "Writing {:?} ({} segments) to {:?}",
        format,
        screen.path.segment_count(),
        output
    );

    match format {
        OutputFormat::Svg => write_svg(screen, style, output),
        OutputFormat::Png => write_png(screen, style, output),
        OutputFormat::Json => write_json(screen, output),
    }
}

pub fn svg_document(screen: &ScreenPath, style: &RenderStyle) -> Document {
    let mut data = Data::new();
    for subpath in screen.path.subpaths() {
        let mut points = subpath.iter();
        if let Some(first) = points.next() {
            data = data.move_to((first.x as f32, first.y as f32));
        }
        for p in points {
            data = data.line_to((p.x as f32, p.y as f32));
        }
    }

    let background = Rectangle::new()
        .set("width", "100%")
        .set("height", "100%")
        .set("fill", style.background.as_str());

    let stroke = SvgPath::new()
        .set("fill", "none")
        .set("stroke", style.stroke_color.as_str())
        .set("stroke-width", style.stroke_width.to_string())
        .set("stroke-linecap", "round")
        .set("d", data);

    Document::new()
        .set("width", screen.viewport.width.to_string())
        .set("height", screen.viewport.height.to_string())
        .set(
            "viewBox",
            format!("0 0 {} {}", screen.viewport.width, screen.viewport.height),
        )
        .add(background)
        .add(stroke)
}

pub fn write_svg(screen: &ScreenPath, style: &RenderStyle, output: &FsPath) -> Result<()> {
    svg::save(output, &svg_document(screen, style))?;
    Ok(())
}

pub fn write_json(screen: &ScreenPath, output: &FsPath) -> Result<()> {
    let data = serde_json::json!({
        "generated": chrono::Local::now().to_rfc3339(),
        "segments": screen.path.segment_count(),
        "screen_path": screen,
    });
    std::fs::write(output, serde_json::to_string_pretty(&data)?)?;
    Ok(())
}

pub fn write_png(screen: &ScreenPath, style: &RenderStyle, output: &FsPath) -> Result<()> {
    rasterize(screen, style)?.save(output)?;
    Ok(())
}

/// Stroke every segment onto a viewport-sized image
///
/// Segments are clipped to the image (grown by the stroke radius) before
/// sampling, so only the visible part of a long segment costs anything.
pub fn rasterize(screen: &ScreenPath, style: &RenderStyle) -> Result<RgbaImage> {
    check_viewport(screen.viewport)?;
    let width = screen.viewport.width.round().max(1.0) as u32;
    let height = screen.viewport.height.round().max(1.0) as u32;
    let stroke = parse_color(&style.stroke_color)?;
    let background = parse_color(&style.background)?;

    let mut image = RgbaImage::from_pixel(width, height, background);
    let radius = (style.stroke_width / 2.0).max(0.5);
    let min = Point::new(-radius, -radius);
    let max = Point::new(width as f64 + radius, height as f64 + radius);

    for segment in screen.path.segments() {
        let Some((from, to)) = clip_segment(segment.from, segment.to, min, max) else {
            continue;
        };

        let steps = (from.distance_to(to) * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            stamp(&mut image, p, radius, stroke);
        }
    }

    Ok(image)
}

/// Liang-Barsky clip of `from -> to` against the box `[min, max]`.
/// `None` when nothing is inside or a coordinate is not finite.
fn clip_segment(from: Point, to: Point, min: Point, max: Point) -> Option<(Point, Point)> {
    if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
        return None;
    }

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    let edges = [
        (-dx, from.x - min.x),
        (dx, max.x - from.x),
        (-dy, from.y - min.y),
        (dy, max.y - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        Point::new(from.x + dx * t0, from.y + dy * t0),
        Point::new(from.x + dx * t1, from.y + dy * t1),
    ))
}

/// Fill the pixels whose centers lie within `radius` of `center`
fn stamp(image: &mut RgbaImage, center: Point, radius: f64, color: Rgba<u8>) {
    let (w, h) = (image.width() as f64, image.height() as f64);
    let min_x = (center.x - radius).floor().max(0.0);
    let max_x = (center.x + radius).ceil().min(w - 1.0);
    let min_y = (center.y - radius).floor().max(0.0);
    let max_y = (center.y + radius).ceil().min(h - 1.0);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius * radius {
                image.put_pixel(x, y, color);
            }
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_color(s: &str) -> Result<Rgba<u8>> {
    let invalid = || FractalError::InvalidParameter(format!("invalid color '{}'", s));
    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
