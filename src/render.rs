//! Raster rendering of one reconstruction frame for offline inspection.
//!
//! Consumes only the visitor API of [`PathModel`] and [`FourierSeries`] and
//! rasterizes via tiny-skia: the source drawing, the epicycle circles, the
//! segment chain and the reconstructed partial curve, stacked back to front.

use kurbo::Point;
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::FourierError;
use crate::path::PathModel;
use crate::series::FourierSeries;

/// Which layers to draw, plus the canvas size in pixels.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Square canvas side in pixels.
    pub size: u32,
    /// Draw the source polyline (truncated at the drawn portion).
    pub show_original: bool,
    /// Draw the epicycle circles.
    pub show_circles: bool,
    /// Draw the segment chain from the origin to the pen.
    pub show_segments: bool,
    /// Draw the reconstructed partial curve.
    pub show_curve: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 512,
            show_original: true,
            show_circles: true,
            show_segments: true,
            show_curve: true,
        }
    }
}

/// Render one frame at the given order and time.
///
/// Takes the series mutably because drawing the partial curve reuses and
/// extends its sample cache; a frame loop sweeping `t` upward amortizes the
/// cache across frames.
pub fn render_frame(
    drawing: &PathModel,
    series: &mut FourierSeries,
    order: f64,
    t: f64,
    options: &RenderOptions,
) -> Result<Pixmap, FourierError> {
    if !order.is_finite() || order < 0.0 {
        return Err(FourierError::InvalidArgument(format!(
            "order must be non-negative and finite, got {}",
            order
        )));
    }
    let mut pixmap = Pixmap::new(options.size, options.size).ok_or_else(|| {
        FourierError::InvalidArgument(format!("canvas size must be non-zero, got {}", options.size))
    })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 0, 255));

    let fit = fit_transform(drawing, options.size);

    if options.show_original {
        let mut points = Vec::new();
        let drawn_t = t.clamp(0.0, 1.0).min(drawing.original_path_duration());
        drawing.polyline_to(drawn_t, |p| points.push(p))?;
        stroke_polyline(&mut pixmap, &points, fit, (110, 110, 110), 1.5);
    }

    let floored = order.floor() as usize;

    if options.show_circles {
        let mut pb = PathBuilder::new();
        series.circles_to_point(floored, t, |center, radius| {
            let (cx, cy) = transform_point(center.x, center.y, fit);
            let r = (radius * fit.sx as f64) as f32;
            if r > 0.0 {
                pb.push_circle(cx, cy, r);
            }
        })?;
        if let Some(path) = pb.finish() {
            let mut paint = Paint::default();
            paint.set_color_rgba8(70, 70, 70, 255);
            paint.anti_alias = true;
            let stroke = Stroke {
                width: 1.0,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    if options.show_segments {
        let mut points = Vec::new();
        series.segments_to_point(floored, t, |p| points.push(p))?;
        stroke_polyline(&mut pixmap, &points, fit, (190, 160, 60), 1.0);
    }

    if options.show_curve {
        let mut points = Vec::new();
        series.render_curve_at_fractional_order(order, t, |p| points.push(p))?;
        stroke_polyline(&mut pixmap, &points, fit, (255, 255, 255), 1.5);
    }

    Ok(pixmap)
}

/// Encode a pixmap to PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, FourierError> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    drop(writer);
    Ok(buf)
}

/// Uniform world-to-pixel transform: fit the drawing's bounding box into the
/// canvas with a 10% margin, centered.
fn fit_transform(drawing: &PathModel, size: u32) -> Transform {
    let bounds = drawing.bounding_box();
    let margin = size as f64 * 0.1;
    let extent = bounds.width().max(bounds.height()).max(f64::MIN_POSITIVE);
    let scale = (size as f64 - 2.0 * margin) / extent;
    let center = bounds.center();
    let tx = size as f64 / 2.0 - scale * center.x;
    let ty = size as f64 / 2.0 - scale * center.y;
    Transform::from_row(scale as f32, 0.0, 0.0, scale as f32, tx as f32, ty as f32)
}

/// Apply transform manually to a point (f64 -> f32).
fn transform_point(x: f64, y: f64, t: Transform) -> (f32, f32) {
    let x = x as f32;
    let y = y as f32;
    (
        t.sx * x + t.kx * y + t.tx,
        t.ky * x + t.sy * y + t.ty,
    )
}

fn stroke_polyline(
    pixmap: &mut Pixmap,
    points: &[Point],
    fit: Transform,
    rgb: (u8, u8, u8),
    width: f32,
) {
    if points.len() < 2 {
        return;
    }
    let mut pb = PathBuilder::new();
    let (x, y) = transform_point(points[0].x, points[0].y, fit);
    pb.move_to(x, y);
    for p in &points[1..] {
        let (x, y) = transform_point(p.x, p.y, fit);
        pb.line_to(x, y);
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb.0, rgb.1, rgb.2, 255);
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}
