// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene painting with tiny-skia.
//!
//! One painter serves both the interactive view and the mask export. The
//! view draws the canvas, the transformed image, the objects clipped to the
//! image and the selection overlay. The export paints the same objects at
//! identity with mask styling and anti-aliasing off.

use crate::config::EditorConfig;
use crate::io::media::SourceImage;
use crate::models::{Scene, Shape, Style};
use crate::tools::select::corners;
use crate::tools::{FreehandMode, ToolState};
use crate::viewport::Viewport;
use egui::{Color32, Pos2};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint,
    Rect, Stroke, Transform,
};

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const ERASER_PREVIEW: Color32 = Color32::from_rgba_premultiplied(40, 40, 40, 110);

/// The viewport transform as a tiny-skia transform.
pub fn scene_transform(viewport: &Viewport) -> Transform {
    let offset = viewport.offset();
    Transform::from_row(viewport.scale(), 0.0, 0.0, viewport.scale(), offset.x, offset.y)
}

/// A solid paint for an egui color scaled by `opacity`.
pub fn paint(color: Color32, opacity: f32, anti_alias: bool) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let alpha = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, alpha);
    paint.anti_alias = anti_alias;
    paint
}

fn rect(r: egui::Rect) -> Option<Rect> {
    Rect::from_ltrb(r.min.x, r.min.y, r.max.x, r.max.y)
}

fn stroke_style(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Paint a freehand path. A path that never leaves its first point is a dot.
fn paint_polyline(
    pixmap: &mut Pixmap,
    points: &[Pos2],
    style: &Style,
    anti_alias: bool,
    transform: Transform,
    clip: Option<&Mask>,
) {
    let Some(first) = points.first() else {
        return;
    };
    let width = style.stroke_width;
    let paint = paint(style.stroke, style.opacity, anti_alias);
    if points.iter().all(|p| p == first) {
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, clip);
        }
        return;
    }

    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in &points[1..] {
        builder.line_to(point.x, point.y);
    }
    if let Some(path) = builder.finish() {
        pixmap.stroke_path(&path, &paint, &stroke_style(width), transform, clip);
    }
}

/// Paint a rectangle with its border drawn inside the geometry.
fn paint_rect(
    pixmap: &mut Pixmap,
    area: egui::Rect,
    style: &Style,
    anti_alias: bool,
    transform: Transform,
    clip: Option<&Mask>,
) {
    let Some(outer) = rect(area) else {
        return;
    };
    if let Some(fill) = style.fill {
        pixmap.fill_rect(outer, &paint(fill, style.opacity, anti_alias), transform, clip);
    }

    let width = style.stroke_width;
    if width <= 0.0 {
        return;
    }
    let stroke_paint = paint(style.stroke, style.opacity, anti_alias);
    match rect(area.shrink(width / 2.0)) {
        Some(inner) if inner.width() > 0.0 && inner.height() > 0.0 => {
            let path = PathBuilder::from_rect(inner);
            let stroke = Stroke {
                width,
                line_join: LineJoin::Miter,
                ..Default::default()
            };
            pixmap.stroke_path(&path, &stroke_paint, &stroke, transform, clip);
        }
        // Thinner than the border: the border covers the whole rectangle.
        _ => pixmap.fill_rect(outer, &stroke_paint, transform, clip),
    }
}

/// Paint one shape with `style` in place of its own.
pub fn paint_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    style: &Style,
    anti_alias: bool,
    transform: Transform,
    clip: Option<&Mask>,
) {
    match shape {
        Shape::Stroke(stroke) => paint_polyline(pixmap, &stroke.points, style, anti_alias, transform, clip),
        Shape::Rect(r) => paint_rect(pixmap, r.rect(), style, anti_alias, transform, clip),
    }
}

/// Paint every object in order using its current style.
pub fn paint_scene(
    pixmap: &mut Pixmap,
    scene: &Scene,
    anti_alias: bool,
    transform: Transform,
    clip: Option<&Mask>,
) {
    for obj in scene.objects() {
        paint_shape(pixmap, &obj.shape, &obj.shape.style(), anti_alias, transform, clip);
    }
}

fn outline(pixmap: &mut Pixmap, area: egui::Rect, color: Color32, width: f32) {
    if let Some(r) = rect(area) {
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint(color, 1.0, true), &stroke, Transform::identity(), None);
    }
}

/// Selection boxes, resize handles and the marquee, in screen space.
fn paint_overlay(pixmap: &mut Pixmap, scene: &Scene, viewport: &Viewport, tools: &ToolState, config: &EditorConfig) {
    let to_screen = |r: egui::Rect| {
        egui::Rect::from_two_pos(viewport.screen_from_scene(r.min), viewport.screen_from_scene(r.max))
    };

    let selected: Vec<_> = scene
        .objects()
        .iter()
        .filter(|obj| scene.is_selected(obj.id))
        .collect();
    for obj in &selected {
        outline(pixmap, to_screen(obj.shape.bounds()).expand(1.0), SELECTION_COLOR, 1.0);
    }

    if let [obj] = selected.as_slice() {
        if let Shape::Rect(r) = &obj.shape {
            let half = config.handle_size / 2.0;
            for corner in corners(r.rect()) {
                let center = viewport.screen_from_scene(corner);
                let handle = egui::Rect::from_center_size(center, egui::Vec2::splat(half * 2.0));
                if let Some(h) = rect(handle) {
                    pixmap.fill_rect(h, &paint(Color32::WHITE, 1.0, true), Transform::identity(), None);
                }
                outline(pixmap, handle, SELECTION_COLOR, 1.0);
            }
        }
    }

    if let Some(marquee) = tools.marquee() {
        let area = to_screen(marquee);
        if let Some(r) = rect(area) {
            let fill = Color32::from_rgba_unmultiplied(0, 120, 215, 40);
            pixmap.fill_rect(r, &paint(fill, 1.0, true), Transform::identity(), None);
        }
        outline(pixmap, area, SELECTION_COLOR, 1.0);
    }
}

/// Render the interactive view at the viewport's surface size.
///
/// Returns `None` when there is no surface to draw on.
pub fn render_view(
    scene: &Scene,
    image: Option<&SourceImage>,
    viewport: &Viewport,
    tools: &ToolState,
    config: &EditorConfig,
) -> Option<Pixmap> {
    let size = viewport.size();
    let mut pixmap = Pixmap::new(size.x as u32, size.y as u32)?;
    let [r, g, b, a] = config.canvas_background.to_srgba_unmultiplied();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));

    let Some(image) = image else {
        return Some(pixmap);
    };
    let transform = scene_transform(viewport);
    let image_area = egui::Rect::from_min_size(Pos2::ZERO, image.size());

    if scene.background.image_visible {
        let quality = if viewport.scale() < 1.0 {
            FilterQuality::Bilinear
        } else {
            FilterQuality::Nearest
        };
        let paint = PixmapPaint {
            quality,
            ..Default::default()
        };
        pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
    } else if let Some(area) = rect(image_area) {
        pixmap.fill_rect(area, &paint(scene.background.color, 1.0, false), transform, None);
    }

    let mut clip = Mask::new(pixmap.width(), pixmap.height())?;
    if let Some(area) = rect(image_area) {
        clip.fill_path(&PathBuilder::from_rect(area), FillRule::Winding, false, transform);
    }
    paint_scene(&mut pixmap, scene, true, transform, Some(&clip));

    if let Some(gesture) = tools.freehand_preview() {
        let color = match gesture.mode() {
            FreehandMode::Paint => config.brush_color,
            FreehandMode::Erase => ERASER_PREVIEW,
        };
        let style = Style::stroke(color, gesture.width());
        paint_polyline(&mut pixmap, gesture.points(), &style, true, transform, Some(&clip));
    }

    paint_overlay(&mut pixmap, scene, viewport, tools, config);
    Some(pixmap)
}
