// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Rectangle region tool.
//!
//! Pointer-down anchors a zero-size provisional rectangle with a fresh
//! region ID, moves span it to the pointer (clamped to the image, square
//! with shift), and release keeps it only if both sides reach the minimum
//! size.

use super::{Edit, ToolContext};
use crate::models::{ObjectId, RectShape, Shape, Style};
use crate::util::geometry::clamp_to_image;
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Bounds of the rectangle being drawn, for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectInfo {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectInfo {
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// `x,y,w,h` rounded to whole pixels, for the clipboard.
    pub fn to_clipboard_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round()
        )
    }
}

/// Span `anchor` to `point` inside an image of `image` size.
///
/// With `square`, the side is the larger of the two extents, grown from the
/// anchor in the drag direction and shrunk so the square stays inside.
pub fn drag_rect(anchor: Pos2, point: Pos2, image: Vec2, square: bool) -> Rect {
    let point = clamp_to_image(point, image);
    let mut delta = point - anchor;
    if square {
        let room_x = if delta.x < 0.0 { anchor.x } else { image.x - anchor.x };
        let room_y = if delta.y < 0.0 { anchor.y } else { image.y - anchor.y };
        let side = delta.x.abs().max(delta.y.abs()).min(room_x).min(room_y);
        delta = Vec2::new(side.copysign(delta.x), side.copysign(delta.y));
    }
    Rect::from_two_pos(anchor, anchor + delta)
}

/// An in-progress rectangle drag.
#[derive(Debug, Clone)]
pub struct RectDrag {
    anchor: Pos2,
    object: ObjectId,
}

impl RectDrag {
    /// Add the provisional rectangle at the clamped `point`.
    pub fn begin(ctx: &mut ToolContext<'_>, point: Pos2) -> (Self, RectInfo) {
        let anchor = clamp_to_image(point, ctx.image);
        let region_id = ctx.regions.allocate();
        let style = Style::filled(
            ctx.config.rect_fill,
            ctx.config.rect_stroke,
            ctx.config.rect_stroke_width,
        );
        let rect = Rect::from_min_size(anchor, Vec2::ZERO);
        let object = ctx
            .scene
            .add(Shape::Rect(RectShape::new(rect, style, Some(region_id))), false);
        (Self { anchor, object }, RectInfo::from_rect(rect))
    }

    /// Resize to span the anchor and `point`.
    pub fn update(&self, ctx: &mut ToolContext<'_>, point: Pos2, square: bool) -> Option<RectInfo> {
        let rect = drag_rect(self.anchor, point, ctx.image, square);
        let obj = ctx.scene.get_mut(self.object)?;
        let Shape::Rect(shape) = &mut obj.shape else {
            return None;
        };
        shape.set_rect(rect);
        Some(RectInfo::from_rect(rect))
    }

    /// Keep the rectangle if it is large enough, otherwise discard it.
    pub fn finish(self, ctx: &mut ToolContext<'_>) -> (Edit, Option<RectInfo>) {
        let rect = match ctx.scene.get(self.object).map(|obj| &obj.shape) {
            Some(Shape::Rect(shape)) => shape.rect(),
            _ => return (Edit::Changed, None),
        };
        let min = ctx.config.min_rect_size;
        if rect.width() < min || rect.height() < min {
            ctx.scene.remove(self.object);
            log::debug!("Discarded {}x{} rectangle", rect.width(), rect.height());
            return (Edit::Changed, None);
        }
        log::debug!("Added rectangle {:?}", rect);
        (Edit::Committed, Some(RectInfo::from_rect(rect)))
    }

    /// Drop the provisional rectangle.
    pub fn cancel(self, ctx: &mut ToolContext<'_>) -> Edit {
        ctx.scene.remove(self.object);
        Edit::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::models::Scene;
    use crate::regions::RegionSync;
    use egui::{pos2, vec2, Color32};

    #[test]
    fn test_drag_rect_normalizes_and_clamps() {
        let image = vec2(100.0, 100.0);
        let rect = drag_rect(pos2(50.0, 50.0), pos2(20.0, 130.0), image, false);
        assert_eq!(rect.min, pos2(20.0, 50.0));
        assert_eq!(rect.max, pos2(50.0, 100.0));
    }

    #[test]
    fn test_drag_rect_square_grows_from_anchor() {
        let image = vec2(100.0, 100.0);
        let rect = drag_rect(pos2(50.0, 50.0), pos2(40.0, 20.0), image, true);
        assert_eq!(rect.min, pos2(20.0, 20.0));
        assert_eq!(rect.max, pos2(50.0, 50.0));
    }

    #[test]
    fn test_drag_rect_square_stays_inside_image() {
        let image = vec2(100.0, 100.0);
        let rect = drag_rect(pos2(80.0, 10.0), pos2(100.0, 60.0), image, true);
        assert_eq!(rect.width(), 20.0);
        assert_eq!(rect.height(), 20.0);
        assert_eq!(rect.max, pos2(100.0, 30.0));
    }

    #[test]
    fn test_small_rectangle_is_discarded() {
        let config = EditorConfig::default();
        let mut scene = Scene::new(Color32::GRAY);
        let mut regions = RegionSync::default();
        let mut ctx = ToolContext {
            scene: &mut scene,
            regions: &mut regions,
            config: &config,
            image: vec2(100.0, 100.0),
            pixel: 1.0,
        };
        let (drag, info) = RectDrag::begin(&mut ctx, pos2(10.0, 10.0));
        assert_eq!(info.width, 0.0);
        drag.update(&mut ctx, pos2(40.0, 10.5), false);
        let (edit, info) = drag.finish(&mut ctx);
        assert_eq!(edit, Edit::Changed);
        assert!(info.is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_rect_info_clipboard_format() {
        let info = RectInfo {
            x: 10.4,
            y: 9.6,
            width: 100.0,
            height: 0.5,
        };
        assert_eq!(info.to_clipboard_string(), "10,10,100,1");
    }
}
