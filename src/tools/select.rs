// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Select tool: click, shift-toggle, marquee, move and corner resize.

use super::{Edit, ToolContext};
use crate::models::{ObjectId, Shape};
use egui::{Pos2, Rect, Vec2};

/// What a pointer drag with the select tool is doing.
#[derive(Debug, Clone)]
pub enum SelectGesture {
    /// Dragging the selected objects.
    Move { last: Pos2, moved: bool },
    /// Dragging one corner of a single selected rectangle.
    Resize { id: ObjectId, anchor: Pos2, original: Rect },
    /// Rubber-band selection over empty space.
    Marquee { start: Pos2, current: Pos2 },
}

/// The four corners, in the order used for handle hit testing.
pub fn corners(rect: Rect) -> [Pos2; 4] {
    [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
}

/// Span `anchor` to `point` on one axis, at least `min` long.
fn span(anchor: f32, point: f32, min: f32) -> (f32, f32) {
    if point >= anchor {
        (anchor, point.max(anchor + min))
    } else {
        (point.min(anchor - min), anchor)
    }
}

/// The rectangle whose resize handle is under `point`, with the opposite
/// corner as the anchor.
fn handle_at(ctx: &ToolContext<'_>, point: Pos2, slack: f32) -> Option<(ObjectId, Pos2, Rect)> {
    let selection = ctx.scene.selection();
    if selection.len() != 1 {
        return None;
    }
    let id = *selection.iter().next()?;
    let Shape::Rect(shape) = &ctx.scene.get(id)?.shape else {
        return None;
    };
    let rect = shape.rect();
    let points = corners(rect);
    let hit = points.iter().position(|c| c.distance(point) <= slack)?;
    Some((id, points[(hit + 2) % 4], rect))
}

impl SelectGesture {
    /// Start a select gesture at `point`. Returns `None` when the press only
    /// changed the selection.
    pub fn begin(ctx: &mut ToolContext<'_>, point: Pos2, shift: bool) -> Option<Self> {
        let slack = ctx.pixel * ctx.config.handle_size / 2.0;
        if !shift {
            if let Some((id, anchor, original)) = handle_at(ctx, point, slack) {
                return Some(SelectGesture::Resize { id, anchor, original });
            }
        }

        match ctx.scene.topmost_at(point, slack) {
            Some(id) => {
                if shift {
                    ctx.scene.toggle_selected(id);
                } else if !ctx.scene.is_selected(id) {
                    ctx.scene.select_only(id);
                }
                ctx.scene.is_selected(id).then_some(SelectGesture::Move {
                    last: point,
                    moved: false,
                })
            }
            None => {
                if !shift {
                    ctx.scene.deselect_all();
                }
                Some(SelectGesture::Marquee {
                    start: point,
                    current: point,
                })
            }
        }
    }

    pub fn update(&mut self, ctx: &mut ToolContext<'_>, point: Pos2) -> Edit {
        match self {
            SelectGesture::Move { last, moved } => {
                let delta = point - *last;
                *last = point;
                if delta == Vec2::ZERO {
                    return Edit::None;
                }
                let selected: Vec<ObjectId> = ctx.scene.selection().iter().copied().collect();
                for id in selected {
                    if let Some(obj) = ctx.scene.get_mut(id) {
                        obj.shape.translate(delta);
                    }
                }
                *moved = true;
                Edit::Changed
            }
            SelectGesture::Resize { id, anchor, .. } => {
                let min = ctx.config.min_rect_size;
                let (x0, x1) = span(anchor.x, point.x, min);
                let (y0, y1) = span(anchor.y, point.y, min);
                let rect = Rect::from_min_max(Pos2::new(x0, y0), Pos2::new(x1, y1));
                match ctx.scene.get_mut(*id).map(|obj| &mut obj.shape) {
                    Some(Shape::Rect(shape)) => {
                        shape.set_rect(rect);
                        Edit::Changed
                    }
                    _ => Edit::None,
                }
            }
            SelectGesture::Marquee { current, .. } => {
                *current = point;
                Edit::None
            }
        }
    }

    pub fn finish(self, ctx: &mut ToolContext<'_>) -> Edit {
        match self {
            SelectGesture::Move { moved, .. } => {
                if moved {
                    Edit::Committed
                } else {
                    Edit::None
                }
            }
            SelectGesture::Resize { id, original, .. } => match ctx.scene.get(id).map(|obj| &obj.shape) {
                Some(Shape::Rect(shape)) if shape.rect() != original => Edit::Committed,
                _ => Edit::None,
            },
            SelectGesture::Marquee { start, current } => {
                let area = Rect::from_two_pos(start, current);
                let slack = ctx.pixel * ctx.config.handle_size / 2.0;
                if area.width() < slack && area.height() < slack {
                    return Edit::None;
                }
                let hits: Vec<ObjectId> = ctx
                    .scene
                    .objects()
                    .iter()
                    .filter(|obj| obj.interactive && obj.shape.bounds().intersects(area))
                    .map(|obj| obj.id)
                    .collect();
                log::debug!("Marquee selected {} objects", hits.len());
                for id in hits {
                    ctx.scene.select(id);
                }
                Edit::None
            }
        }
    }

    /// The marquee area, if this is a marquee gesture.
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            SelectGesture::Marquee { start, current } => Some(Rect::from_two_pos(*start, *current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::models::{RectShape, Scene, StrokeShape, Style};
    use crate::regions::RegionSync;
    use egui::{pos2, vec2, Color32};

    fn scene_with_rect() -> (Scene, ObjectId) {
        let mut scene = Scene::new(Color32::GRAY);
        let id = scene.add(
            Shape::Rect(RectShape::new(
                Rect::from_min_size(pos2(10.0, 10.0), vec2(40.0, 40.0)),
                Style::filled(Color32::RED, Color32::RED, 2.0),
                Some(1),
            )),
            true,
        );
        (scene, id)
    }

    fn context<'a>(scene: &'a mut Scene, regions: &'a mut RegionSync, config: &'a EditorConfig) -> ToolContext<'a> {
        ToolContext {
            scene,
            regions,
            config,
            image: vec2(200.0, 200.0),
            pixel: 1.0,
        }
    }

    #[test]
    fn test_click_selects_and_drag_moves() {
        let (mut scene, id) = scene_with_rect();
        let mut regions = RegionSync::default();
        let config = EditorConfig::default();
        let mut ctx = context(&mut scene, &mut regions, &config);

        let mut gesture = SelectGesture::begin(&mut ctx, pos2(30.0, 30.0), false).unwrap();
        assert!(ctx.scene.is_selected(id));
        assert_eq!(gesture.update(&mut ctx, pos2(35.0, 40.0)), Edit::Changed);
        assert_eq!(gesture.finish(&mut ctx), Edit::Committed);
        assert_eq!(scene.get(id).unwrap().shape.bounds().min, pos2(15.0, 20.0));
    }

    #[test]
    fn test_click_without_drag_does_not_commit() {
        let (mut scene, _) = scene_with_rect();
        let mut regions = RegionSync::default();
        let config = EditorConfig::default();
        let mut ctx = context(&mut scene, &mut regions, &config);
        let gesture = SelectGesture::begin(&mut ctx, pos2(30.0, 30.0), false).unwrap();
        assert_eq!(gesture.finish(&mut ctx), Edit::None);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut scene, id) = scene_with_rect();
        scene.select(id);
        let mut regions = RegionSync::default();
        let config = EditorConfig::default();
        let mut ctx = context(&mut scene, &mut regions, &config);
        assert!(SelectGesture::begin(&mut ctx, pos2(30.0, 30.0), true).is_none());
        assert!(!scene.is_selected(id));
    }

    #[test]
    fn test_corner_handle_resizes_with_minimum() {
        let (mut scene, id) = scene_with_rect();
        scene.select(id);
        let mut regions = RegionSync::default();
        let config = EditorConfig::default();
        let mut ctx = context(&mut scene, &mut regions, &config);

        let mut gesture = SelectGesture::begin(&mut ctx, pos2(50.0, 50.0), false).unwrap();
        assert!(matches!(gesture, SelectGesture::Resize { .. }));
        gesture.update(&mut ctx, pos2(10.0, 80.0));
        assert_eq!(gesture.finish(&mut ctx), Edit::Committed);

        let bounds = scene.get(id).unwrap().shape.bounds();
        assert_eq!(bounds.min, pos2(10.0, 10.0));
        assert_eq!(bounds.width(), 1.0);
        assert_eq!(bounds.height(), 70.0);
    }

    #[test]
    fn test_marquee_selects_intersecting() {
        let (mut scene, rect) = scene_with_rect();
        let stroke = scene.add(
            Shape::Stroke(StrokeShape::new(
                vec![pos2(150.0, 150.0), pos2(180.0, 150.0)],
                Style::stroke(Color32::RED, 4.0),
            )),
            true,
        );
        let mut regions = RegionSync::default();
        let config = EditorConfig::default();
        let mut ctx = context(&mut scene, &mut regions, &config);

        let mut gesture = SelectGesture::begin(&mut ctx, pos2(100.0, 5.0), false).unwrap();
        gesture.update(&mut ctx, pos2(40.0, 45.0));
        assert!(gesture.marquee().is_some());
        assert_eq!(gesture.finish(&mut ctx), Edit::None);
        assert!(scene.is_selected(rect));
        assert!(!scene.is_selected(stroke));
    }
}
