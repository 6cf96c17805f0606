// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Freehand gestures for the brush and the eraser.
//!
//! Both record the same pointer path. The brush keeps it as a stroke; the
//! eraser only uses it as a hit-test shape and is never added to the scene.

use super::{Edit, ToolContext};
use crate::models::{Shape, StrokeShape, Style};
use egui::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreehandMode {
    Paint,
    Erase,
}

/// A path being dragged out by the pointer.
#[derive(Debug, Clone)]
pub struct FreehandGesture {
    points: Vec<Pos2>,
    width: f32,
    mode: FreehandMode,
}

impl FreehandGesture {
    pub fn begin(point: Pos2, width: f32, mode: FreehandMode) -> Self {
        Self {
            points: vec![point],
            width,
            mode,
        }
    }

    /// Record `point` if it is at least `spacing` away from the last one.
    pub fn extend(&mut self, point: Pos2, spacing: f32) -> bool {
        match self.points.last() {
            Some(last) if last.distance(point) < spacing => false,
            _ => {
                self.points.push(point);
                true
            }
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mode(&self) -> FreehandMode {
        self.mode
    }

    /// Complete the gesture: add the stroke, or erase what it touches.
    pub fn finish(self, ctx: &mut ToolContext<'_>) -> Edit {
        match self.mode {
            FreehandMode::Paint => {
                let style = Style::stroke(ctx.config.brush_color, self.width);
                ctx.scene
                    .add(Shape::Stroke(StrokeShape::new(self.points, style)), false);
                log::debug!("Added stroke, total objects: {}", ctx.scene.len());
            }
            FreehandMode::Erase => {
                let removed = ctx
                    .scene
                    .remove_where(|obj| obj.shape.intersects_path(&self.points, self.width));
                log::debug!("Eraser removed {} objects", removed);
            }
        }
        Edit::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::models::{RectShape, Scene};
    use crate::regions::RegionSync;
    use egui::{pos2, vec2, Color32, Rect};

    #[test]
    fn test_extend_respects_spacing() {
        let mut gesture = FreehandGesture::begin(pos2(0.0, 0.0), 10.0, FreehandMode::Paint);
        assert!(!gesture.extend(pos2(1.0, 0.0), 2.0));
        assert!(gesture.extend(pos2(3.0, 0.0), 2.0));
        assert_eq!(gesture.points().len(), 2);
    }

    #[test]
    fn test_paint_adds_stroke_with_brush_color() {
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
        let mut gesture = FreehandGesture::begin(pos2(10.0, 10.0), 12.0, FreehandMode::Paint);
        gesture.extend(pos2(40.0, 10.0), 2.0);
        assert_eq!(gesture.finish(&mut ctx), Edit::Committed);

        let Shape::Stroke(stroke) = &scene.objects()[0].shape else {
            panic!("expected a stroke");
        };
        assert_eq!(stroke.style.stroke, config.brush_color);
        assert_eq!(stroke.width(), 12.0);
    }

    #[test]
    fn test_erase_removes_touched_and_is_not_kept() {
        let config = EditorConfig::default();
        let mut scene = Scene::new(Color32::GRAY);
        scene.add(
            Shape::Rect(RectShape::new(
                Rect::from_min_size(pos2(10.0, 10.0), vec2(20.0, 20.0)),
                Style::filled(Color32::RED, Color32::RED, 2.0),
                Some(1),
            )),
            false,
        );
        scene.add(
            Shape::Stroke(StrokeShape::new(
                vec![pos2(70.0, 70.0), pos2(90.0, 90.0)],
                Style::stroke(Color32::RED, 4.0),
            )),
            false,
        );
        let mut regions = RegionSync::default();
        let mut ctx = ToolContext {
            scene: &mut scene,
            regions: &mut regions,
            config: &config,
            image: vec2(100.0, 100.0),
            pixel: 1.0,
        };
        let mut gesture = FreehandGesture::begin(pos2(0.0, 20.0), 6.0, FreehandMode::Erase);
        gesture.extend(pos2(50.0, 20.0), 2.0);
        assert_eq!(gesture.finish(&mut ctx), Edit::Committed);

        assert_eq!(scene.len(), 1);
        assert!(matches!(scene.objects()[0].shape, Shape::Stroke(_)));
    }
}
