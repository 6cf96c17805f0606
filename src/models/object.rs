// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene object data structures.
//!
//! Strokes and rectangles drawn over the image. Geometry is always stored
//! in image-pixel scene coordinates, independent of pan and zoom. The
//! serialized form of a [`Shape`] is what history snapshots hold.

use crate::util::geometry::{
    point_segment_distance, points_bounds, polyline_segments, segment_rect_distance,
    segment_segment_distance,
};
use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Stable identifier of a rectangle region. Assigned once, never reused.
pub type RegionId = u32;

/// Identity of an object inside one scene. Not part of snapshots.
pub type ObjectId = u64;

/// Paint attributes shared by all shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Interior color; strokes have none.
    pub fill: Option<Color32>,
    pub stroke: Color32,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl Style {
    pub fn stroke(color: Color32, width: f32) -> Self {
        Self {
            fill: None,
            stroke: color,
            stroke_width: width,
            opacity: 1.0,
        }
    }

    pub fn filled(fill: Color32, stroke: Color32, stroke_width: f32) -> Self {
        Self {
            fill: Some(fill),
            stroke,
            stroke_width,
            opacity: 1.0,
        }
    }
}

/// A freehand path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeShape {
    pub points: Vec<Pos2>,
    pub style: Style,
}

impl StrokeShape {
    pub fn new(points: Vec<Pos2>, style: Style) -> Self {
        Self { points, style }
    }

    pub fn width(&self) -> f32 {
        self.style.stroke_width
    }

    /// Whether the painted area of this stroke meets the painted area of
    /// the swept path `points` with the given `width`.
    pub fn touches_path(&self, points: &[Pos2], width: f32) -> bool {
        let reach = (self.width() + width) / 2.0;
        polyline_segments(&self.points).any(|(a1, a2)| {
            polyline_segments(points).any(|(b1, b2)| segment_segment_distance(a1, a2, b1, b2) <= reach)
        })
    }
}

/// An axis-aligned rectangle region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
}

impl RectShape {
    pub fn new(rect: Rect, style: Style, region_id: Option<RegionId>) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
            style,
            region_id,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.min.x;
        self.y = rect.min.y;
        self.width = rect.width();
        self.height = rect.height();
    }
}

/// The drawable variants of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Stroke(StrokeShape),
    Rect(RectShape),
}

impl Shape {
    /// Area covered when painted. Rectangle strokes are inner-aligned, so a
    /// rectangle covers exactly its geometry.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Stroke(stroke) => points_bounds(&stroke.points)
                .map(|r| r.expand(stroke.width() / 2.0))
                .unwrap_or(Rect::NOTHING),
            Shape::Rect(rect) => rect.rect(),
        }
    }

    pub fn style(&self) -> Style {
        match self {
            Shape::Stroke(stroke) => stroke.style,
            Shape::Rect(rect) => rect.style,
        }
    }

    pub fn apply_style(&mut self, style: Style) {
        match self {
            Shape::Stroke(stroke) => stroke.style = style,
            Shape::Rect(rect) => rect.style = style,
        }
    }

    /// The style used when rasterizing the mask: opaque white.
    pub fn mask_style(&self) -> Style {
        let style = self.style();
        match self {
            Shape::Stroke(_) => Style {
                fill: None,
                stroke: Color32::WHITE,
                stroke_width: style.stroke_width,
                opacity: 1.0,
            },
            Shape::Rect(_) => Style {
                fill: Some(Color32::WHITE),
                stroke: Color32::WHITE,
                stroke_width: style.stroke_width,
                opacity: 1.0,
            },
        }
    }

    pub fn to_snapshot(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn from_snapshot(value: &serde_json::Value) -> serde_json::Result<Self> {
        Shape::deserialize(value)
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Stroke(stroke) => {
                for point in &mut stroke.points {
                    *point += delta;
                }
            }
            Shape::Rect(rect) => {
                rect.x += delta.x;
                rect.y += delta.y;
            }
        }
    }

    /// Whether `point` lies on the painted area, with `tolerance` slack.
    pub fn contains(&self, point: Pos2, tolerance: f32) -> bool {
        match self {
            Shape::Stroke(stroke) => {
                let reach = stroke.width() / 2.0 + tolerance;
                polyline_segments(&stroke.points).any(|(a, b)| point_segment_distance(point, a, b) <= reach)
            }
            Shape::Rect(rect) => rect.rect().expand(tolerance).contains(point),
        }
    }

    /// Whether the eraser path (`points`, `width`) touches this shape.
    pub fn intersects_path(&self, points: &[Pos2], width: f32) -> bool {
        let Some(path_bounds) = points_bounds(points) else {
            return false;
        };
        if !self.bounds().intersects(path_bounds.expand(width / 2.0)) {
            return false;
        }
        match self {
            Shape::Stroke(stroke) => stroke.touches_path(points, width),
            Shape::Rect(rect) => {
                let area = rect.rect();
                polyline_segments(points).any(|(a, b)| segment_rect_distance(a, b, area) <= width / 2.0)
            }
        }
    }

    pub fn region_id(&self) -> Option<RegionId> {
        match self {
            Shape::Rect(rect) => rect.region_id,
            Shape::Stroke(_) => None,
        }
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, Shape::Rect(_))
    }
}

/// A shape placed in the scene plus its presentation flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Shape,
    /// Selectable and draggable. Only true while the select tool is active.
    pub interactive: bool,
}
