// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! Clamping to image bounds and the distance queries used by the eraser
//! and the select tool. Everything here works in scene (image-pixel)
//! coordinates.

use egui::{Pos2, Rect, Vec2};

/// Clamp a scene point into the image rectangle `[0, size.x] x [0, size.y]`.
pub fn clamp_to_image(point: Pos2, size: Vec2) -> Pos2 {
    Pos2::new(point.x.clamp(0.0, size.x), point.y.clamp(0.0, size.y))
}

/// Intersect a rectangle with the image rectangle.
///
/// The result always lies inside the image; a rectangle entirely outside
/// collapses to zero width or height on the nearest edge.
pub fn clamp_rect_to_image(rect: Rect, size: Vec2) -> Rect {
    let min = clamp_to_image(rect.min, size);
    let max = clamp_to_image(rect.max, size);
    Rect::from_min_max(min, max.max(min))
}

/// Distance from a point to the segment `a`-`b`.
pub fn point_segment_distance(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < 1e-6 {
        // Degenerate segment
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Whether the segments `a1`-`a2` and `b1`-`b2` cross or touch.
pub fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    let d1 = cross(a2 - a1, b1 - a1);
    let d2 = cross(a2 - a1, b2 - a1);
    let d3 = cross(b2 - b1, a1 - b1);
    let d4 = cross(b2 - b1, a2 - b1);
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}

/// Shortest distance between two segments.
pub fn segment_segment_distance(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> f32 {
    if segments_intersect(a1, a2, b1, b2) {
        return 0.0;
    }
    point_segment_distance(a1, b1, b2)
        .min(point_segment_distance(a2, b1, b2))
        .min(point_segment_distance(b1, a1, a2))
        .min(point_segment_distance(b2, a1, a2))
}

/// Shortest distance from a segment to a filled rectangle (0 when inside).
pub fn segment_rect_distance(a: Pos2, b: Pos2, rect: Rect) -> f32 {
    if rect.contains(a) || rect.contains(b) {
        return 0.0;
    }
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    (0..4)
        .map(|i| segment_segment_distance(a, b, corners[i], corners[(i + 1) % 4]))
        .fold(f32::INFINITY, f32::min)
}

/// Iterate over the segments of a polyline; a single point yields one
/// zero-length segment.
pub fn polyline_segments(points: &[Pos2]) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
    let single = (points.len() == 1).then(|| (points[0], points[0]));
    points
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(single)
}

/// Bounding box of a point set, or `None` when empty.
pub fn points_bounds(points: &[Pos2]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_min_max(first, first), |r, p| r.union(Rect::from_min_max(*p, *p))),
    )
}
