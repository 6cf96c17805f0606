// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Tunables that are implementation choices rather than fixed behavior:
//! zoom bounds, history depth, default brush and rectangle styling.
//! Loaded from YAML or JSON through [`crate::io::serialization`].

use crate::error::{EditorError, Result};
use egui::Color32;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::MaskEditor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest allowed view scale.
    pub min_zoom: f32,
    /// Largest allowed view scale.
    pub max_zoom: f32,
    /// Number of history entries retained, including the initial empty one.
    pub history_depth: usize,
    /// Wheel zoom factor is `wheel_zoom_base ^ (-delta_y)`.
    pub wheel_zoom_base: f32,
    /// Initial brush and eraser width in image pixels.
    pub brush_width: f32,
    /// Inclusive range offered for the brush width.
    pub brush_width_range: (f32, f32),
    pub brush_color: Color32,
    pub rect_fill: Color32,
    pub rect_stroke: Color32,
    pub rect_stroke_width: f32,
    /// Color behind the image in the interactive view.
    pub canvas_background: Color32,
    /// Rectangles narrower or shorter than this are discarded on release.
    pub min_rect_size: f32,
    /// Selection handle size in screen pixels.
    pub handle_size: f32,
    /// Minimum screen distance between recorded freehand points.
    pub point_spacing: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.05,
            max_zoom: 32.0,
            history_depth: 80,
            wheel_zoom_base: 1.0015,
            brush_width: 30.0,
            brush_width_range: (5.0, 100.0),
            brush_color: Color32::from_rgba_unmultiplied(255, 0, 0, 128),
            rect_fill: Color32::from_rgba_unmultiplied(255, 0, 0, 77),
            rect_stroke: Color32::from_rgba_unmultiplied(255, 0, 0, 204),
            rect_stroke_width: 2.0,
            canvas_background: Color32::from_rgb(0xF2, 0xF2, 0xF7),
            min_rect_size: 1.0,
            handle_size: 8.0,
            point_spacing: 2.0,
        }
    }
}

impl EditorConfig {
    /// Check that the values can drive an editor.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(EditorError::Config(format!(
                "zoom bounds [{}, {}] are not a positive range",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.history_depth < 1 {
            return Err(EditorError::Config("history_depth must be at least 1".into()));
        }
        if self.wheel_zoom_base <= 0.0 {
            return Err(EditorError::Config("wheel_zoom_base must be positive".into()));
        }
        let (lo, hi) = self.brush_width_range;
        if !(lo > 0.0 && lo <= hi) {
            return Err(EditorError::Config(format!(
                "brush width range ({lo}, {hi}) is invalid"
            )));
        }
        Ok(())
    }

    /// Clamp a requested brush width into the configured range.
    pub fn clamp_brush_width(&self, width: f32) -> f32 {
        let (lo, hi) = self.brush_width_range;
        width.clamp(lo, hi)
    }
}
