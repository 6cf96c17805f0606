// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate and viewport management.
//!
//! One uniform-scale affine transform maps scene (image-pixel) space onto
//! the screen: `screen = scene * scale + offset`. Every write to the
//! transform goes through the operations here so that rendering and hit
//! testing never drift apart. Object coordinates are never touched.

use egui::{Pos2, Vec2};

/// How the transform is maintained when the surface is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Whole image visible and centered, never upscaled.
    Fit,
    /// One image pixel per screen pixel.
    Native,
    /// Free user zoom and pan.
    Manual,
}

/// Saved transform, returned by [`Viewport::override_identity`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedTransform {
    scale: f32,
    offset: Vec2,
}

/// Scene to screen transform plus the surface size.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
    size: Vec2,
    mode: ViewMode,
    min_zoom: f32,
    max_zoom: f32,
    revision: u64,
}

impl Viewport {
    pub fn new(min_zoom: f32, max_zoom: f32) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            size: Vec2::ZERO,
            mode: ViewMode::Fit,
            min_zoom,
            max_zoom,
            revision: 0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Size of the render surface in screen pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Whether the host attached a surface that can be drawn on.
    pub fn has_surface(&self) -> bool {
        self.size.x >= 1.0 && self.size.y >= 1.0
    }

    /// Bumped on every transform or surface change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub fn screen_from_scene(&self, point: Pos2) -> Pos2 {
        (point.to_vec2() * self.scale + self.offset).to_pos2()
    }

    pub fn scene_from_screen(&self, point: Pos2) -> Pos2 {
        ((point.to_vec2() - self.offset) / self.scale).to_pos2()
    }

    /// Convert a screen distance into scene units.
    pub fn scene_length(&self, screen: f32) -> f32 {
        screen / self.scale
    }

    fn set(&mut self, scale: f32, offset: Vec2, mode: ViewMode) {
        self.scale = scale;
        self.offset = offset;
        self.mode = mode;
        self.revision += 1;
    }

    /// Identity transform, fit mode. Used when a new image is loaded.
    pub fn reset(&mut self) {
        self.set(1.0, Vec2::ZERO, ViewMode::Fit);
    }

    /// Scale the whole image into the surface and center it, never above 1x.
    pub fn fit_to_view(&mut self, image: Vec2) {
        if !self.has_surface() || image.x <= 0.0 || image.y <= 0.0 {
            return;
        }
        let scale = (self.size.x / image.x).min(self.size.y / image.y).min(1.0);
        let offset = (self.size - image * scale) / 2.0;
        self.set(scale, offset, ViewMode::Fit);
    }

    /// Show the image at 1:1, centered on each axis where it is smaller
    /// than the surface and anchored at the top-left otherwise.
    pub fn reset_to_native(&mut self, image: Vec2) {
        let center = |view: f32, img: f32| if img < view { (view - img) / 2.0 } else { 0.0 };
        let offset = Vec2::new(center(self.size.x, image.x), center(self.size.y, image.y));
        self.set(1.0, offset, ViewMode::Native);
    }

    /// Multiply the scale by `factor`, keeping the scene point under `at`
    /// fixed on screen.
    pub fn zoom_at_point(&mut self, at: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.scene_from_screen(at);
        let scale = (self.scale * factor).clamp(self.min_zoom, self.max_zoom);
        let offset = at.to_vec2() - anchor.to_vec2() * scale;
        self.set(scale, offset, ViewMode::Manual);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.set(self.scale, self.offset + delta, ViewMode::Manual);
    }

    /// Record a new surface size and re-apply fit/native policies.
    pub fn resize(&mut self, size: Vec2, image: Option<Vec2>) {
        self.size = size;
        self.revision += 1;
        match (self.mode, image) {
            (ViewMode::Fit, Some(image)) => self.fit_to_view(image),
            (ViewMode::Native, Some(image)) => self.reset_to_native(image),
            _ => {}
        }
    }

    /// Temporarily force the identity transform, keeping the mode.
    pub fn override_identity(&mut self) -> SavedTransform {
        let saved = SavedTransform {
            scale: self.scale,
            offset: self.offset,
        };
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
        saved
    }

    /// Put back a transform taken by [`Viewport::override_identity`].
    pub fn restore(&mut self, saved: SavedTransform) {
        self.scale = saved.scale;
        self.offset = saved.offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn viewport(w: f32, h: f32) -> Viewport {
        let mut vp = Viewport::new(0.05, 32.0);
        vp.resize(vec2(w, h), None);
        vp
    }

    fn assert_close(a: Pos2, b: Pos2) {
        assert!((a - b).length() < 1e-3, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_fit_downscales_and_centers() {
        let mut vp = viewport(800.0, 600.0);
        vp.fit_to_view(vec2(1600.0, 800.0));
        assert_eq!(vp.scale(), 0.5);
        assert_eq!(vp.offset(), vec2(0.0, 100.0));
        assert_eq!(vp.mode(), ViewMode::Fit);
    }

    #[test]
    fn test_fit_never_upscales() {
        let mut vp = viewport(800.0, 600.0);
        vp.fit_to_view(vec2(100.0, 100.0));
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), vec2(350.0, 250.0));
    }

    #[test]
    fn test_native_anchors_large_images() {
        let mut vp = viewport(800.0, 600.0);
        vp.reset_to_native(vec2(2000.0, 300.0));
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), vec2(0.0, 150.0));
        assert_eq!(vp.mode(), ViewMode::Native);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let mut vp = viewport(800.0, 600.0);
        vp.fit_to_view(vec2(1600.0, 1200.0));
        let cursor = pos2(300.0, 200.0);
        let before = vp.scene_from_screen(cursor);
        vp.zoom_at_point(cursor, 3.0);
        assert_close(vp.scene_from_screen(cursor), before);
        assert_eq!(vp.mode(), ViewMode::Manual);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = viewport(800.0, 600.0);
        vp.zoom_at_point(pos2(0.0, 0.0), 1000.0);
        assert_eq!(vp.scale(), 32.0);
        vp.zoom_at_point(pos2(0.0, 0.0), 1e-6);
        assert_eq!(vp.scale(), 0.05);
    }

    #[test]
    fn test_roundtrip_in_every_mode() {
        let mut vp = viewport(640.0, 480.0);
        let image = vec2(1024.0, 768.0);
        let points = [pos2(0.0, 0.0), pos2(17.25, 900.5), pos2(1024.0, 768.0)];

        let check = |vp: &Viewport| {
            for p in points {
                assert_close(vp.scene_from_screen(vp.screen_from_scene(p)), p);
            }
        };

        vp.fit_to_view(image);
        check(&vp);
        vp.reset_to_native(image);
        check(&vp);
        vp.zoom_at_point(pos2(123.0, 45.0), 2.7);
        vp.pan_by(vec2(-33.0, 12.5));
        check(&vp);
    }

    #[test]
    fn test_resize_refits_only_in_fit_mode() {
        let image = vec2(1000.0, 1000.0);
        let mut vp = viewport(500.0, 500.0);
        vp.fit_to_view(image);
        vp.resize(vec2(250.0, 250.0), Some(image));
        assert_eq!(vp.scale(), 0.25);

        vp.pan_by(vec2(10.0, 10.0));
        let before = (vp.scale(), vp.offset());
        vp.resize(vec2(900.0, 900.0), Some(image));
        assert_eq!((vp.scale(), vp.offset()), before);
    }

    #[test]
    fn test_override_identity_restores() {
        let mut vp = viewport(500.0, 500.0);
        vp.zoom_at_point(pos2(100.0, 100.0), 2.0);
        let saved = vp.override_identity();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), Vec2::ZERO);
        vp.restore(saved);
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.mode(), ViewMode::Manual);
    }
}
