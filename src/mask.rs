// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Binary mask export.
//!
//! The scene is temporarily restyled (objects white, background black, no
//! bitmap, no selection, identity transform), rasterized at the image's
//! native size and thresholded to a bi-level gray image. The temporary
//! state lives in an [`ExportGuard`] whose `Drop` puts everything back,
//! whether rasterization succeeded or not.

use crate::error::{EditorError, Result};
use crate::models::{Background, ObjectId, Scene, Style};
use crate::render;
use crate::viewport::{SavedTransform, Viewport};
use egui::Color32;
use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use tiny_skia::Pixmap;

/// A rasterized mask: 255 where an object covers the pixel, 0 elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskImage {
    image: GrayImage,
}

impl MaskImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_white(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel_checked(x, y).is_some_and(|p| p.0[0] == 255)
    }

    /// Number of white pixels.
    pub fn coverage(&self) -> usize {
        self.image.pixels().filter(|p| p.0[0] == 255).count()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    /// Lossless PNG encoding of the mask.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| EditorError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

/// Scene and viewport in export state until dropped.
pub struct ExportGuard<'a> {
    scene: &'a mut Scene,
    viewport: &'a mut Viewport,
    background: Background,
    styles: Vec<(ObjectId, Style)>,
    transform: SavedTransform,
}

impl<'a> ExportGuard<'a> {
    pub fn new(scene: &'a mut Scene, viewport: &'a mut Viewport) -> Self {
        let background = scene.background;
        scene.background = Background {
            image_visible: false,
            color: Color32::BLACK,
        };

        let mut styles = Vec::with_capacity(scene.len());
        for obj in scene.objects_mut() {
            styles.push((obj.id, obj.shape.style()));
            let mask_style = obj.shape.mask_style();
            obj.shape.apply_style(mask_style);
        }
        scene.deselect_all();
        let transform = viewport.override_identity();

        Self {
            scene,
            viewport,
            background,
            styles,
            transform,
        }
    }

    /// Paint the restyled scene into a `width` x `height` gray mask.
    pub fn rasterize(&self, width: u32, height: u32) -> Result<MaskImage> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| EditorError::Encode(format!("cannot rasterize a {width}x{height} mask")))?;
        let [r, g, b, a] = self.scene.background.color.to_srgba_unmultiplied();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        let transform = render::scene_transform(&*self.viewport);
        render::paint_scene(&mut pixmap, &*self.scene, false, transform, None);

        let mut image = GrayImage::new(width, height);
        for (pixel, out) in pixmap.pixels().iter().zip(image.pixels_mut()) {
            *out = Luma([if pixel.red() >= 128 { 255 } else { 0 }]);
        }
        Ok(MaskImage { image })
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.viewport.restore(self.transform);
        for (id, style) in self.styles.drain(..) {
            if let Some(obj) = self.scene.get_mut(id) {
                obj.shape.apply_style(style);
            }
        }
        self.scene.background = self.background;
    }
}

/// Rasterize `scene` as a mask of the given image size.
pub fn export(scene: &mut Scene, viewport: &mut Viewport, width: u32, height: u32) -> Result<MaskImage> {
    let guard = ExportGuard::new(scene, viewport);
    let mask = guard.rasterize(width, height)?;
    log::info!("Exported {}x{} mask, {} pixels set", width, height, mask.coverage());
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RectShape, Shape, StrokeShape};
    use egui::{pos2, vec2, Rect};

    fn scene() -> Scene {
        let mut scene = Scene::new(Color32::GRAY);
        scene.add(
            Shape::Rect(RectShape::new(
                Rect::from_min_size(pos2(10.0, 10.0), vec2(50.0, 50.0)),
                Style::filled(Color32::from_rgba_unmultiplied(255, 0, 0, 77), Color32::RED, 2.0),
                Some(1),
            )),
            true,
        );
        scene
    }

    #[test]
    fn test_rect_mask_is_exact() {
        let mut scene = scene();
        let mut viewport = Viewport::new(0.05, 32.0);
        let mask = export(&mut scene, &mut viewport, 100, 100).unwrap();
        assert_eq!((mask.width(), mask.height()), (100, 100));
        assert_eq!(mask.coverage(), 2500);
        assert!(mask.is_white(10, 10));
        assert!(mask.is_white(59, 59));
        assert!(!mask.is_white(60, 59));
        assert!(!mask.is_white(9, 10));
        assert!(mask.as_gray().pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_guard_restores_state() {
        let mut scene = scene();
        let id = scene.objects()[0].id;
        scene.select(id);
        let original = scene.objects()[0].shape.style();
        let mut viewport = Viewport::new(0.05, 32.0);
        viewport.resize(vec2(400.0, 300.0), None);
        viewport.zoom_at_point(pos2(50.0, 50.0), 2.0);

        export(&mut scene, &mut viewport, 100, 100).unwrap();

        assert_eq!(scene.objects()[0].shape.style(), original);
        assert!(scene.background.image_visible);
        assert_eq!(scene.background.color, Color32::GRAY);
        assert_eq!(viewport.scale(), 2.0);
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn test_guard_restores_on_failure() {
        let mut scene = scene();
        let mut viewport = Viewport::new(0.05, 32.0);
        assert!(export(&mut scene, &mut viewport, 0, 100).is_err());
        assert!(scene.background.image_visible);
        assert_eq!(scene.objects()[0].shape.style().stroke, Color32::RED);
    }

    #[test]
    fn test_empty_scene_is_black() {
        let mut scene = Scene::new(Color32::GRAY);
        let mut viewport = Viewport::new(0.05, 32.0);
        let mask = export(&mut scene, &mut viewport, 8, 8).unwrap();
        assert_eq!(mask.coverage(), 0);
    }

    #[test]
    fn test_translucent_stroke_is_fully_white() {
        let mut scene = Scene::new(Color32::GRAY);
        scene.add(
            Shape::Stroke(StrokeShape::new(
                vec![pos2(0.0, 5.0), pos2(20.0, 5.0)],
                Style::stroke(Color32::from_rgba_unmultiplied(255, 0, 0, 128), 4.0),
            )),
            false,
        );
        let mut viewport = Viewport::new(0.05, 32.0);
        let mask = export(&mut scene, &mut viewport, 20, 10).unwrap();
        assert!(mask.is_white(10, 5));
        assert!(!mask.is_white(10, 9));
    }

    #[test]
    fn test_encode_png_roundtrips() {
        let mut scene = scene();
        let mut viewport = Viewport::new(0.05, 32.0);
        let mask = export(&mut scene, &mut viewport, 100, 100).unwrap();
        let bytes = mask.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(&decoded, mask.as_gray());
    }
}
