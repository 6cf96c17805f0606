// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The mask editor facade.
//!
//! [`MaskEditor`] owns one of each component (scene, viewport, tools,
//! history, regions) and is driven by the host: surface size, pointer,
//! keyboard and wheel events, plus one [`MaskEditor::on_frame`] call per
//! animation frame. It sequences every completed edit as "recompute
//! regions, then snapshot" and exposes the derived outputs.

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::History;
use crate::io::media::SourceImage;
use crate::mask::{self, MaskImage};
use crate::models::{RegionId, Scene};
use crate::regions::{Region, RegionSync};
use crate::render;
use crate::tools::{Edit, RectInfo, Tool, ToolContext, ToolResponse, ToolState};
use crate::util::frame::Coalesced;
use crate::util::generation::{Generation, Token};
use crate::viewport::{ViewMode, Viewport};
use egui::{Key, Modifiers, Pos2, Vec2};
use tiny_skia::Pixmap;

/// Interactive mask authoring over one source image.
pub struct MaskEditor {
    config: EditorConfig,
    image: Option<SourceImage>,
    scene: Scene,
    viewport: Viewport,
    history: History,
    regions: RegionSync,
    tools: ToolState,
    /// Sequencing for background image decodes.
    loads: Generation,
    pointer: Coalesced<Option<Pos2>>,
    rect_info: Coalesced<Option<RectInfo>>,
    regions_changed: bool,
    export_requested: bool,
    export_result: Option<Result<MaskImage>>,
    revision: u64,
}

impl MaskEditor {
    pub fn new(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scene: Scene::new(config.canvas_background),
            viewport: Viewport::new(config.min_zoom, config.max_zoom),
            history: History::new(config.history_depth),
            regions: RegionSync::default(),
            tools: ToolState::new(config.clamp_brush_width(config.brush_width)),
            loads: Generation::default(),
            pointer: Coalesced::new(None),
            rect_info: Coalesced::new(None),
            regions_changed: false,
            export_requested: false,
            export_result: None,
            revision: 0,
            image: None,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    fn image_size(&self) -> Option<Vec2> {
        self.image.as_ref().map(SourceImage::size)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Changes whenever anything visible changed. The host re-renders when
    /// this differs from the value it last drew.
    pub fn revision(&self) -> u64 {
        self.revision + self.viewport.revision()
    }

    /// Replace the image and discard every edit, view and history state.
    pub fn load_image(&mut self, image: SourceImage) {
        log::info!("Loading {}x{} image", image.width(), image.height());
        let size = image.size();
        self.image = Some(image);
        self.loads.invalidate();

        self.tools.reset_gesture();
        self.scene.clear();
        self.history.reset();
        self.regions.reset();
        self.regions_changed = true;
        self.pointer.reset(None);
        self.rect_info.reset(None);
        self.export_requested = false;
        self.export_result = None;

        self.viewport.reset();
        self.viewport.fit_to_view(size);
        self.revision += 1;
    }

    /// Start a background load. Only the most recent token can complete.
    pub fn begin_image_load(&mut self) -> Token {
        self.loads.next()
    }

    /// Apply a decode started with [`MaskEditor::begin_image_load`].
    ///
    /// Returns `Ok(false)` for a superseded load. A failed decode leaves the
    /// current image and edits untouched.
    pub fn complete_image_load(&mut self, token: Token, result: Result<SourceImage>) -> Result<bool> {
        if !self.loads.is_current(token) {
            log::warn!("Ignoring result of a superseded image load");
            return Ok(false);
        }
        self.load_image(result?);
        Ok(true)
    }

    /// Encoded bytes of the current source image.
    pub fn source_bytes(&self) -> Option<&[u8]> {
        self.image.as_ref().map(SourceImage::bytes)
    }

    /// Record the render surface size in screen pixels.
    pub fn resize(&mut self, size: Vec2) {
        if size != self.viewport.size() {
            let image = self.image_size();
            self.viewport.resize(size, image);
        }
    }

    pub fn fit_to_view(&mut self) {
        if let Some(size) = self.image_size() {
            self.viewport.fit_to_view(size);
        }
    }

    pub fn reset_to_native(&mut self) {
        if let Some(size) = self.image_size() {
            self.viewport.reset_to_native(size);
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.viewport.mode()
    }

    /// Zoom by `factor` keeping the scene point under `at` in place.
    pub fn zoom_at(&mut self, at: Pos2, factor: f32) {
        if self.has_image() {
            self.viewport.zoom_at_point(at, factor);
        }
    }

    /// Wheel zoom at the pointer. `delta_y` is positive when scrolling
    /// down, which zooms out.
    pub fn wheel(&mut self, at: Pos2, delta_y: f32) {
        let factor = self.config.wheel_zoom_base.powf(-delta_y);
        self.zoom_at(at, factor);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    pub fn tool(&self) -> Tool {
        self.tools.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.route(|tools, ctx| tools.set_tool(ctx, tool));
    }

    pub fn drawing_enabled(&self) -> bool {
        self.tools.drawing_enabled()
    }

    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.route(|tools, ctx| tools.set_drawing_enabled(ctx, enabled));
    }

    pub fn brush_width(&self) -> f32 {
        self.tools.brush_width()
    }

    /// Set the brush and eraser width, clamped to the configured range.
    pub fn set_brush_width(&mut self, width: f32) {
        let width = self.config.clamp_brush_width(width);
        self.tools.set_brush_width(width);
    }

    /// Whether the pan key is down or a pan drag is in progress.
    pub fn is_panning(&self) -> bool {
        self.tools.pan_key_held() || self.tools.is_panning()
    }

    fn accepts_pointer(&self) -> bool {
        self.has_image() && !self.history.is_restoring()
    }

    pub fn pointer_down(&mut self, screen: Pos2, modifiers: Modifiers) {
        if !self.accepts_pointer() {
            return;
        }
        let point = self.viewport.scene_from_screen(screen);
        self.pointer.schedule(Some(point));
        self.route(|tools, ctx| tools.pointer_down(ctx, screen, point, modifiers));
    }

    pub fn pointer_move(&mut self, screen: Pos2, modifiers: Modifiers) {
        if !self.accepts_pointer() {
            return;
        }
        let point = self.viewport.scene_from_screen(screen);
        self.pointer.schedule(Some(point));
        self.route(|tools, ctx| tools.pointer_move(ctx, screen, point, modifiers));
    }

    pub fn pointer_up(&mut self, screen: Pos2) {
        if !self.accepts_pointer() {
            return;
        }
        let point = self.viewport.scene_from_screen(screen);
        self.route(|tools, ctx| tools.pointer_up(ctx, point));
    }

    /// The pointer left the surface.
    pub fn pointer_left(&mut self) {
        self.pointer.schedule(None);
    }

    /// Handle a key press. Returns true if the key was consumed.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match key {
            Key::Z if modifiers.command && modifiers.shift => self.redo(),
            Key::Z if modifiers.command => self.undo(),
            Key::Y if modifiers.command => self.redo(),
            Key::Space => {
                self.tools.set_pan_key(true);
                true
            }
            _ if self.history.is_restoring() => false,
            Key::Escape => {
                self.route(|tools, ctx| tools.escape(ctx));
                true
            }
            Key::Delete | Key::Backspace => {
                self.delete_selected();
                true
            }
            _ => false,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Space {
            self.tools.set_pan_key(false);
        }
    }

    /// Remove the selected objects (select tool only).
    pub fn delete_selected(&mut self) {
        if self.history.is_restoring() {
            return;
        }
        self.route(|tools, ctx| tools.delete_selected(ctx));
    }

    /// Remove every object. Recorded as one edit.
    pub fn clear(&mut self) {
        if !self.has_image() || self.history.is_restoring() {
            return;
        }
        self.route(|tools, ctx| tools.end_gesture(ctx));
        self.scene.clear();
        log::info!("Cleared mask");
        self.apply(ToolResponse {
            edit: Edit::Committed,
            pan: None,
            rect_info: Some(None),
        });
    }

    /// Switch to the select tool and select the rectangle of `region`.
    pub fn focus_region(&mut self, region: RegionId) -> bool {
        let Some(id) = self.scene.find_region(region) else {
            return false;
        };
        if self.tool() != Tool::Select {
            self.set_tool(Tool::Select);
        }
        self.scene.select_only(id);
        self.revision += 1;
        true
    }

    /// Step back one entry. The scene is rebuilt on the next frame.
    pub fn undo(&mut self) -> bool {
        self.route(|tools, ctx| tools.end_gesture(ctx));
        let queued = self.history.undo().is_some();
        if queued {
            log::debug!("Undo to step {}", self.history.index());
            self.revision += 1;
        }
        queued
    }

    /// Step forward one entry. The scene is rebuilt on the next frame.
    pub fn redo(&mut self) -> bool {
        self.route(|tools, ctx| tools.end_gesture(ctx));
        let queued = self.history.redo().is_some();
        if queued {
            log::debug!("Redo to step {}", self.history.index());
            self.revision += 1;
        }
        queued
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_restoring(&self) -> bool {
        self.history.is_restoring()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Per-frame work: apply the latest history restore, publish coalesced
    /// HUD values and run a requested export.
    pub fn on_frame(&mut self) {
        if let Some((request, snapshot)) = self.history.take_restore() {
            let interactive = self.tools.tool() == Tool::Select;
            let skipped = self.scene.restore(snapshot, interactive);
            if skipped > 0 {
                log::warn!("Restored step {} with {} objects skipped", request.step, skipped);
            }
            self.recompute_regions();
            self.rect_info.schedule(None);
            self.revision += 1;
        }

        let pointer = self.pointer.flush();
        let rect = self.rect_info.flush();
        if pointer || rect {
            self.revision += 1;
        }

        if self.export_requested {
            self.export_requested = false;
            self.export_result = Some(self.export_mask());
        }
    }

    pub fn regions(&self) -> &[Region] {
        self.regions.regions()
    }

    /// The region list if it changed since the last call.
    pub fn take_region_update(&mut self) -> Option<Vec<Region>> {
        if !self.regions_changed {
            return None;
        }
        self.regions_changed = false;
        Some(self.regions.regions().to_vec())
    }

    pub fn pointer_position(&self) -> Option<Pos2> {
        *self.pointer.get()
    }

    /// Bounds of the rectangle being drawn, or of the last one completed.
    pub fn rect_info(&self) -> Option<RectInfo> {
        *self.rect_info.get()
    }

    /// One-line status: pointer position, zoom and rectangle bounds.
    pub fn hud_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(p) = self.pointer_position() {
            parts.push(format!("x: {:.0}  y: {:.0}", p.x, p.y));
        }
        parts.push(format!("{}%", self.zoom_percent()));
        if let Some(info) = self.rect_info() {
            parts.push(format!("rect {}", info.to_clipboard_string()));
        }
        if self.tool() != Tool::Select && !self.drawing_enabled() {
            parts.push("drawing not enabled".to_string());
        }
        if self.is_restoring() {
            parts.push("restoring".to_string());
        }
        parts.join("  |  ")
    }

    /// Rasterize the mask at the image's native size.
    pub fn export_mask(&mut self) -> Result<MaskImage> {
        let image = self.image.as_ref().ok_or(EditorError::NoImage)?;
        if !self.viewport.has_surface() {
            return Err(EditorError::NoSurface);
        }
        let (width, height) = (image.width(), image.height());
        let result = mask::export(&mut self.scene, &mut self.viewport, width, height);
        self.revision += 1;
        result
    }

    /// Export on the next frame; collect the result with
    /// [`MaskEditor::take_export`].
    pub fn request_export(&mut self) {
        self.export_requested = true;
    }

    pub fn take_export(&mut self) -> Option<Result<MaskImage>> {
        self.export_result.take()
    }

    /// Paint the interactive view at the surface size.
    pub fn render_view(&self) -> Option<Pixmap> {
        render::render_view(&self.scene, self.image.as_ref(), &self.viewport, &self.tools, &self.config)
    }

    /// Run a tool operation against the scene and apply its response.
    fn route(&mut self, f: impl FnOnce(&mut ToolState, &mut ToolContext<'_>) -> ToolResponse) {
        let mut ctx = ToolContext {
            scene: &mut self.scene,
            regions: &mut self.regions,
            config: &self.config,
            image: self.image.as_ref().map(SourceImage::size).unwrap_or(Vec2::ZERO),
            pixel: self.viewport.scene_length(1.0),
        };
        let response = f(&mut self.tools, &mut ctx);
        self.apply(response);
    }

    fn apply(&mut self, response: ToolResponse) {
        if let Some(delta) = response.pan {
            self.viewport.pan_by(delta);
        }
        if let Some(info) = response.rect_info {
            self.rect_info.schedule(info);
        }
        match response.edit {
            Edit::None => {}
            Edit::Changed => self.recompute_regions(),
            Edit::Committed => {
                self.recompute_regions();
                self.commit();
            }
        }
        self.revision += 1;
    }

    fn recompute_regions(&mut self) {
        let size = self.image_size().unwrap_or(Vec2::ZERO);
        if self.regions.recompute(&mut self.scene, size) {
            self.regions_changed = true;
        }
    }

    fn commit(&mut self) {
        match self.scene.snapshot() {
            Ok(snapshot) => self.history.commit(snapshot),
            Err(e) => log::error!("Failed to snapshot scene: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::decode_image;
    use egui::{pos2, vec2};
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn source(width: u32, height: u32) -> SourceImage {
        let mut bytes = Vec::new();
        RgbaImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        decode_image(bytes).unwrap()
    }

    fn editor() -> MaskEditor {
        let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
        editor.resize(vec2(100.0, 100.0));
        editor.load_image(source(100, 100));
        editor
    }

    fn drag(editor: &mut MaskEditor, from: Pos2, to: Pos2) {
        editor.pointer_down(from, Modifiers::NONE);
        editor.pointer_move(to, Modifiers::NONE);
        editor.pointer_up(to);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EditorConfig {
            history_depth: 0,
            ..Default::default()
        };
        assert!(MaskEditor::new(config).is_err());
    }

    #[test]
    fn test_pointer_ignored_without_image() {
        let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
        editor.resize(vec2(100.0, 100.0));
        drag(&mut editor, pos2(1.0, 1.0), pos2(50.0, 50.0));
        assert!(editor.scene().is_empty());
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_load_fits_image() {
        let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
        editor.resize(vec2(400.0, 300.0));
        editor.load_image(source(800, 300));
        assert_eq!(editor.zoom_percent(), 50);
        assert_eq!(editor.view_mode(), ViewMode::Fit);
    }

    #[test]
    fn test_rectangle_updates_regions() {
        let mut editor = editor();
        editor.take_region_update();
        editor.set_tool(Tool::Rectangle);
        drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));

        let regions = editor.take_region_update().unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].to_xywh_string(), "10,10,50,30");
        assert!(editor.take_region_update().is_none());
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_hud_publishes_once_per_frame() {
        let mut editor = editor();
        editor.set_tool(Tool::Rectangle);
        editor.pointer_down(pos2(10.0, 10.0), Modifiers::NONE);
        editor.pointer_move(pos2(20.0, 20.0), Modifiers::NONE);
        editor.pointer_move(pos2(30.0, 25.0), Modifiers::NONE);
        assert!(editor.rect_info().is_none());
        editor.on_frame();
        assert_eq!(editor.pointer_position(), Some(pos2(30.0, 25.0)));
        assert_eq!(editor.rect_info().map(|r| r.to_clipboard_string()).as_deref(), Some("10,10,20,15"));
    }

    #[test]
    fn test_restoring_blocks_edits_until_frame() {
        let mut editor = editor();
        drag(&mut editor, pos2(10.0, 10.0), pos2(50.0, 50.0));
        assert!(editor.undo());
        assert!(editor.is_restoring());
        assert_eq!(editor.scene().len(), 1);

        drag(&mut editor, pos2(70.0, 70.0), pos2(90.0, 90.0));
        assert_eq!(editor.scene().len(), 1);

        editor.on_frame();
        assert!(!editor.is_restoring());
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_export_requires_image_and_surface() {
        let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
        assert!(matches!(editor.export_mask(), Err(EditorError::NoImage)));
        editor.load_image(source(10, 10));
        assert!(matches!(editor.export_mask(), Err(EditorError::NoSurface)));
        editor.resize(vec2(10.0, 10.0));
        assert!(editor.export_mask().is_ok());
    }

    #[test]
    fn test_requested_export_runs_on_frame() {
        let mut editor = editor();
        editor.request_export();
        assert!(editor.take_export().is_none());
        editor.on_frame();
        let mask = editor.take_export().unwrap().unwrap();
        assert_eq!((mask.width(), mask.height()), (100, 100));
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut editor = editor();
        let first = editor.begin_image_load();
        let second = editor.begin_image_load();
        assert!(!editor.complete_image_load(first, Ok(source(20, 20))).unwrap());
        assert_eq!(editor.image().map(|i| i.width()), Some(100));
        assert!(editor.complete_image_load(second, Ok(source(20, 20))).unwrap());
        assert_eq!(editor.image().map(|i| i.width()), Some(20));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut editor = editor();
        drag(&mut editor, pos2(10.0, 10.0), pos2(50.0, 50.0));
        let token = editor.begin_image_load();
        let result = decode_image(vec![0, 1, 2]);
        assert!(editor.complete_image_load(token, result).is_err());
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(editor.image().map(|i| i.width()), Some(100));
    }

    #[test]
    fn test_focus_region_selects_rectangle() {
        let mut editor = editor();
        editor.set_tool(Tool::Rectangle);
        drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 40.0));
        let id = editor.regions()[0].id;
        assert!(editor.focus_region(id));
        assert_eq!(editor.tool(), Tool::Select);
        assert_eq!(editor.scene().selection().len(), 1);
        assert!(!editor.focus_region(id + 10));
    }

    #[test]
    fn test_space_pans_instead_of_drawing() {
        let mut editor = editor();
        let before = editor.viewport().offset();
        editor.key_down(Key::Space, Modifiers::NONE);
        drag(&mut editor, pos2(10.0, 10.0), pos2(30.0, 10.0));
        editor.key_up(Key::Space);
        assert!(editor.scene().is_empty());
        assert_eq!(editor.viewport().offset(), before + vec2(20.0, 0.0));
        assert_eq!(editor.view_mode(), ViewMode::Manual);
    }

    #[test]
    fn test_render_view_matches_surface() {
        let editor = editor();
        let pixmap = editor.render_view().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (100, 100));
    }

    #[test]
    fn test_hud_hints_when_drawing_is_disabled() {
        let mut editor = editor();
        assert!(!editor.hud_text().contains("drawing not enabled"));

        editor.set_drawing_enabled(false);
        assert!(editor.hud_text().contains("drawing not enabled"));
        drag(&mut editor, pos2(10.0, 10.0), pos2(40.0, 40.0));
        assert!(editor.scene().is_empty());

        editor.set_tool(Tool::Select);
        assert!(!editor.hud_text().contains("drawing not enabled"));
    }
}
