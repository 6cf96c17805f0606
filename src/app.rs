// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Wires the mask editor to the menus, toolbar, region panel and canvas,
//! runs image decoding in the background, and writes exported files.

use crate::ui::{canvas, properties, toolbar};
use maskpad::io::media::{self, DecodeResult};
use maskpad::io::serialization::{self, RegionDocument};
use maskpad::{EditorConfig, MaskEditor, MaskImage, RegionInstructions};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

const ZOOM_STEP: f32 = 1.25;

/// Main application state.
pub struct MaskpadApp {
    editor: MaskEditor,

    /// Rendered view texture
    canvas: canvas::CanvasState,

    /// Per-region instructions typed in the properties panel
    notes: RegionInstructions,

    /// Receiver for background image loading
    image_loader: Option<Receiver<DecodeResult>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Destination of a requested mask export
    pending_export: Option<PathBuf>,

    /// Last message shown in the status line
    status: Option<String>,
}

impl MaskpadApp {
    /// Create a new application instance.
    pub fn new(config: EditorConfig) -> anyhow::Result<Self> {
        Ok(Self {
            editor: MaskEditor::new(config)?,
            canvas: canvas::CanvasState::default(),
            notes: RegionInstructions::default(),
            image_loader: None,
            loading_message: None,
            pending_export: None,
            status: None,
        })
    }

    /// Load an image file in the background.
    fn load_image_file(&mut self, path: PathBuf) {
        let token = self.editor.begin_image_load();
        self.loading_message = Some(format!("Loading {}...", path.display()));
        self.image_loader = Some(media::spawn_decode(path, token));
    }

    fn poll_loader(&mut self) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok((token, result)) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match self.editor.complete_image_load(token, result) {
            Ok(true) => {
                self.notes.clear();
                self.status = None;
                log::info!("Image loaded successfully");
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to load image: {}", e);
                self.status = Some(format!("Failed to load image: {}", e));
            }
        }
    }

    fn write_mask(path: &std::path::Path, mask: &MaskImage) -> anyhow::Result<()> {
        let bytes = mask.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn finish_export(&mut self) {
        let Some(result) = self.editor.take_export() else {
            return;
        };
        let Some(path) = self.pending_export.take() else {
            return;
        };
        let outcome = result
            .map_err(anyhow::Error::from)
            .and_then(|mask| Self::write_mask(&path, &mask));
        match outcome {
            Ok(()) => {
                log::info!("Exported mask to {}", path.display());
                self.status = Some(format!("Saved mask to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export mask: {}", e);
                self.status = Some(format!("Failed to export mask: {}", e));
            }
        }
    }

    /// Export the region list with instructions.
    fn export_regions(&mut self, path: PathBuf) {
        let Some(image) = self.editor.image() else {
            return;
        };
        let document = RegionDocument::new(image.width(), image.height(), self.editor.regions(), &self.notes);
        if let Err(e) = serialization::export_regions(&document, &path) {
            log::error!("Failed to export regions: {}", e);
            self.status = Some(format!("Failed to export regions: {}", e));
        }
    }

    fn zoom_step(&mut self, factor: f32) {
        let center = (self.editor.viewport().size() / 2.0).to_pos2();
        self.editor.zoom_at(center, factor);
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            let has_image = self.editor.image().is_some();

            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff", "tif"])
                        .pick_file()
                    {
                        self.load_image_file(path);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.add_enabled(has_image, egui::Button::new("Export Mask PNG...")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG", &["png"])
                        .set_file_name("mask.png")
                        .save_file()
                    {
                        self.pending_export = Some(path);
                        self.editor.request_export();
                    }
                    ui.close_menu();
                }
                ui.add_enabled_ui(has_image, |ui| {
                    ui.menu_button("Export Regions", |ui| {
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("regions.yaml")
                                .save_file()
                            {
                                self.export_regions(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("regions.json")
                                .save_file()
                            {
                                self.export_regions(path);
                            }
                            ui.close_menu();
                        }
                    });
                });
                ui.separator();
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui
                    .add_enabled(self.editor.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                    .clicked()
                {
                    self.editor.undo();
                    ui.close_menu();
                }
                if ui
                    .add_enabled(self.editor.can_redo(), egui::Button::new("Redo (Ctrl+Shift+Z)"))
                    .clicked()
                {
                    self.editor.redo();
                    ui.close_menu();
                }
                ui.separator();
                let has_selection = !self.editor.scene().selection().is_empty();
                if ui.add_enabled(has_selection, egui::Button::new("Delete Selected")).clicked() {
                    self.editor.delete_selected();
                    ui.close_menu();
                }
                if ui.add_enabled(has_image, egui::Button::new("Clear Mask")).clicked() {
                    self.editor.clear();
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Fit to Window").clicked() {
                    self.editor.fit_to_view();
                    ui.close_menu();
                }
                if ui.button("Actual Size (1:1)").clicked() {
                    self.editor.reset_to_native();
                    ui.close_menu();
                }
                if ui.button("Zoom In").clicked() {
                    self.zoom_step(ZOOM_STEP);
                    ui.close_menu();
                }
                if ui.button("Zoom Out").clicked() {
                    self.zoom_step(1.0 / ZOOM_STEP);
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for MaskpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();

        self.editor.on_frame();
        if let Some(regions) = self.editor.take_region_update() {
            self.notes.prune(&regions);
        }
        self.finish_export();

        if self.loading_message.is_some() || self.editor.is_restoring() || self.pending_export.is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.editor);
        });

        if let Some(status) = &self.status {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                ui.label(status);
            });
        }

        let action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| properties::show(ui, self.editor.regions(), &mut self.notes))
            .inner;

        match action {
            properties::PropertiesAction::FocusRegion(id) => {
                self.editor.focus_region(id);
            }
            properties::PropertiesAction::CopyPrompt(prompt) => {
                ctx.output_mut(|o| o.copied_text = prompt);
            }
            properties::PropertiesAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(ref message) = self.loading_message {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            } else {
                canvas::show(ui, &mut self.editor, &mut self.canvas);
            }
        });
    }
}
