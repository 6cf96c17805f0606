// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region properties panel.
//!
//! Lists the rectangle regions with their pixel bounds, lets the user type
//! an instruction for each one, and composes the per-region prompt.

use maskpad::{Region, RegionInstructions};

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    FocusRegion(u32),
    CopyPrompt(String),
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, regions: &[Region], notes: &mut RegionInstructions) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Regions");
    ui.separator();

    if regions.is_empty() {
        ui.label(egui::RichText::new("Draw a rectangle to add a region").weak());
        return action;
    }

    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 60.0)
        .show(ui, |ui| {
            for region in regions {
                ui.horizontal(|ui| {
                    ui.strong(format!("#{}", region.id));
                    ui.label(egui::RichText::new(region.to_xywh_string()).monospace());
                    if ui.small_button("Focus").clicked() {
                        action = PropertiesAction::FocusRegion(region.id);
                    }
                });
                ui.add(
                    egui::TextEdit::multiline(notes.entry(region.id))
                        .hint_text("Describe the change for this region")
                        .desired_rows(2)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);
            }
        });

    ui.separator();
    if ui.button("Copy prompt").clicked() {
        action = PropertiesAction::CopyPrompt(notes.compose_prompt(regions));
    }

    action
}
