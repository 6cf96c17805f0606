// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar: tool selection, drawing toggle and brush width.

use maskpad::{MaskEditor, Tool};

fn icon(tool: Tool) -> &'static str {
    match tool {
        Tool::Select => "⬆",
        Tool::Brush => "🖌",
        Tool::Rectangle => "▭",
        Tool::Eraser => "⌫",
    }
}

/// Display the toolbar and apply changes to the editor.
pub fn show(ui: &mut egui::Ui, editor: &mut MaskEditor) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");
        ui.separator();

        let current = editor.tool();
        for tool in Tool::ALL {
            let text = format!("{} {}", icon(tool), tool.label());
            if ui.selectable_label(current == tool, text).clicked() && current != tool {
                editor.set_tool(tool);
                editor.set_drawing_enabled(tool != Tool::Select);
            }
        }

        ui.separator();

        let mut enabled = editor.drawing_enabled();
        if ui.checkbox(&mut enabled, "Drawing").changed() {
            editor.set_drawing_enabled(enabled);
        }

        let (lo, hi) = editor.config().brush_width_range;
        let mut width = editor.brush_width();
        let slider = egui::Slider::new(&mut width, lo..=hi).text("Brush").suffix(" px");
        if ui.add(slider).changed() {
            editor.set_brush_width(width);
        }

        ui.separator();

        ui.label(egui::RichText::new(editor.tool().description()).italics().weak());
    });
}
