// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas.
//!
//! Feeds egui pointer, wheel and key input to the editor in surface-local
//! coordinates and shows the view rendered by the editor as a texture.

use maskpad::MaskEditor;

/// Wheel units reported per egui point of scroll, matching browser deltas.
const WHEEL_POINTS_TO_DELTA: f32 = 2.0;

/// Texture cache for the rendered view.
#[derive(Default)]
pub struct CanvasState {
    texture: Option<egui::TextureHandle>,
    drawn_revision: Option<u64>,
}

fn forward_input(ui: &egui::Ui, editor: &mut MaskEditor, rect: egui::Rect, hovered: bool) {
    let events = ui.input(|i| i.events.clone());
    let local = |pos: egui::Pos2| (pos - rect.min).to_pos2();
    let keyboard = !ui.ctx().wants_keyboard_input();

    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                modifiers,
            } => {
                if pressed && hovered {
                    editor.pointer_down(local(pos), modifiers);
                } else if !pressed {
                    editor.pointer_up(local(pos));
                }
            }
            egui::Event::PointerMoved(pos) => {
                if rect.contains(pos) || ui.input(|i| i.pointer.primary_down()) {
                    let modifiers = ui.input(|i| i.modifiers);
                    editor.pointer_move(local(pos), modifiers);
                } else {
                    editor.pointer_left();
                }
            }
            egui::Event::PointerGone => editor.pointer_left(),
            egui::Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                ..
            } => {
                if !pressed {
                    editor.key_up(key);
                } else if keyboard && !repeat {
                    editor.key_down(key, modifiers);
                }
            }
            _ => {}
        }
    }

    if hovered {
        let scroll = ui.input(|i| i.raw_scroll_delta);
        if scroll.y != 0.0 {
            if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                editor.wheel(local(pos), -scroll.y * WHEEL_POINTS_TO_DELTA);
            }
        }
    }
}

/// Display the canvas and route input to the editor.
pub fn show(ui: &mut egui::Ui, editor: &mut MaskEditor, state: &mut CanvasState) {
    let hud_height = ui.spacing().interact_size.y + 8.0;
    let size = ui.available_size() - egui::vec2(0.0, hud_height);
    let (rect, response) = ui.allocate_exact_size(size.max(egui::Vec2::ZERO), egui::Sense::click_and_drag());
    editor.resize(rect.size().floor());

    if editor.image().is_none() {
        ui.painter().rect_filled(rect, 0.0, egui::Color32::from_gray(40));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "File → Open Image... to begin",
            egui::FontId::proportional(16.0),
            egui::Color32::from_gray(180),
        );
    } else {
        forward_input(ui, editor, rect, response.hovered());

        if state.drawn_revision != Some(editor.revision()) {
            if let Some(pixmap) = editor.render_view() {
                let size = [pixmap.width() as usize, pixmap.height() as usize];
                let image = egui::ColorImage::from_rgba_premultiplied(size, pixmap.data());
                match &mut state.texture {
                    Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                    None => {
                        state.texture = Some(ui.ctx().load_texture("canvas", image, egui::TextureOptions::NEAREST));
                    }
                }
                state.drawn_revision = Some(editor.revision());
            }
        }

        if let Some(texture) = &state.texture {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            let area = egui::Rect::from_min_size(rect.min, texture.size_vec2());
            ui.painter_at(rect).image(texture.id(), area, uv, egui::Color32::WHITE);
        }

        if editor.is_panning() && response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Tool: {}", editor.tool().label()));
        ui.separator();
        if editor.image().is_some() {
            ui.label(editor.hud_text());
            if let Some(info) = editor.rect_info() {
                if ui.small_button("Copy rect").clicked() {
                    ui.ctx().output_mut(|o| o.copied_text = info.to_clipboard_string());
                }
            }
        } else {
            ui.label("No image loaded");
        }
    });
}
