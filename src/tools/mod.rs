// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing tools and the pointer gesture state machine.
//!
//! Exactly one tool is active. Pointer events are routed to it unless the
//! pan key is held, in which case a press starts a pan instead. Tools edit
//! the scene through a [`ToolContext`] and report what they did as an
//! [`Edit`]; the editor decides when to recompute regions and snapshot.

pub mod freehand;
pub mod rectangle;
pub mod select;

pub use freehand::{FreehandGesture, FreehandMode};
pub use rectangle::{RectDrag, RectInfo};
pub use select::SelectGesture;

use crate::config::EditorConfig;
use crate::models::Scene;
use crate::regions::RegionSync;
use egui::{Modifiers, Pos2, Rect, Vec2};

/// Available editing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Select,
    Brush,
    Rectangle,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Select, Tool::Brush, Tool::Rectangle, Tool::Eraser];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Brush => "Brush",
            Tool::Rectangle => "Rectangle",
            Tool::Eraser => "Eraser",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tool::Select => "Select, move and resize objects (Shift to add)",
            Tool::Brush => "Paint freehand strokes",
            Tool::Rectangle => "Draw rectangular regions (Shift for square)",
            Tool::Eraser => "Remove every object the stroke touches",
        }
    }
}

/// What a tool did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edit {
    /// Nothing in the scene changed.
    #[default]
    None,
    /// The scene changed mid-gesture; no history entry yet.
    Changed,
    /// A user-visible edit finished and should be recorded.
    Committed,
}

/// Borrowed editor state handed to the tools.
pub struct ToolContext<'a> {
    pub scene: &'a mut Scene,
    pub regions: &'a mut RegionSync,
    pub config: &'a EditorConfig,
    /// Image size in pixels.
    pub image: Vec2,
    /// Scene units covered by one screen pixel.
    pub pixel: f32,
}

/// Result of routing one input event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolResponse {
    pub edit: Edit,
    /// Screen delta to pan the viewport by.
    pub pan: Option<Vec2>,
    /// `Some` when the rectangle HUD should show a new value.
    pub rect_info: Option<Option<RectInfo>>,
}

impl ToolResponse {
    fn edit(edit: Edit) -> Self {
        Self {
            edit,
            ..Default::default()
        }
    }
}

/// In-flight pointer gesture
#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Pan { last: Pos2 },
    Freehand(FreehandGesture),
    Rect(RectDrag),
    Select(SelectGesture),
}

/// Active tool, its settings, and the gesture in progress.
#[derive(Debug)]
pub struct ToolState {
    tool: Tool,
    drawing_enabled: bool,
    brush_width: f32,
    pan_key_held: bool,
    gesture: Gesture,
}

impl ToolState {
    pub fn new(brush_width: f32) -> Self {
        Self {
            tool: Tool::Brush,
            drawing_enabled: true,
            brush_width,
            pan_key_held: false,
            gesture: Gesture::Idle,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn drawing_enabled(&self) -> bool {
        self.drawing_enabled
    }

    pub fn brush_width(&self) -> f32 {
        self.brush_width
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.brush_width = width;
    }

    pub fn pan_key_held(&self) -> bool {
        self.pan_key_held
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Forget the gesture in progress without touching the scene.
    pub fn reset_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Switch tools. Any gesture in progress is ended first, objects become
    /// selectable only for the select tool, and the selection is cleared.
    pub fn set_tool(&mut self, ctx: &mut ToolContext<'_>, tool: Tool) -> ToolResponse {
        let response = self.end_gesture(ctx);
        self.tool = tool;
        ctx.scene.set_interactive(tool == Tool::Select);
        ctx.scene.deselect_all();
        log::debug!("Tool changed to {}", tool.label());
        response
    }

    /// Toggle drawing for the brush, rectangle and eraser tools.
    pub fn set_drawing_enabled(&mut self, ctx: &mut ToolContext<'_>, enabled: bool) -> ToolResponse {
        self.drawing_enabled = enabled;
        if enabled || self.tool == Tool::Select {
            return ToolResponse::default();
        }
        self.end_gesture(ctx)
    }

    /// End the current gesture without finishing it as the user intended:
    /// provisional rectangles and freehand paths are dropped, moves and
    /// resizes already applied are kept and recorded.
    pub fn end_gesture(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Pan { .. } | Gesture::Freehand(_) => ToolResponse::default(),
            Gesture::Rect(drag) => ToolResponse {
                edit: drag.cancel(ctx),
                pan: None,
                rect_info: Some(None),
            },
            Gesture::Select(SelectGesture::Marquee { .. }) => ToolResponse::default(),
            Gesture::Select(gesture) => ToolResponse::edit(gesture.finish(ctx)),
        }
    }

    pub fn pointer_down(&mut self, ctx: &mut ToolContext<'_>, screen: Pos2, point: Pos2, modifiers: Modifiers) -> ToolResponse {
        if !self.is_idle() {
            return ToolResponse::default();
        }
        if self.pan_key_held {
            self.gesture = Gesture::Pan { last: screen };
            return ToolResponse::default();
        }
        match self.tool {
            Tool::Select => {
                if let Some(gesture) = SelectGesture::begin(ctx, point, modifiers.shift) {
                    self.gesture = Gesture::Select(gesture);
                }
                ToolResponse::default()
            }
            _ if !self.drawing_enabled => ToolResponse::default(),
            Tool::Brush | Tool::Eraser => {
                let mode = if self.tool == Tool::Brush {
                    FreehandMode::Paint
                } else {
                    FreehandMode::Erase
                };
                self.gesture = Gesture::Freehand(FreehandGesture::begin(point, self.brush_width, mode));
                ToolResponse::default()
            }
            Tool::Rectangle => {
                let (drag, info) = RectDrag::begin(ctx, point);
                self.gesture = Gesture::Rect(drag);
                ToolResponse {
                    edit: Edit::Changed,
                    pan: None,
                    rect_info: Some(Some(info)),
                }
            }
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut ToolContext<'_>, screen: Pos2, point: Pos2, modifiers: Modifiers) -> ToolResponse {
        if let Gesture::Pan { last } = &mut self.gesture {
            let delta = screen - *last;
            *last = screen;
            return ToolResponse {
                pan: Some(delta),
                ..Default::default()
            };
        }
        if self.pan_key_held {
            return ToolResponse::default();
        }
        match &mut self.gesture {
            Gesture::Freehand(gesture) => {
                let spacing = ctx.pixel * ctx.config.point_spacing;
                gesture.extend(point, spacing);
                ToolResponse::default()
            }
            Gesture::Rect(drag) => match drag.update(ctx, point, modifiers.shift) {
                Some(info) => ToolResponse {
                    edit: Edit::Changed,
                    pan: None,
                    rect_info: Some(Some(info)),
                },
                None => ToolResponse::default(),
            },
            Gesture::Select(gesture) => ToolResponse::edit(gesture.update(ctx, point)),
            Gesture::Idle | Gesture::Pan { .. } => ToolResponse::default(),
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut ToolContext<'_>, point: Pos2) -> ToolResponse {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle | Gesture::Pan { .. } => ToolResponse::default(),
            Gesture::Freehand(mut gesture) => {
                gesture.extend(point, ctx.pixel * ctx.config.point_spacing);
                ToolResponse::edit(gesture.finish(ctx))
            }
            Gesture::Rect(drag) => {
                let (edit, info) = drag.finish(ctx);
                ToolResponse {
                    edit,
                    pan: None,
                    rect_info: Some(info),
                }
            }
            Gesture::Select(gesture) => ToolResponse::edit(gesture.finish(ctx)),
        }
    }

    /// Holding the pan key turns the next press into a pan.
    pub fn set_pan_key(&mut self, held: bool) {
        self.pan_key_held = held;
        if !held && self.is_panning() {
            self.gesture = Gesture::Idle;
        }
    }

    /// Escape: drop a rectangle being drawn and clear the selection.
    pub fn escape(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        let response = if matches!(self.gesture, Gesture::Rect(_)) {
            self.end_gesture(ctx)
        } else {
            ToolResponse::default()
        };
        ctx.scene.deselect_all();
        response
    }

    /// Delete the selected objects. Only the select tool has a selection.
    pub fn delete_selected(&mut self, ctx: &mut ToolContext<'_>) -> ToolResponse {
        if self.tool != Tool::Select || !self.is_idle() {
            return ToolResponse::default();
        }
        let selection = ctx.scene.selection().clone();
        let removed = ctx.scene.remove_where(|obj| selection.contains(&obj.id));
        if removed == 0 {
            return ToolResponse::default();
        }
        log::debug!("Deleted {} selected objects", removed);
        ToolResponse::edit(Edit::Committed)
    }

    /// The freehand path being drawn, for preview painting.
    pub fn freehand_preview(&self) -> Option<&FreehandGesture> {
        match &self.gesture {
            Gesture::Freehand(gesture) => Some(gesture),
            _ => None,
        }
    }

    pub fn marquee(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Select(gesture) => gesture.marquee(),
            _ => None,
        }
    }
}
