// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! maskpad - mask authoring for region-based image editing
//!
//! Load a bitmap, paint a binary edit mask over it with freehand strokes
//! and rectangles, keep a numbered list of rectangular regions in sync, and
//! export the mask at the image's native resolution regardless of the
//! current zoom and pan.

pub mod config;
pub mod editor;
pub mod error;
pub mod history;
pub mod io;
pub mod mask;
pub mod models;
pub mod regions;
pub mod render;
pub mod tools;
pub mod util;
pub mod viewport;

pub use config::EditorConfig;
pub use editor::MaskEditor;
pub use error::{EditorError, Result};
pub use io::media::SourceImage;
pub use mask::MaskImage;
pub use regions::{Region, RegionInstructions};
pub use tools::{RectInfo, Tool};
pub use viewport::ViewMode;
