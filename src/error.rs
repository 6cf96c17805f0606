// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error type for the mask editor core.
//!
//! Every variant names the stage that failed so the host can show a
//! meaningful message. Zero-area rectangles and pointer input without an
//! image are handled locally and never reach this type.

use thiserror::Error;

/// Errors surfaced by the editor to its caller.
#[derive(Debug, Error)]
pub enum EditorError {
    /// An operation needed a loaded image.
    #[error("no image is loaded")]
    NoImage,

    /// The host has not attached a non-empty render surface.
    #[error("no render surface is available")]
    NoSurface,

    /// The source bitmap could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Reading the source file failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The mask could not be rasterized or encoded.
    #[error("failed to encode mask: {0}")]
    Encode(String),

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A history snapshot could not be produced.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
