// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! maskpad - Mask authoring canvas
//!
//! A desktop application for painting edit masks and marking numbered
//! regions over an image, for region-based photo editing.

mod app;
mod ui;

use anyhow::Result;
use app::MaskpadApp;
use maskpad::io::serialization;
use maskpad::EditorConfig;
use std::path::PathBuf;

/// Configuration file named by `MASKPAD_CONFIG`, or the defaults.
fn load_config() -> Result<EditorConfig> {
    match std::env::var_os("MASKPAD_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = serialization::load_config(&path)?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(EditorConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = load_config()?;
    let app = MaskpadApp::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("maskpad"),
        ..Default::default()
    };

    eframe::run_native("maskpad", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
