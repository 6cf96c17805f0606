// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration and region list serialization.
//!
//! Files are YAML or JSON, chosen by extension. The editor configuration is
//! read at startup; the region list can be exported together with the
//! instructions typed for each region.

use crate::config::EditorConfig;
use crate::models::RegionId;
use crate::regions::{Region, RegionInstructions};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => bail!("Unsupported file extension: {:?}", other),
        }
    }
}

/// One exported region with its instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: RegionId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instruction: String,
}

/// Exported region document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDocument {
    /// Source image dimensions in pixels.
    pub image_width: u32,
    pub image_height: u32,
    pub regions: Vec<RegionRecord>,
}

impl RegionDocument {
    pub fn new(image_width: u32, image_height: u32, regions: &[Region], notes: &RegionInstructions) -> Self {
        Self {
            image_width,
            image_height,
            regions: regions
                .iter()
                .map(|r| RegionRecord {
                    id: r.id,
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                    instruction: notes.get(r.id).trim().to_string(),
                })
                .collect(),
        }
    }
}

fn write<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = match Format::from_path(path)? {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    };
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = match format {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };
    Ok(value)
}

/// Export regions to YAML or JSON, by extension.
pub fn export_regions(document: &RegionDocument, path: &Path) -> Result<()> {
    write(document, path)?;
    log::info!("Exported {} regions to {}", document.regions.len(), path.display());
    Ok(())
}

/// Import a region document written by [`export_regions`].
pub fn import_regions(path: &Path) -> Result<RegionDocument> {
    read(path)
}

/// Load and validate an editor configuration.
pub fn load_config(path: &Path) -> Result<EditorConfig> {
    let config: EditorConfig = read(path)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config(config: &EditorConfig, path: &Path) -> Result<()> {
    write(config, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("maskpad-{}-{}", std::process::id(), name))
    }

    fn document() -> RegionDocument {
        let regions = [Region {
            id: 2,
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        }];
        let mut notes = RegionInstructions::default();
        notes.set(2, "replace with grass ");
        RegionDocument::new(640, 480, &regions, &notes)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert!(Format::from_path(Path::new("a.txt")).is_err());
    }

    #[test]
    fn test_region_export_yaml_and_json() {
        for name in ["regions.yaml", "regions.json"] {
            let path = temp_path(name);
            export_regions(&document(), &path).unwrap();
            let loaded = import_regions(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, document());
            assert_eq!(loaded.regions[0].instruction, "replace with grass");
        }
    }

    #[test]
    fn test_config_file_is_validated() {
        let path = temp_path("bad-config.yaml");
        std::fs::write(&path, "min_zoom: 0.0\n").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let path = temp_path("config.json");
        let config = EditorConfig {
            history_depth: 20,
            ..Default::default()
        };
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
