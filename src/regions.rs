// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region synchronization.
//!
//! Rectangles in the scene are exposed to collaborators as regions: a
//! stable ID plus clamped pixel bounds. The list is derived, recomputed
//! after every scene change, and always sorted by ID. Per-region
//! instructions typed by the user are keyed by that ID.

use crate::models::{RegionId, Scene, Shape};
use crate::util::geometry::clamp_rect_to_image;
use egui::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only projection of a rectangle, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    /// `x,y,w,h` rounded to whole pixels.
    pub fn to_xywh_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round()
        )
    }
}

/// Derives the region list and owns the ID counter.
#[derive(Debug)]
pub struct RegionSync {
    next_id: RegionId,
    regions: Vec<Region>,
}

impl Default for RegionSync {
    fn default() -> Self {
        Self {
            next_id: 1,
            regions: Vec::new(),
        }
    }
}

impl RegionSync {
    /// Restart numbering for a new image.
    pub fn reset(&mut self) {
        self.next_id = 1;
        self.regions.clear();
    }

    /// Hand out a fresh region ID.
    pub fn allocate(&mut self) -> RegionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Rebuild the region list from the scene.
    ///
    /// Rectangles without an ID get one. The counter is advanced past every
    /// ID seen so restored rectangles never collide with new ones. Returns
    /// true if the list changed.
    pub fn recompute(&mut self, scene: &mut Scene, image: Vec2) -> bool {
        let seen = scene.objects().iter().filter_map(|obj| obj.shape.region_id()).max();
        if let Some(max) = seen {
            self.next_id = self.next_id.max(max + 1);
        }

        let mut regions = Vec::new();
        for obj in scene.objects_mut() {
            let Shape::Rect(rect) = &mut obj.shape else {
                continue;
            };
            let id = match rect.region_id {
                Some(id) => id,
                None => {
                    let id = self.allocate();
                    rect.region_id = Some(id);
                    id
                }
            };

            let bounds = clamp_rect_to_image(rect.rect(), image);
            regions.push(Region {
                id,
                x: bounds.min.x,
                y: bounds.min.y,
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        regions.sort_by_key(|r| r.id);

        let changed = regions != self.regions;
        self.regions = regions;
        changed
    }
}

/// Free-text instructions attached to regions by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInstructions {
    texts: BTreeMap<RegionId, String>,
}

impl RegionInstructions {
    pub fn get(&self, id: RegionId) -> &str {
        self.texts.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, id: RegionId, text: impl Into<String>) {
        self.texts.insert(id, text.into());
    }

    /// Mutable text for an edit widget, created empty on first access.
    pub fn entry(&mut self, id: RegionId) -> &mut String {
        self.texts.entry(id).or_default()
    }

    /// Forget instructions for regions that no longer exist.
    pub fn prune(&mut self, regions: &[Region]) {
        self.texts
            .retain(|id, _| regions.iter().any(|region| region.id == *id));
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }

    /// One line per region: `#id[x,y,w,h]: instruction`.
    pub fn compose_prompt(&self, regions: &[Region]) -> String {
        if regions.is_empty() {
            return String::new();
        }
        let mut lines = vec![
            "Edit each region below separately (coordinates are source pixels, format #id[x,y,w,h]):"
                .to_string(),
        ];
        for region in regions {
            let text = self.get(region.id).trim();
            let text = if text.is_empty() {
                "(describe the change for this region)"
            } else {
                text
            };
            lines.push(format!("#{}[{}]: {}", region.id, region.to_xywh_string(), text));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RectShape, Style};
    use egui::{pos2, vec2, Color32, Rect};

    fn add_rect(scene: &mut Scene, x: f32, y: f32, w: f32, h: f32, id: Option<RegionId>) {
        scene.add(
            Shape::Rect(RectShape::new(
                Rect::from_min_size(pos2(x, y), vec2(w, h)),
                Style::filled(Color32::RED, Color32::RED, 2.0),
                id,
            )),
            false,
        );
    }

    #[test]
    fn test_sorted_and_clamped() {
        let mut scene = Scene::new(Color32::GRAY);
        add_rect(&mut scene, 90.0, 90.0, 50.0, 50.0, Some(5));
        add_rect(&mut scene, -10.0, 10.0, 30.0, 10.0, Some(2));
        let mut sync = RegionSync::default();
        assert!(sync.recompute(&mut scene, vec2(100.0, 100.0)));

        let regions = sync.regions();
        assert_eq!(regions.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(regions[0].x, 0.0);
        assert_eq!(regions[0].width, 20.0);
        assert_eq!(regions[1].width, 10.0);
        assert_eq!(regions[1].height, 10.0);
    }

    #[test]
    fn test_assigns_missing_ids_past_seen_ones() {
        let mut scene = Scene::new(Color32::GRAY);
        add_rect(&mut scene, 0.0, 0.0, 5.0, 5.0, Some(7));
        add_rect(&mut scene, 0.0, 0.0, 5.0, 5.0, None);
        let mut sync = RegionSync::default();
        sync.recompute(&mut scene, vec2(100.0, 100.0));
        assert_eq!(sync.regions().iter().map(|r| r.id).collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(sync.allocate(), 9);
    }

    #[test]
    fn test_recompute_reports_no_change() {
        let mut scene = Scene::new(Color32::GRAY);
        add_rect(&mut scene, 0.0, 0.0, 5.0, 5.0, Some(1));
        let mut sync = RegionSync::default();
        assert!(sync.recompute(&mut scene, vec2(10.0, 10.0)));
        assert!(!sync.recompute(&mut scene, vec2(10.0, 10.0)));
    }

    #[test]
    fn test_prune_drops_stale_instructions() {
        let mut notes = RegionInstructions::default();
        notes.set(1, "sky");
        notes.set(2, "tree");
        let regions = [Region {
            id: 2,
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }];
        notes.prune(&regions);
        assert_eq!(notes.get(1), "");
        assert_eq!(notes.get(2), "tree");
    }

    #[test]
    fn test_compose_prompt() {
        let mut notes = RegionInstructions::default();
        notes.set(3, "  make it blue ");
        let regions = [
            Region {
                id: 3,
                x: 10.2,
                y: 20.7,
                width: 50.0,
                height: 49.5,
            },
            Region {
                id: 4,
                x: 0.0,
                y: 0.0,
                width: 5.0,
                height: 5.0,
            },
        ];
        let prompt = notes.compose_prompt(&regions);
        let lines: Vec<_> = prompt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "#3[10,21,50,50]: make it blue");
        assert!(lines[2].starts_with("#4[0,0,5,5]: ("));
        assert!(notes.compose_prompt(&[]).is_empty());
    }
}
