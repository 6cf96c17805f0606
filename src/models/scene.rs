// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The scene: the ordered object list drawn over the image.
//!
//! This is the single source of truth for mask content. It is owned by the
//! editor and lent by `&mut` to the tools, the history restore, the region
//! synchronizer and the mask exporter.

use super::object::{ObjectId, RegionId, SceneObject, Shape};
use egui::{Color32, Pos2};
use std::collections::BTreeSet;

/// Serialized copy of every shape in paint order.
pub type Snapshot = Vec<serde_json::Value>;

/// What is painted behind the objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    /// Whether the source bitmap is drawn.
    pub image_visible: bool,
    pub color: Color32,
}

/// Ordered scene objects plus the current selection.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selection: BTreeSet<ObjectId>,
    next_id: ObjectId,
    pub background: Background,
}

impl Scene {
    pub fn new(background: Color32) -> Self {
        Self {
            objects: Vec::new(),
            selection: BTreeSet::new(),
            next_id: 1,
            background: Background {
                image_visible: true,
                color: background,
            },
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> std::slice::IterMut<'_, SceneObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Append a shape on top of the stack.
    pub fn add(&mut self, shape: Shape, interactive: bool) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            shape,
            interactive,
        });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|obj| obj.id == id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|obj| obj.id == id)?;
        self.selection.remove(&id);
        Some(self.objects.remove(index))
    }

    /// Remove every object matching `predicate`. Returns how many went.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&SceneObject) -> bool) -> usize {
        let before = self.objects.len();
        let selection = &mut self.selection;
        self.objects.retain(|obj| {
            let remove = predicate(obj);
            if remove {
                selection.remove(&obj.id);
            }
            !remove
        });
        before - self.objects.len()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection.clear();
    }

    /// Set the selectable flag on every object.
    pub fn set_interactive(&mut self, interactive: bool) {
        for obj in &mut self.objects {
            obj.interactive = interactive;
        }
    }

    pub fn selection(&self) -> &BTreeSet<ObjectId> {
        &self.selection
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    pub fn select(&mut self, id: ObjectId) {
        if self.get(id).is_some() {
            self.selection.insert(id);
        }
    }

    pub fn select_only(&mut self, id: ObjectId) {
        self.selection.clear();
        self.select(id);
    }

    pub fn toggle_selected(&mut self, id: ObjectId) {
        if !self.selection.remove(&id) {
            self.select(id);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    /// Topmost interactive object whose painted area contains `point`.
    pub fn topmost_at(&self, point: Pos2, tolerance: f32) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|obj| obj.interactive && obj.shape.contains(point, tolerance))
            .map(|obj| obj.id)
    }

    pub fn find_region(&self, region: RegionId) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|obj| obj.shape.region_id() == Some(region))
            .map(|obj| obj.id)
    }

    /// Serialize all shapes, excluding presentation flags.
    pub fn snapshot(&self) -> serde_json::Result<Snapshot> {
        self.objects.iter().map(|obj| obj.shape.to_snapshot()).collect()
    }

    /// Replace every object with the contents of `snapshot`.
    ///
    /// Entries that fail to reconstruct are skipped; the rest are restored.
    /// Returns the number of skipped entries.
    pub fn restore(&mut self, snapshot: &[serde_json::Value], interactive: bool) -> usize {
        self.clear();
        let mut skipped = 0;
        for value in snapshot {
            match Shape::from_snapshot(value) {
                Ok(shape) => {
                    self.add(shape, interactive);
                }
                Err(e) => {
                    log::warn!("Skipping history object that failed to restore: {}", e);
                    skipped += 1;
                }
            }
        }
        skipped
    }
}
