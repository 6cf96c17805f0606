// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! History system for undo/redo functionality.
//!
//! A linear list of scene snapshots with a cursor. Committing after an undo
//! prunes the redo branch. Moving the cursor does not rebuild the scene
//! immediately: it queues a restore request tagged with a generation token,
//! and the editor applies only the most recent request on the next frame.

use crate::models::Snapshot;
use crate::util::generation::{Generation, Token};

/// A queued request to rebuild the scene from one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreRequest {
    pub token: Token,
    pub step: usize,
}

/// Snapshot stack with a current index.
#[derive(Debug)]
pub struct History {
    /// Snapshots, oldest first. Never empty.
    entries: Vec<Snapshot>,
    /// Index of the entry the scene currently reflects.
    index: usize,
    /// Maximum number of retained entries
    max_depth: usize,
    generation: Generation,
    pending: Vec<RestoreRequest>,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: vec![Vec::new()],
            index: 0,
            max_depth: max_depth.max(1),
            generation: Generation::default(),
            pending: Vec::new(),
        }
    }

    /// Drop everything and start over from an empty scene.
    pub fn reset(&mut self) {
        self.entries = vec![Vec::new()];
        self.index = 0;
        self.generation.invalidate();
        self.pending.clear();
    }

    /// Record the scene state produced by a completed edit.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.max_depth {
            let excess = self.entries.len() - self.max_depth;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
        log::debug!("History commit: {} entries, index {}", self.entries.len(), self.index);
    }

    /// Step back one entry. Returns the queued restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<RestoreRequest> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.queue_restore())
    }

    /// Step forward one entry. Returns the queued restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<RestoreRequest> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.queue_restore())
    }

    fn queue_restore(&mut self) -> RestoreRequest {
        let request = RestoreRequest {
            token: self.generation.next(),
            step: self.index,
        };
        self.pending.push(request);
        request
    }

    /// Take the restore that should be applied now, discarding superseded
    /// requests.
    pub fn take_restore(&mut self) -> Option<(RestoreRequest, &Snapshot)> {
        let mut latest = None;
        for request in self.pending.drain(..) {
            if self.generation.is_current(request.token) {
                latest = Some(request);
            } else {
                log::debug!("Discarding superseded restore to step {}", request.step);
            }
        }
        let request = latest?;
        self.entries.get(request.step).map(|snapshot| (request, snapshot))
    }

    /// True while a restore request is queued and not yet applied.
    pub fn is_restoring(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index]
    }
}
