// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame coalescing of high-frequency state.
//!
//! Pointer moves can arrive many times per frame. Values scheduled here are
//! published at most once per frame; the latest scheduled value wins.

/// A value that is published on frame boundaries.
#[derive(Debug, Default)]
pub struct Coalesced<T> {
    pending: Option<T>,
    published: T,
}

impl<T: Clone> Coalesced<T> {
    pub fn new(initial: T) -> Self {
        Self {
            pending: None,
            published: initial,
        }
    }

    /// Queue a value for the next frame, replacing any queued one.
    pub fn schedule(&mut self, value: T) {
        self.pending = Some(value);
    }

    /// Publish the queued value. Returns true if anything changed hands.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(value) => {
                self.published = value;
                true
            }
            None => false,
        }
    }

    /// Drop the queued value and publish `value` immediately.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.published = value;
    }

    /// The value visible to the host.
    pub fn get(&self) -> &T {
        &self.published
    }
}
