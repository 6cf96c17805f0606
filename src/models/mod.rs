// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Scene object model.

pub mod object;
pub mod scene;

pub use object::{ObjectId, RectShape, RegionId, SceneObject, Shape, StrokeShape, Style};
pub use scene::{Background, Scene, Snapshot};
