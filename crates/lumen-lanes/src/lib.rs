// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Lumen Lanes
//!
//! Hot-path pipelines executed every tick or every frame: the bounded
//! position history, the Catmull-Rom smoother, the ribbon mesh builder with
//! its tapering functions, and the Verlet line solver.
//!
//! Lanes hold no registry state of their own; the agents in `lumen-agents`
//! own the per-entity data and drive these pipelines.

#![warn(missing_docs)]

pub mod geometry_lane;
pub mod history_lane;
pub mod physics_lane;
