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

//! # Lumen Agents
//!
//! The orchestration layer. Agents own the per-entity effect state (trail
//! registry, constellation lines), decide lifecycle transitions each tick,
//! and feed the lanes' geometry into the multi-pass render compositor.
//!
//! [`VfxAgent`] is the facade a host talks to.

#![warn(missing_docs)]

pub mod compositor;
pub mod constellation_agent;
pub mod trail_agent;
pub mod vfx_agent;

pub use compositor::{BlendScope, CompositeItem, CompositeStats, LineSegment, RenderCompositor};
pub use vfx_agent::VfxAgent;
