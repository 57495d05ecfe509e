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

//! Provides the backend-agnostic contracts Lumen draws through.
//!
//! This module defines the "common language" between the line geometry engine
//! and whatever actually puts pixels on screen. Lumen never talks to a graphics
//! API directly: the compositor in `lumen-agents` drives a [`VfxBackend`],
//! asks a [`TextureProvider`] for brush stamps, and reads time from a
//! [`SimulationClock`]. Concrete implementations live in `lumen-infra` or in
//! the host engine.

pub mod backend;
pub mod blend;
pub mod clock;
pub mod liveness;
pub mod texture;

pub use self::backend::{Mirror, QuadDraw, RibbonVertex, SourceRect, VfxBackend};
pub use self::blend::{BlendConfig, BlendMode, SamplerMode};
pub use self::clock::SimulationClock;
pub use self::liveness::OwnerLiveness;
pub use self::texture::{Brush, TextureId, TextureProvider};
