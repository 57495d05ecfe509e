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

//! # Lumen Core
//!
//! Foundational crate containing the math primitives, collaborator contracts
//! (rendering backend, brush textures, simulation clock), settings and error
//! types shared by every other Lumen crate.

#![warn(missing_docs)]

pub mod error;
pub mod flags;
pub mod ids;
pub mod math;
pub mod settings;
pub mod utils;
pub mod vfx;

pub use error::{BackendError, ConfigError};
pub use flags::EffectFlags;
pub use ids::{ConstellationId, OwnerId};
pub use settings::VfxSettings;
