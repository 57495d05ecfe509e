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

//! The catalog of blend and sampler configurations a backend must support.

use serde::{Deserialize, Serialize};

/// How drawn colors combine with the color already in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Standard premultiplied alpha blending; the host's usual default.
    #[default]
    AlphaBlend,
    /// Source color is summed onto the destination. Used for glow.
    Additive,
    /// Straight (non-premultiplied) alpha blending.
    NonPremultiplied,
    /// Source replaces destination.
    Opaque,
}

/// How brush textures are filtered and addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SamplerMode {
    /// Bilinear filtering, clamped addressing.
    #[default]
    LinearClamp,
    /// Bilinear filtering, wrapped addressing (scrolling textures).
    LinearWrap,
    /// Nearest-neighbour filtering, clamped addressing.
    PointClamp,
}

/// A complete blend/sampler configuration for one drawing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlendConfig {
    /// Color blending equation.
    pub blend: BlendMode,
    /// Texture sampling state.
    pub sampler: SamplerMode,
}

impl BlendConfig {
    /// Alpha blending with linear clamped sampling.
    pub const ALPHA: Self = Self::new(BlendMode::AlphaBlend, SamplerMode::LinearClamp);
    /// Additive blending with linear clamped sampling.
    pub const ADDITIVE: Self = Self::new(BlendMode::Additive, SamplerMode::LinearClamp);

    /// Creates a new blend configuration.
    pub const fn new(blend: BlendMode, sampler: SamplerMode) -> Self {
        Self { blend, sampler }
    }
}
