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

//! Opaque brush texture handles.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// An opaque handle to a texture owned by the host. Lumen never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// The brush stamps the compositor draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Brush {
    /// A single solid white pixel.
    #[default]
    Pixel,
    /// A soft radial gradient, bright in the middle and transparent at the edge.
    SoftGlow,
}

/// Supplies texture handles for the brush stamps.
pub trait TextureProvider {
    /// Returns the texture to stamp with for `brush`.
    fn brush(&self, brush: Brush) -> TextureId;

    /// Size of the brush texture in texels. Stretched quads divide by it.
    fn brush_size(&self, _brush: Brush) -> Vec2 {
        Vec2::ONE
    }
}
