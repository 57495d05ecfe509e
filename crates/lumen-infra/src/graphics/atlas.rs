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

use std::collections::HashMap;

use lumen_core::math::Vec2;
use lumen_core::vfx::{Brush, TextureId, TextureProvider};

/// A static table mapping each brush to a texture handle.
///
/// The default table assigns ids `1` (pixel) and `2` (soft glow); a host that
/// uploads its own textures overrides them with [`BrushAtlas::with`].
/// Every brush is a single texel unless a size is given.
#[derive(Debug, Clone)]
pub struct BrushAtlas {
    textures: HashMap<Brush, (TextureId, Vec2)>,
}

impl Default for BrushAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushAtlas {
    /// Creates the default table.
    pub fn new() -> Self {
        let mut textures = HashMap::new();
        textures.insert(Brush::Pixel, (TextureId(1), Vec2::ONE));
        textures.insert(Brush::SoftGlow, (TextureId(2), Vec2::ONE));
        Self { textures }
    }

    /// Binds `brush` to a single-texel `texture`.
    pub fn with(self, brush: Brush, texture: TextureId) -> Self {
        self.with_sized(brush, texture, Vec2::ONE)
    }

    /// Binds `brush` to `texture`, whose size in texels is `size`.
    pub fn with_sized(mut self, brush: Brush, texture: TextureId, size: Vec2) -> Self {
        let size = if size.is_finite() && size.x > 0.0 && size.y > 0.0 {
            size
        } else {
            log::warn!("Ignoring invalid size {:?} for brush {:?}", size, brush);
            Vec2::ONE
        };
        self.textures.insert(brush, (texture, size));
        self
    }
}

impl TextureProvider for BrushAtlas {
    fn brush(&self, brush: Brush) -> TextureId {
        self.textures
            .get(&brush)
            .map(|(id, _)| *id)
            .unwrap_or(TextureId(0))
    }

    fn brush_size(&self, brush: Brush) -> Vec2 {
        self.textures
            .get(&brush)
            .map(|(_, size)| *size)
            .unwrap_or(Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_override() {
        let atlas = BrushAtlas::new().with(Brush::SoftGlow, TextureId(42));
        assert_eq!(atlas.brush(Brush::Pixel), TextureId(1));
        assert_eq!(atlas.brush(Brush::SoftGlow), TextureId(42));
        assert_eq!(atlas.brush_size(Brush::SoftGlow), Vec2::ONE);
    }

    #[test]
    fn test_sized_brush() {
        let atlas = BrushAtlas::new()
            .with_sized(Brush::SoftGlow, TextureId(7), Vec2::new(64.0, 32.0))
            .with_sized(Brush::Pixel, TextureId(8), Vec2::new(0.0, 1.0));
        assert_eq!(atlas.brush_size(Brush::SoftGlow), Vec2::new(64.0, 32.0));
        assert_eq!(atlas.brush_size(Brush::Pixel), Vec2::ONE);
    }
}
