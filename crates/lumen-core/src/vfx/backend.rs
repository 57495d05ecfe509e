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

//! Defines the rendering backend trait and the draw primitives it accepts.

use super::blend::BlendConfig;
use super::texture::TextureId;
use crate::error::BackendError;
use crate::math::{LinearRgba, Vec2};

/// A single vertex of a ribbon mesh.
///
/// `#[repr(C)]` and `Pod` so a GPU backend can upload a vertex slice as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RibbonVertex {
    /// Position in world (or, once offset, screen) units.
    pub position: Vec2,
    /// Vertex color in linear space.
    pub color: LinearRgba,
    /// Texture coordinates: `x` runs along the ribbon, `y` across it.
    pub uv: Vec2,
}

/// A sub-rectangle of a texture, in texels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width of the region.
    pub width: f32,
    /// Height of the region.
    pub height: f32,
}

/// Texture mirroring applied to a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirror {
    /// Draw as-is.
    #[default]
    None,
    /// Flip along the vertical axis.
    Horizontal,
    /// Flip along the horizontal axis.
    Vertical,
}

/// A textured quad draw request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadDraw {
    /// The texture to stamp.
    pub texture: TextureId,
    /// Screen-space position of the quad's origin.
    pub position: Vec2,
    /// Region of the texture to sample; `None` samples the whole texture.
    pub source: Option<SourceRect>,
    /// Tint color.
    pub color: LinearRgba,
    /// Rotation around `origin`, in radians.
    pub rotation: f32,
    /// Rotation/scale pivot, in texels of the source region.
    pub origin: Vec2,
    /// Non-uniform scale applied to the source region.
    pub scale: Vec2,
    /// Mirroring.
    pub mirror: Mirror,
}

/// The rendering backend Lumen composites through.
///
/// Drawing happens inside batches. A batch is opened with a [`BlendConfig`]
/// and must be closed before another one can be opened. Implementations
/// report scoping mistakes as [`BackendError`]s instead of panicking; the
/// compositor decides what to do with them.
pub trait VfxBackend {
    /// Opens a drawing batch with the given blend/sampler configuration.
    fn begin_batch(&mut self, config: BlendConfig) -> Result<(), BackendError>;

    /// Closes the currently open batch.
    fn end_batch(&mut self) -> Result<(), BackendError>;

    /// Returns the configuration of the open batch, if any.
    fn active_batch(&self) -> Option<BlendConfig>;

    /// Draws a textured quad.
    fn draw_quad(&mut self, quad: &QuadDraw);

    /// Draws an indexed triangle list.
    fn draw_indexed(&mut self, texture: TextureId, vertices: &[RibbonVertex], indices: &[u32]);

    /// The current world-to-screen offset, subtracted from world positions before drawing.
    fn screen_offset(&self) -> Vec2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ribbon_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<RibbonVertex>(), 8 * std::mem::size_of::<f32>());
        let vertices = [RibbonVertex::default(); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 64);
    }
}
