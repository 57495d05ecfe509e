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

use std::fmt;
use std::ops::AddAssign;

use lumen_core::math::{saturate, LinearRgba, Vec2, EPSILON};
use lumen_core::settings::{validate_passes, CompositorSettings, PassDescriptor};
use lumen_core::vfx::{Mirror, QuadDraw, TextureProvider, VfxBackend};
use lumen_core::ConfigError;
use lumen_lanes::geometry_lane::Mesh;

use super::BlendScope;

/// One straight piece of a line list, drawn as a stretched quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Start point in world units.
    pub start: Vec2,
    /// End point in world units.
    pub end: Vec2,
    /// Full width at pass scale `1.0`.
    pub width: f32,
    /// Color before pass tinting.
    pub color: LinearRgba,
}

/// The geometry of one effect.
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    /// A ribbon mesh in world units.
    Ribbon(&'a Mesh),
    /// A list of independent segments.
    Lines(&'a [LineSegment]),
}

impl Geometry<'_> {
    fn is_empty(&self) -> bool {
        match self {
            Geometry::Ribbon(mesh) => mesh.is_empty(),
            Geometry::Lines(lines) => lines.is_empty(),
        }
    }
}

/// An effect handed to the compositor.
#[derive(Debug, Clone, Copy)]
pub struct CompositeItem<'a> {
    /// What to draw.
    pub geometry: Geometry<'a>,
    /// Multiplied into every color's alpha, in `[0, 1]`.
    pub opacity: f32,
}

impl<'a> CompositeItem<'a> {
    /// A fully opaque ribbon.
    pub fn ribbon(mesh: &'a Mesh) -> Self {
        Self {
            geometry: Geometry::Ribbon(mesh),
            opacity: 1.0,
        }
    }

    /// A fully opaque line list.
    pub fn lines(lines: &'a [LineSegment]) -> Self {
        Self {
            geometry: Geometry::Lines(lines),
            opacity: 1.0,
        }
    }

    /// Sets the opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// What a composite call submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Passes whose batch was opened.
    pub passes: u32,
    /// Draw calls submitted (one per ribbon or line segment per pass).
    pub draw_calls: u32,
    /// Ribbon vertices submitted.
    pub vertices: u32,
    /// Ribbon indices submitted.
    pub indices: u32,
    /// Passes skipped because the backend refused to open their batch.
    pub skipped: u32,
}

impl AddAssign for CompositeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.passes += rhs.passes;
        self.draw_calls += rhs.draw_calls;
        self.vertices += rhs.vertices;
        self.indices += rhs.indices;
        self.skipped += rhs.skipped;
    }
}

impl fmt::Display for CompositeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passes, {} draws, {} vertices, {} indices, {} skipped",
            self.passes, self.draw_calls, self.vertices, self.indices, self.skipped
        )
    }
}

/// A validated, ordered list of passes: widest first, no pass wider than the one before.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSequence {
    passes: Vec<PassDescriptor>,
}

impl PassSequence {
    /// Validates and wraps a pass list.
    pub fn new(passes: Vec<PassDescriptor>) -> Result<Self, ConfigError> {
        validate_passes(&passes)?;
        Ok(Self { passes })
    }

    /// The passes in draw order.
    pub fn passes(&self) -> &[PassDescriptor] {
        &self.passes
    }
}

impl Default for PassSequence {
    /// Bloom, glow, then core.
    fn default() -> Self {
        Self {
            passes: CompositorSettings::default().passes,
        }
    }
}

/// Draws effect geometry through a [`PassSequence`].
#[derive(Debug, Default)]
pub struct RenderCompositor {
    sequence: PassSequence,
    scratch: Mesh,
}

impl RenderCompositor {
    /// Creates a compositor for the given pass sequence.
    pub fn new(sequence: PassSequence) -> Self {
        Self {
            sequence,
            scratch: Mesh::new(),
        }
    }

    /// Builds a compositor from settings, validating the pass order.
    pub fn from_settings(settings: &CompositorSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(PassSequence::new(settings.passes.clone())?))
    }

    /// The pass sequence in use.
    pub fn sequence(&self) -> &PassSequence {
        &self.sequence
    }

    /// Draws every item once per pass.
    ///
    /// All items share a pass's batch, so a frame costs one batch switch per
    /// pass regardless of how many effects are alive. Positions are shifted
    /// by the backend's screen offset. Nothing is drawn, and no batch is
    /// touched, when every item is empty.
    pub fn composite<B, T>(
        &mut self,
        backend: &mut B,
        textures: &T,
        items: &[CompositeItem<'_>],
    ) -> CompositeStats
    where
        B: VfxBackend + ?Sized,
        T: TextureProvider + ?Sized,
    {
        let mut stats = CompositeStats::default();
        if items.iter().all(|item| item.geometry.is_empty()) {
            return stats;
        }

        let Self { sequence, scratch } = self;
        let offset = backend.screen_offset();
        for pass in &sequence.passes {
            let texture = textures.brush(pass.brush);
            let brush_size = textures.brush_size(pass.brush);
            let mut scope = BlendScope::begin(&mut *backend, pass.config);
            if !scope.is_active() {
                log::warn!("Skipping compositor pass '{}'", pass.label);
                stats.skipped += 1;
                continue;
            }
            stats.passes += 1;

            for item in items {
                let opacity = saturate(item.opacity);
                let tint = |color: LinearRgba| {
                    let lit = color.scale_rgb(pass.brightness).whiten(pass.whiten);
                    lit.with_alpha(color.a * opacity)
                };

                match item.geometry {
                    Geometry::Ribbon(mesh) => {
                        if mesh.is_empty() {
                            continue;
                        }
                        mesh.restyle_into(scratch, pass.width_scale, offset, tint);
                        scope.draw_indexed(texture, &scratch.vertices, &scratch.indices);
                        stats.draw_calls += 1;
                        stats.vertices += scratch.vertices.len() as u32;
                        stats.indices += scratch.indices.len() as u32;
                    }
                    Geometry::Lines(lines) => {
                        for line in lines {
                            let span = line.end - line.start;
                            let length = span.length();
                            if !(length > EPSILON && length.is_finite()) {
                                continue;
                            }
                            let width = (line.width * pass.width_scale).max(0.0);
                            scope.draw_quad(&QuadDraw {
                                texture,
                                position: line.start - offset,
                                source: None,
                                color: tint(line.color),
                                rotation: span.to_angle(),
                                origin: Vec2::new(0.0, brush_size.y * 0.5),
                                scale: Vec2::new(length / brush_size.x, width / brush_size.y),
                                mirror: Mirror::None,
                            });
                            stats.draw_calls += 1;
                        }
                    }
                }
            }
            log::trace!("Compositor pass '{}' done", pass.label);
        }
        stats
    }
}
