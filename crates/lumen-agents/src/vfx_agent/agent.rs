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

//! Defines the VfxAgent, the facade over every line effect.

use lumen_core::math::Vec2;
use lumen_core::settings::{validate_trail_style, ConstellationStyle, TrailStyle, VfxSettings};
use lumen_core::vfx::{OwnerLiveness, SimulationClock, TextureProvider, VfxBackend};
use lumen_core::{ConfigError, ConstellationId, EffectFlags, OwnerId};
use lumen_lanes::geometry_lane::{ColorFunction, Mesh, WidthFunction};

use super::geometry::{
    constellation_geometry, pool_slot, styled_trail_ribbon, trail_ribbon, FrameScratch,
    LineGeometry,
};
use crate::compositor::{CompositeItem, CompositeStats, PassSequence, RenderCompositor};
use crate::constellation_agent::{ConstellationAgent, ConstellationSweep};
use crate::trail_agent::{TrailAgent, TrailSweep};

/// What one [`VfxAgent::update_all`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VfxUpdate {
    /// Trail lifecycle transitions.
    pub trails: TrailSweep,
    /// Constellation steps and transitions.
    pub constellations: ConstellationSweep,
}

enum Slot {
    Ribbon(usize),
    Lines(usize),
}

/// The facade over trails, constellation lines and the compositor.
#[derive(Debug)]
pub struct VfxAgent {
    settings: VfxSettings,
    trails: TrailAgent,
    constellations: ConstellationAgent,
    compositor: RenderCompositor,
    scratch: FrameScratch,
}

impl Default for VfxAgent {
    fn default() -> Self {
        let settings = VfxSettings::default();
        Self {
            trails: TrailAgent::new(settings.trails.clone()),
            constellations: ConstellationAgent::new(settings.verlet, settings.trails.fade_ticks),
            compositor: RenderCompositor::new(PassSequence::default()),
            scratch: FrameScratch::default(),
            settings,
        }
    }
}

impl VfxAgent {
    /// Creates an agent from validated settings.
    pub fn new(settings: VfxSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let compositor = RenderCompositor::from_settings(&settings.compositor)?;
        log::info!(
            "VfxAgent: {} compositor passes, trail capacity {}",
            compositor.sequence().passes().len(),
            settings.trails.default_style.capacity
        );
        Ok(Self {
            trails: TrailAgent::new(settings.trails.clone()),
            constellations: ConstellationAgent::new(settings.verlet, settings.trails.fade_ticks),
            compositor,
            scratch: FrameScratch::default(),
            settings,
        })
    }

    /// The settings the agent was built with.
    pub fn settings(&self) -> &VfxSettings {
        &self.settings
    }

    /// The trail registry.
    pub fn trails(&self) -> &TrailAgent {
        &self.trails
    }

    /// The constellation registry.
    pub fn constellations(&self) -> &ConstellationAgent {
        &self.constellations
    }

    // --- Trails ---

    /// Records the owner's position, starting a default trail on first use.
    ///
    /// The sample is stamped with the tick of the last [`update_all`](Self::update_all).
    pub fn record_position(&mut self, owner: OwnerId, position: Vec2, orientation: f32) {
        self.trails.record_position(owner, position, orientation);
    }

    /// Records the owner's position stamped with the clock's current tick.
    ///
    /// Use this when positions are recorded before `update_all` in a tick.
    pub fn record_position_at<C>(
        &mut self,
        owner: OwnerId,
        position: Vec2,
        orientation: f32,
        clock: &C,
    ) where
        C: SimulationClock + ?Sized,
    {
        self.trails
            .record_position_at(owner, position, orientation, clock.tick());
    }

    /// Starts a trail with an explicit style and capabilities.
    ///
    /// Returns `false` if the style is invalid or the owner is already building a trail.
    pub fn begin_trail(&mut self, owner: OwnerId, style: TrailStyle, flags: EffectFlags) -> bool {
        if let Err(err) = validate_trail_style(&style) {
            log::warn!("{owner}: rejected trail style: {err}");
            return false;
        }
        self.trails.begin_trail(owner, style, flags)
    }

    /// Freezes the owner's trail and lets it fade out.
    pub fn end_trail(&mut self, owner: OwnerId) -> bool {
        self.trails.end_trail(owner)
    }

    /// Builds the world-space mesh of the owner's newest trail, without compositing it.
    pub fn trail_mesh(&mut self, owner: OwnerId, fraction: f32) -> Option<Mesh> {
        let view = self.trails.view(owner)?;
        let FrameScratch { raw, centerline, .. } = &mut self.scratch;
        let mut mesh = Mesh::new();
        styled_trail_ribbon(&view, fraction, raw, centerline, &mut mesh);
        Some(mesh)
    }

    /// Composites the owner's newest trail with the functions its style describes.
    ///
    /// An owner without a trail draws nothing.
    pub fn render_trail<B, T, C>(
        &mut self,
        owner: OwnerId,
        backend: &mut B,
        textures: &T,
        clock: &C,
    ) -> CompositeStats
    where
        B: VfxBackend + ?Sized,
        T: TextureProvider + ?Sized,
        C: SimulationClock + ?Sized,
    {
        let Self {
            trails,
            compositor,
            scratch,
            ..
        } = self;
        let Some(view) = trails.view(owner) else {
            return CompositeStats::default();
        };
        let FrameScratch {
            raw,
            centerline,
            meshes,
            ..
        } = scratch;
        let mesh = pool_slot(meshes, 0);
        styled_trail_ribbon(&view, clock.sub_tick_fraction(), raw, centerline, mesh);
        let item = CompositeItem::ribbon(mesh).with_opacity(view.opacity());
        compositor.composite(backend, textures, &[item])
    }

    /// Composites the owner's newest trail with caller-supplied width and color functions.
    pub fn render_trail_custom<B, T, C>(
        &mut self,
        owner: OwnerId,
        width: &dyn WidthFunction,
        color: &dyn ColorFunction,
        backend: &mut B,
        textures: &T,
        clock: &C,
    ) -> CompositeStats
    where
        B: VfxBackend + ?Sized,
        T: TextureProvider + ?Sized,
        C: SimulationClock + ?Sized,
    {
        let Self {
            trails,
            compositor,
            scratch,
            ..
        } = self;
        let Some(view) = trails.view(owner) else {
            return CompositeStats::default();
        };
        let FrameScratch {
            raw,
            centerline,
            meshes,
            ..
        } = scratch;
        let mesh = pool_slot(meshes, 0);
        trail_ribbon(&view, clock.sub_tick_fraction(), width, color, raw, centerline, mesh);
        let item = CompositeItem::ribbon(mesh).with_opacity(view.opacity());
        compositor.composite(backend, textures, &[item])
    }

    // --- Constellations ---

    /// Hangs a line of `segment_count` links between two anchors.
    pub fn create_constellation(
        &mut self,
        anchor_a: Vec2,
        anchor_b: Vec2,
        segment_count: usize,
        style: ConstellationStyle,
    ) -> ConstellationId {
        self.create_constellation_with_flags(
            anchor_a,
            anchor_b,
            segment_count,
            style,
            EffectFlags::EMPTY,
        )
    }

    /// Like [`create_constellation`](Self::create_constellation), with explicit capabilities.
    pub fn create_constellation_with_flags(
        &mut self,
        anchor_a: Vec2,
        anchor_b: Vec2,
        segment_count: usize,
        style: ConstellationStyle,
        flags: EffectFlags,
    ) -> ConstellationId {
        self.constellations
            .create(anchor_a, anchor_b, segment_count, style, flags)
    }

    /// Moves a line's anchors; the chain follows on the next update.
    pub fn move_constellation_anchors(
        &mut self,
        id: ConstellationId,
        anchor_a: Vec2,
        anchor_b: Vec2,
    ) -> bool {
        self.constellations.move_anchors(id, anchor_a, anchor_b)
    }

    /// Ties a line's lifetime to an owner.
    pub fn bind_constellation(&mut self, id: ConstellationId, owner: OwnerId) -> bool {
        self.constellations.bind(id, owner)
    }

    /// Fades a line out.
    pub fn dissolve_constellation(&mut self, id: ConstellationId) -> bool {
        self.constellations.dissolve(id)
    }

    // --- Frame ---

    /// Capabilities of every effect the owner currently has.
    pub fn capabilities_of(&self, owner: OwnerId) -> EffectFlags {
        let trail = self.trails.flags_of(owner).unwrap_or(EffectFlags::EMPTY);
        trail | self.constellations.flags_of_owner(owner)
    }

    /// Runs one simulation tick: lifecycle sweeps and one Verlet step per line.
    pub fn update_all<C, L>(&mut self, clock: &C, liveness: &L) -> VfxUpdate
    where
        C: SimulationClock + ?Sized,
        L: OwnerLiveness + ?Sized,
    {
        let tick = clock.tick();
        VfxUpdate {
            trails: self.trails.update(tick, liveness),
            constellations: self.constellations.update(tick, liveness),
        }
    }

    /// Composites every visible effect, batched by pass.
    pub fn render_all<B, T, C>(
        &mut self,
        backend: &mut B,
        textures: &T,
        clock: &C,
    ) -> CompositeStats
    where
        B: VfxBackend + ?Sized,
        T: TextureProvider + ?Sized,
        C: SimulationClock + ?Sized,
    {
        let Self {
            trails,
            constellations,
            compositor,
            scratch,
            ..
        } = self;
        let FrameScratch {
            raw,
            centerline,
            meshes,
            lines,
        } = scratch;
        let fraction = clock.sub_tick_fraction();

        let mut slots = Vec::new();
        let (mut mesh_count, mut line_count) = (0, 0);
        for view in trails.views() {
            let mesh = pool_slot(meshes, mesh_count);
            styled_trail_ribbon(&view, fraction, raw, centerline, mesh);
            if !mesh.is_empty() {
                slots.push((Slot::Ribbon(mesh_count), view.opacity()));
                mesh_count += 1;
            }
        }
        for view in constellations.views() {
            let mesh = pool_slot(meshes, mesh_count);
            let list = pool_slot(lines, line_count);
            match constellation_geometry(&view, raw, mesh, list) {
                LineGeometry::Ribbon => {
                    slots.push((Slot::Ribbon(mesh_count), view.opacity));
                    mesh_count += 1;
                }
                LineGeometry::Lines => {
                    slots.push((Slot::Lines(line_count), view.opacity));
                    line_count += 1;
                }
            }
        }

        let items: Vec<CompositeItem<'_>> = slots
            .iter()
            .map(|(slot, opacity)| {
                let item = match *slot {
                    Slot::Ribbon(i) => CompositeItem::ribbon(&meshes[i]),
                    Slot::Lines(i) => CompositeItem::lines(&lines[i]),
                };
                item.with_opacity(*opacity)
            })
            .collect();
        let stats = compositor.composite(backend, textures, &items);
        log::trace!("Rendered {} effects: {stats}", items.len());
        stats
    }

    /// Drops every effect. Call at world or session boundaries.
    pub fn reset(&mut self) {
        log::info!(
            "VfxAgent: reset ({} trails, {} constellations)",
            self.trails.building_count() + self.trails.fading_count(),
            self.constellations.len()
        );
        self.trails.reset();
        self.constellations.reset();
    }
}
