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

use std::collections::BTreeMap;

use lumen_core::math::{saturate, Vec2};
use lumen_core::settings::{ConstellationStyle, VerletSettings};
use lumen_core::vfx::OwnerLiveness;
use lumen_core::{ConstellationId, EffectFlags, OwnerId};
use lumen_lanes::physics_lane::VerletChain;

/// Counts of what one [`ConstellationAgent::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstellationSweep {
    /// Chains advanced by one tick.
    pub stepped: usize,
    /// Lines that started fading because their owner is gone.
    pub dissolved: usize,
    /// Lines whose fade finished.
    pub retired: usize,
    /// Lines removed because their owner is gone.
    pub pruned: usize,
}

#[derive(Debug, Clone)]
struct Constellation {
    chain: VerletChain,
    style: ConstellationStyle,
    flags: EffectFlags,
    owner: Option<OwnerId>,
    anchors: (Vec2, Vec2),
    fade_started: Option<u64>,
}

/// A read-only view of a constellation line.
#[derive(Debug, Clone, Copy)]
pub struct ConstellationView<'a> {
    /// The line's handle.
    pub id: ConstellationId,
    /// The simulated chain.
    pub chain: &'a VerletChain,
    /// How the line looks.
    pub style: &'a ConstellationStyle,
    /// `1` until dissolved, then falling to `0` over the fade window.
    pub opacity: f32,
}

/// The agent owning every constellation line.
#[derive(Debug, Clone)]
pub struct ConstellationAgent {
    verlet: VerletSettings,
    fade_ticks: u64,
    lines: BTreeMap<ConstellationId, Constellation>,
    next_id: u64,
    tick: u64,
}

impl Default for ConstellationAgent {
    fn default() -> Self {
        Self::new(VerletSettings::default(), 20)
    }
}

impl ConstellationAgent {
    /// Creates an empty agent. Every chain uses `verlet`, with the line's gravity added to the bias.
    pub fn new(verlet: VerletSettings, fade_ticks: u64) -> Self {
        Self {
            verlet,
            fade_ticks: fade_ticks.max(1),
            lines: BTreeMap::new(),
            next_id: 1,
            tick: 0,
        }
    }

    /// Hangs a new line of `segments` links between two anchors.
    pub fn create(
        &mut self,
        anchor_a: Vec2,
        anchor_b: Vec2,
        segments: usize,
        style: ConstellationStyle,
        flags: EffectFlags,
    ) -> ConstellationId {
        let id = ConstellationId(self.next_id);
        self.next_id += 1;

        let settings = VerletSettings {
            bias: self.verlet.bias + style.gravity,
            ..self.verlet
        };
        let chain = VerletChain::new(anchor_a, anchor_b, segments, style.slack, settings);
        let anchors = chain.anchors();
        log::debug!(
            "{id}: created with {} segments, rest length {:.2}",
            chain.segment_count(),
            chain.rest_length()
        );
        self.lines.insert(
            id,
            Constellation {
                chain,
                style,
                flags,
                owner: None,
                anchors,
                fade_started: None,
            },
        );
        id
    }

    /// Sets where the line's anchors will be pinned on the next tick.
    pub fn move_anchors(&mut self, id: ConstellationId, anchor_a: Vec2, anchor_b: Vec2) -> bool {
        match self.lines.get_mut(&id) {
            Some(line) => {
                line.anchors = (anchor_a, anchor_b);
                true
            }
            None => false,
        }
    }

    /// Ties the line's lifetime to `owner` for the liveness sweep.
    pub fn bind(&mut self, id: ConstellationId, owner: OwnerId) -> bool {
        match self.lines.get_mut(&id) {
            Some(line) => {
                line.owner = Some(owner);
                true
            }
            None => false,
        }
    }

    /// Starts fading the line out. Returns `false` for unknown or already fading lines.
    pub fn dissolve(&mut self, id: ConstellationId) -> bool {
        let tick = self.tick;
        match self.lines.get_mut(&id) {
            Some(line) if line.fade_started.is_none() => {
                line.fade_started = Some(tick);
                log::debug!("{id}: dissolving");
                true
            }
            _ => false,
        }
    }

    /// Steps every chain once and applies the lifecycle rules.
    ///
    /// Lines bound to a dead owner are removed, or dissolved with
    /// [`EffectFlags::FADE_ON_PRUNE`], unless they carry
    /// [`EffectFlags::EXEMPT_FROM_SWEEP`]. Unbound lines live until dissolved.
    pub fn update<L: OwnerLiveness + ?Sized>(
        &mut self,
        tick: u64,
        liveness: &L,
    ) -> ConstellationSweep {
        self.tick = self.tick.max(tick);
        let now = self.tick;
        let fade_ticks = self.fade_ticks;
        let mut sweep = ConstellationSweep::default();

        self.lines.retain(|id, line| {
            let orphaned = line
                .owner
                .is_some_and(|owner| !liveness.is_alive(owner))
                && !line.flags.contains(EffectFlags::EXEMPT_FROM_SWEEP);
            if orphaned {
                if !line.flags.contains(EffectFlags::FADE_ON_PRUNE) {
                    log::debug!("{id}: pruned, owner is gone");
                    sweep.pruned += 1;
                    return false;
                }
                if line.fade_started.is_none() {
                    line.fade_started = Some(now);
                    sweep.dissolved += 1;
                }
            }

            if let Some(started) = line.fade_started {
                if fade_progress(now, started, fade_ticks) >= 1.0 {
                    sweep.retired += 1;
                    return false;
                }
            }

            let (a, b) = line.anchors;
            line.chain.step(a, b);
            sweep.stepped += 1;
            true
        });

        log::trace!("Constellation update at tick {now}: {sweep:?}");
        sweep
    }

    /// A view of one line.
    pub fn view(&self, id: ConstellationId) -> Option<ConstellationView<'_>> {
        self.lines.get(&id).map(|line| self.make_view(id, line))
    }

    /// Views of every line, in creation order.
    pub fn views(&self) -> impl Iterator<Item = ConstellationView<'_>> + '_ {
        self.lines.iter().map(move |(&id, line)| self.make_view(id, line))
    }

    fn make_view<'a>(
        &'a self,
        id: ConstellationId,
        line: &'a Constellation,
    ) -> ConstellationView<'a> {
        let opacity = match line.fade_started {
            Some(started) => 1.0 - fade_progress(self.tick, started, self.fade_ticks),
            None => 1.0,
        };
        ConstellationView {
            id,
            chain: &line.chain,
            style: &line.style,
            opacity,
        }
    }

    /// Union of the capabilities of every line bound to `owner`.
    pub fn flags_of_owner(&self, owner: OwnerId) -> EffectFlags {
        self.lines
            .values()
            .filter(|line| line.owner == Some(owner))
            .fold(EffectFlags::EMPTY, |acc, line| acc.with(line.flags))
    }

    /// Capabilities of one line.
    pub fn flags(&self, id: ConstellationId) -> Option<EffectFlags> {
        self.lines.get(&id).map(|line| line.flags)
    }

    /// Number of lines alive.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line. Handles are never reused.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.tick = 0;
    }
}

fn fade_progress(tick: u64, started: u64, fade_ticks: u64) -> f32 {
    saturate(tick.saturating_sub(started) as f32 / fade_ticks.max(1) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive(_: OwnerId) -> bool {
        true
    }

    fn dead(_: OwnerId) -> bool {
        false
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut agent = ConstellationAgent::default();
        let style = ConstellationStyle::default;
        let a = agent.create(Vec2::ZERO, Vec2::X, 4, style(), EffectFlags::EMPTY);
        agent.reset();
        let b = agent.create(Vec2::ZERO, Vec2::X, 4, style(), EffectFlags::EMPTY);
        assert!(b > a);
        assert!(agent.view(a).is_none());
    }

    #[test]
    fn test_anchors_follow_after_update() {
        let mut agent = ConstellationAgent::default();
        let id = agent.create(
            Vec2::ZERO,
            Vec2::new(80.0, 0.0),
            8,
            ConstellationStyle::default(),
            EffectFlags::EMPTY,
        );
        assert!(agent.move_anchors(id, Vec2::new(10.0, 10.0), Vec2::new(90.0, 20.0)));
        agent.update(1, &alive);
        let anchors = agent.view(id).map(|v| v.chain.anchors());
        assert_eq!(anchors, Some((Vec2::new(10.0, 10.0), Vec2::new(90.0, 20.0))));
    }

    #[test]
    fn test_dissolve_fades_out() {
        let mut agent = ConstellationAgent::new(VerletSettings::default(), 2);
        let style = ConstellationStyle::default();
        let id = agent.create(Vec2::ZERO, Vec2::X * 10.0, 3, style, EffectFlags::EMPTY);
        assert!(agent.dissolve(id));
        assert!(!agent.dissolve(id));
        agent.update(1, &alive);
        assert_eq!(agent.view(id).map(|v| v.opacity), Some(0.5));
        let sweep = agent.update(2, &alive);
        assert_eq!(sweep.retired, 1);
        assert!(agent.is_empty());
    }

    #[test]
    fn test_bound_lines_follow_owner() {
        let mut agent = ConstellationAgent::default();
        let style = ConstellationStyle::default;
        let plain = agent.create(Vec2::ZERO, Vec2::X, 2, style(), EffectFlags::EMPTY);
        let fading = agent.create(Vec2::ZERO, Vec2::X, 2, style(), EffectFlags::FADE_ON_PRUNE);
        let exempt = agent.create(Vec2::ZERO, Vec2::X, 2, style(), EffectFlags::EXEMPT_FROM_SWEEP);
        let unbound = agent.create(Vec2::ZERO, Vec2::X, 2, style(), EffectFlags::EMPTY);
        for id in [plain, fading, exempt] {
            assert!(agent.bind(id, OwnerId(5)));
        }
        assert_eq!(
            agent.flags_of_owner(OwnerId(5)),
            EffectFlags::FADE_ON_PRUNE | EffectFlags::EXEMPT_FROM_SWEEP
        );

        let sweep = agent.update(1, &dead);
        assert_eq!(sweep.pruned, 1);
        assert_eq!(sweep.dissolved, 1);
        assert!(agent.view(plain).is_none());
        assert!(agent.view(fading).is_some_and(|v| v.opacity == 1.0));
        assert!(agent.view(exempt).is_some());
        assert!(agent.view(unbound).is_some());
    }
}
