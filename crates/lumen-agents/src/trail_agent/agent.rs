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

//! Defines the TrailAgent and the trail lifecycle.

use std::collections::BTreeMap;

use lumen_core::math::{saturate, Vec2};
use lumen_core::settings::{TrailSettings, TrailStyle};
use lumen_core::vfx::OwnerLiveness;
use lumen_core::{EffectFlags, OwnerId};
use lumen_lanes::geometry_lane::smooth_catmull_rom_into;
use lumen_lanes::history_lane::{PositionHistory, Sample, SampleRing};

/// Where a trail is in its life.
///
/// Transitions only go forward: `Building` to `Fading` to `Retired`. Retired
/// trails are dropped from the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailPhase {
    /// Samples are still being recorded.
    Building,
    /// Frozen and fading out; `progress` runs from `0` to `1`.
    Fading {
        /// Fraction of the fade window elapsed.
        progress: f32,
    },
    /// Finished; nothing left to draw.
    Retired,
}

/// Counts of lifecycle transitions made by one [`TrailAgent::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrailSweep {
    /// Trails that started fading.
    pub faded: usize,
    /// Trails that finished fading or had nothing to show.
    pub retired: usize,
    /// Trails removed because their owner is gone.
    pub pruned: usize,
}

#[derive(Debug, Clone)]
struct BuildingTrail {
    style: TrailStyle,
    flags: EffectFlags,
    last_sample_tick: u64,
}

#[derive(Debug, Clone)]
struct FadingTrail {
    owner: OwnerId,
    style: TrailStyle,
    flags: EffectFlags,
    samples: SampleRing,
    started: u64,
}

/// A read-only view of a trail, as handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct TrailView<'a> {
    /// The owning entity.
    pub owner: OwnerId,
    /// How the trail looks.
    pub style: &'a TrailStyle,
    /// Capabilities fixed when the trail was created.
    pub flags: EffectFlags,
    /// The samples, oldest first.
    pub samples: &'a SampleRing,
    /// Current phase.
    pub phase: TrailPhase,
}

impl TrailView<'_> {
    /// `1 - fade progress`; `1` while building.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            TrailPhase::Building => 1.0,
            TrailPhase::Fading { progress } => 1.0 - progress,
            TrailPhase::Retired => 0.0,
        }
    }

    /// Writes the trail's centerline into `out`.
    ///
    /// A building trail flagged [`EffectFlags::SMOOTH_SUBTICK`] places its head
    /// `fraction` of the way between the last two samples. The result is then
    /// smoothed with the style's subdivision count. `scratch` holds the raw points.
    pub fn centerline_into(&self, fraction: f32, scratch: &mut Vec<Vec2>, out: &mut Vec<Vec2>) {
        if self.phase == TrailPhase::Building && self.flags.contains(EffectFlags::SMOOTH_SUBTICK) {
            self.samples.interpolated_positions_into(saturate(fraction), scratch);
        } else {
            self.samples.positions_into(scratch);
        }
        smooth_catmull_rom_into(scratch, self.style.smoothing, out);
    }
}

/// The agent owning every motion trail.
#[derive(Debug, Clone)]
pub struct TrailAgent {
    settings: TrailSettings,
    history: PositionHistory,
    building: BTreeMap<OwnerId, BuildingTrail>,
    fading: Vec<FadingTrail>,
    tick: u64,
}

impl Default for TrailAgent {
    fn default() -> Self {
        Self::new(TrailSettings::default())
    }
}

impl TrailAgent {
    /// Creates an empty registry.
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            history: PositionHistory::new(settings.default_style.capacity),
            settings,
            building: BTreeMap::new(),
            fading: Vec::new(),
            tick: 0,
        }
    }

    /// The registry settings.
    pub fn settings(&self) -> &TrailSettings {
        &self.settings
    }

    /// The tick of the last update.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Starts a trail for `owner` with an explicit style and capabilities.
    ///
    /// Returns `false`, changing nothing, if the owner is already building a
    /// trail: style, capacity and flags are fixed at creation.
    pub fn begin_trail(&mut self, owner: OwnerId, style: TrailStyle, flags: EffectFlags) -> bool {
        if self.building.contains_key(&owner) {
            return false;
        }
        self.history.ensure_capacity(owner, style.capacity);
        log::debug!("{owner}: trail started ({flags:?})");
        self.building.insert(
            owner,
            BuildingTrail {
                style,
                flags,
                last_sample_tick: self.tick,
            },
        );
        true
    }

    /// Appends a sample to the owner's trail, starting one with the default style if needed.
    ///
    /// The sample is stamped with the tick of the last [`update`](Self::update).
    /// Hosts that record before updating should use
    /// [`record_position_at`](Self::record_position_at) with the current tick.
    pub fn record_position(&mut self, owner: OwnerId, position: Vec2, orientation: f32) {
        self.record_position_at(owner, position, orientation, self.tick);
    }

    /// Appends a sample stamped with `tick`, advancing the registry clock to it.
    ///
    /// Non-finite positions are dropped; a non-finite orientation is stored as `0`.
    pub fn record_position_at(
        &mut self,
        owner: OwnerId,
        position: Vec2,
        orientation: f32,
        tick: u64,
    ) {
        if !position.is_finite() {
            log::debug!("{owner}: ignoring non-finite position {position:?}");
            return;
        }
        self.tick = self.tick.max(tick);
        if !self.building.contains_key(&owner) {
            let style = self.settings.default_style.clone();
            self.begin_trail(owner, style, EffectFlags::EMPTY);
        }
        let orientation = if orientation.is_finite() { orientation } else { 0.0 };
        let stamp = self.tick;
        self.history.record_sample(owner, position, orientation, stamp);
        if let Some(trail) = self.building.get_mut(&owner) {
            trail.last_sample_tick = stamp;
        }
    }

    /// Freezes the owner's trail and starts its fade.
    ///
    /// A trail without samples is retired on the spot. Returns `false` if the
    /// owner was not building a trail.
    pub fn end_trail(&mut self, owner: OwnerId) -> bool {
        let Some(trail) = self.building.remove(&owner) else {
            return false;
        };
        self.start_fade(owner, trail);
        true
    }

    /// Moves a building trail to the fading list. Returns `false` if it had no samples to fade.
    fn start_fade(&mut self, owner: OwnerId, trail: BuildingTrail) -> bool {
        match self.history.take(owner) {
            Some(samples) if !samples.is_empty() => {
                log::debug!("{owner}: trail fading with {} samples", samples.len());
                self.fading.push(FadingTrail {
                    owner,
                    style: trail.style,
                    flags: trail.flags,
                    samples,
                    started: self.tick,
                });
                true
            }
            _ => {
                log::debug!("{owner}: empty trail retired");
                false
            }
        }
    }

    /// Runs one tick of lifecycle management.
    ///
    /// In order: owners that are no longer alive are pruned (or faded, with
    /// [`EffectFlags::FADE_ON_PRUNE`]; or kept, with
    /// [`EffectFlags::EXEMPT_FROM_SWEEP`]); trails without a sample for
    /// `stale_ticks` start fading; finished fades are retired.
    pub fn update<L: OwnerLiveness + ?Sized>(&mut self, tick: u64, liveness: &L) -> TrailSweep {
        self.tick = self.tick.max(tick);
        let mut sweep = TrailSweep::default();

        let mut to_fade = Vec::new();
        let mut to_prune = Vec::new();
        for (&owner, trail) in &self.building {
            let alive =
                trail.flags.contains(EffectFlags::EXEMPT_FROM_SWEEP) || liveness.is_alive(owner);
            if !alive {
                if trail.flags.contains(EffectFlags::FADE_ON_PRUNE) {
                    to_fade.push(owner);
                } else {
                    to_prune.push(owner);
                }
                continue;
            }
            let idle = self.tick.saturating_sub(trail.last_sample_tick);
            let times_out = !trail.flags.contains(EffectFlags::NO_STALE_TIMEOUT);
            if times_out && idle >= self.settings.stale_ticks {
                to_fade.push(owner);
            }
        }

        for owner in to_prune {
            self.building.remove(&owner);
            self.history.clear(owner);
            log::debug!("{owner}: trail pruned, owner is gone");
            sweep.pruned += 1;
        }
        for owner in to_fade {
            if let Some(trail) = self.building.remove(&owner) {
                if self.start_fade(owner, trail) {
                    sweep.faded += 1;
                } else {
                    sweep.retired += 1;
                }
            }
        }

        let tick = self.tick;
        let fade_ticks = self.settings.fade_ticks;
        let (mut pruned, mut retired) = (0, 0);
        self.fading.retain(|trail| {
            let exempt = trail
                .flags
                .intersects(EffectFlags::EXEMPT_FROM_SWEEP | EffectFlags::FADE_ON_PRUNE);
            if !exempt && !liveness.is_alive(trail.owner) {
                pruned += 1;
                return false;
            }
            if fade_progress(tick, trail.started, fade_ticks) >= 1.0 {
                retired += 1;
                return false;
            }
            true
        });
        sweep.pruned += pruned;
        sweep.retired += retired;

        if sweep != TrailSweep::default() {
            log::trace!("Trail sweep at tick {tick}: {sweep:?}");
        }
        sweep
    }

    /// The phase of the owner's newest trail, or `None` if it has none.
    pub fn phase(&self, owner: OwnerId) -> Option<TrailPhase> {
        if self.building.contains_key(&owner) {
            return Some(TrailPhase::Building);
        }
        self.fading
            .iter()
            .rev()
            .find(|trail| trail.owner == owner)
            .map(|trail| TrailPhase::Fading {
                progress: fade_progress(self.tick, trail.started, self.settings.fade_ticks),
            })
    }

    /// The owner's building samples, oldest first. Empty for unknown owners.
    pub fn samples(&self, owner: OwnerId) -> Vec<Sample> {
        self.history.samples(owner)
    }

    /// Capabilities of the owner's newest trail.
    pub fn flags_of(&self, owner: OwnerId) -> Option<EffectFlags> {
        if let Some(trail) = self.building.get(&owner) {
            return Some(trail.flags);
        }
        self.fading
            .iter()
            .rev()
            .find(|trail| trail.owner == owner)
            .map(|trail| trail.flags)
    }

    /// The owner's newest visible trail: the one being built, else the most recent fading one.
    pub fn view(&self, owner: OwnerId) -> Option<TrailView<'_>> {
        if let Some(view) = self.building_view(owner) {
            return Some(view);
        }
        self.fading
            .iter()
            .rev()
            .find(|trail| trail.owner == owner)
            .map(|trail| self.fading_view(trail))
    }

    /// Every trail with samples: building trails by owner, then fading trails oldest first.
    pub fn views(&self) -> impl Iterator<Item = TrailView<'_>> + '_ {
        let building = self
            .building
            .keys()
            .filter_map(move |&owner| self.building_view(owner));
        let fading = self.fading.iter().map(move |trail| self.fading_view(trail));
        building.chain(fading)
    }

    fn building_view(&self, owner: OwnerId) -> Option<TrailView<'_>> {
        let trail = self.building.get(&owner)?;
        let samples = self.history.get(owner)?;
        if samples.is_empty() {
            return None;
        }
        Some(TrailView {
            owner,
            style: &trail.style,
            flags: trail.flags,
            samples,
            phase: TrailPhase::Building,
        })
    }

    fn fading_view<'a>(&'a self, trail: &'a FadingTrail) -> TrailView<'a> {
        TrailView {
            owner: trail.owner,
            style: &trail.style,
            flags: trail.flags,
            samples: &trail.samples,
            phase: TrailPhase::Fading {
                progress: fade_progress(self.tick, trail.started, self.settings.fade_ticks),
            },
        }
    }

    /// Number of trails being built.
    pub fn building_count(&self) -> usize {
        self.building.len()
    }

    /// Number of trails fading out.
    pub fn fading_count(&self) -> usize {
        self.fading.len()
    }

    /// Drops every trail.
    pub fn reset(&mut self) {
        self.history.clear_all();
        self.building.clear();
        self.fading.clear();
        self.tick = 0;
    }
}

fn fade_progress(tick: u64, started: u64, fade_ticks: u64) -> f32 {
    let elapsed = tick.saturating_sub(started) as f32;
    saturate(elapsed / fade_ticks.max(1) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everyone(_: OwnerId) -> bool {
        true
    }

    fn nobody(_: OwnerId) -> bool {
        false
    }

    fn agent() -> TrailAgent {
        TrailAgent::new(TrailSettings {
            stale_ticks: 3,
            fade_ticks: 4,
            ..Default::default()
        })
    }

    #[test]
    fn test_stale_trail_fades_then_retires() {
        let mut trails = agent();
        let owner = OwnerId(1);
        trails.record_position(owner, Vec2::ZERO, 0.0);
        trails.record_position(owner, Vec2::X, 0.0);

        assert_eq!(trails.update(2, &everyone).faded, 0);
        assert_eq!(trails.update(3, &everyone).faded, 1);
        assert_eq!(trails.phase(owner), Some(TrailPhase::Fading { progress: 0.0 }));

        trails.update(5, &everyone);
        assert_eq!(trails.phase(owner), Some(TrailPhase::Fading { progress: 0.5 }));
        assert!((trails.view(owner).map(|v| v.opacity()).unwrap_or(0.0) - 0.5).abs() < 1e-6);

        assert_eq!(trails.update(7, &everyone).retired, 1);
        assert_eq!(trails.phase(owner), None);
        assert_eq!(trails.fading_count(), 0);
    }

    #[test]
    fn test_end_trail_without_samples() {
        let mut trails = agent();
        assert!(!trails.end_trail(OwnerId(9)));
        assert!(trails.view(OwnerId(9)).is_none());

        assert!(trails.begin_trail(OwnerId(9), TrailStyle::default(), EffectFlags::EMPTY));
        assert!(trails.end_trail(OwnerId(9)));
        assert_eq!(trails.fading_count(), 0);
        assert_eq!(trails.phase(OwnerId(9)), None);
    }

    #[test]
    fn test_record_after_end_starts_fresh_trail() {
        let mut trails = agent();
        let owner = OwnerId(2);
        trails.record_position(owner, Vec2::ZERO, 0.0);
        trails.record_position(owner, Vec2::X, 0.0);
        trails.end_trail(owner);
        trails.record_position(owner, Vec2::new(50.0, 0.0), 0.0);

        assert_eq!(trails.phase(owner), Some(TrailPhase::Building));
        assert_eq!(trails.samples(owner).len(), 1);
        assert_eq!(trails.fading_count(), 1);
        let frozen: Vec<_> = trails
            .views()
            .filter(|v| v.phase != TrailPhase::Building)
            .map(|v| v.samples.len())
            .collect();
        assert_eq!(frozen, vec![2]);
    }

    #[test]
    fn test_liveness_sweep_respects_flags() {
        let mut trails = agent();
        let style = TrailStyle::default;
        trails.begin_trail(OwnerId(1), style(), EffectFlags::EMPTY);
        trails.begin_trail(OwnerId(2), style(), EffectFlags::FADE_ON_PRUNE);
        trails.begin_trail(OwnerId(3), style(), EffectFlags::EXEMPT_FROM_SWEEP);
        for owner in [OwnerId(1), OwnerId(2), OwnerId(3)] {
            trails.record_position(owner, Vec2::ZERO, 0.0);
        }

        let sweep = trails.update(1, &nobody);
        assert_eq!(sweep.pruned, 1);
        assert_eq!(sweep.faded, 1);
        assert_eq!(trails.phase(OwnerId(1)), None);
        assert!(matches!(trails.phase(OwnerId(2)), Some(TrailPhase::Fading { .. })));
        assert_eq!(trails.phase(OwnerId(3)), Some(TrailPhase::Building));

        // The fade keeps going even though the owner is gone.
        trails.update(2, &nobody);
        assert!(matches!(trails.phase(OwnerId(2)), Some(TrailPhase::Fading { .. })));
    }

    #[test]
    fn test_no_stale_timeout_and_capacity() {
        let mut trails = agent();
        let owner = OwnerId(4);
        let style = TrailStyle {
            capacity: 3,
            ..Default::default()
        };
        trails.begin_trail(owner, style, EffectFlags::NO_STALE_TIMEOUT);
        assert!(!trails.begin_trail(owner, TrailStyle::default(), EffectFlags::EMPTY));
        for i in 0..6 {
            trails.record_position(owner, Vec2::new(i as f32, 0.0), 0.0);
        }
        trails.record_position(owner, Vec2::new(f32::NAN, 0.0), 0.0);

        trails.update(100, &everyone);
        assert_eq!(trails.phase(owner), Some(TrailPhase::Building));
        let xs: Vec<f32> = trails.samples(owner).iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![3.0, 4.0, 5.0]);
        assert_eq!(trails.flags_of(owner), Some(EffectFlags::NO_STALE_TIMEOUT));
    }

    #[test]
    fn test_subtick_head_only_when_flagged() {
        let mut trails = agent();
        let plain = OwnerId(1);
        let smooth = OwnerId(2);
        trails.begin_trail(smooth, TrailStyle::default(), EffectFlags::SMOOTH_SUBTICK);
        for owner in [plain, smooth] {
            trails.record_position(owner, Vec2::ZERO, 0.0);
            trails.record_position(owner, Vec2::new(10.0, 0.0), 0.0);
        }

        let (mut scratch, mut out) = (Vec::new(), Vec::new());
        let view = trails.view(plain).unwrap();
        view.centerline_into(0.5, &mut scratch, &mut out);
        assert_eq!(out.last(), Some(&Vec2::new(10.0, 0.0)));
        let view = trails.view(smooth).unwrap();
        view.centerline_into(0.5, &mut scratch, &mut out);
        assert_eq!(out.last(), Some(&Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_samples_carry_the_recording_tick() {
        let mut trails = agent();
        let owner = OwnerId(3);
        trails.record_position(owner, Vec2::ZERO, 0.0);
        trails.update(0, &everyone);
        for tick in 1..=3 {
            trails.record_position_at(owner, Vec2::new(tick as f32, 0.0), 0.0, tick);
            trails.update(tick, &everyone);
        }
        let stamps: Vec<u64> = trails.samples(owner).iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![0, 1, 2, 3]);

        // Idle time counts from the last stamp, not from the previous update.
        assert_eq!(trails.update(5, &everyone).faded, 0);
        assert_eq!(trails.update(6, &everyone).faded, 1);
    }
}
