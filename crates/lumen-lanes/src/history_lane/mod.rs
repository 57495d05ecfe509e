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

//! History Lane
//!
//! Bounded, per-owner position history. Each owner gets a ring of samples
//! whose capacity is fixed when the ring is created; recording into a full
//! ring evicts the oldest sample. Samples are always returned oldest first.

use std::collections::{HashMap, VecDeque};

use lumen_core::math::Vec2;
use lumen_core::OwnerId;

/// Capacity given to a ring created implicitly by [`PositionHistory::record_sample`].
pub const DEFAULT_HISTORY_CAPACITY: usize = 24;

/// A recorded position of an owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// World position.
    pub position: Vec2,
    /// Orientation in radians.
    pub orientation: f32,
    /// Tick at which the sample was recorded.
    pub timestamp: u64,
}

/// A fixed-capacity ring of samples, oldest first.
#[derive(Debug, Clone)]
pub struct SampleRing {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl SampleRing {
    /// Creates an empty ring. A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of samples kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently stored.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample is stored.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a sample, returning the evicted oldest sample when the ring was full.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Iterates over the samples, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    /// The oldest stored sample.
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// The most recent sample.
    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Copies the samples out, oldest first.
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    /// Writes the sample positions into `out`, oldest first. `out` is cleared first.
    pub fn positions_into(&self, out: &mut Vec<Vec2>) {
        out.clear();
        out.extend(self.samples.iter().map(|s| s.position));
    }

    /// Like [`positions_into`](Self::positions_into), but the newest position is
    /// replaced by the point `fraction` of the way from the previous sample to it.
    ///
    /// Used to place the head of a trail between two fixed simulation ticks.
    pub fn interpolated_positions_into(&self, fraction: f32, out: &mut Vec<Vec2>) {
        self.positions_into(out);
        let n = out.len();
        if n >= 2 {
            out[n - 1] = Vec2::lerp(out[n - 2], out[n - 1], fraction);
        }
    }

    /// Removes every sample, keeping the capacity.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Per-owner bounded position histories.
#[derive(Debug, Clone)]
pub struct PositionHistory {
    default_capacity: usize,
    rings: HashMap<OwnerId, SampleRing>,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl PositionHistory {
    /// Creates an empty history whose implicitly created rings hold `default_capacity` samples.
    pub fn new(default_capacity: usize) -> Self {
        Self {
            default_capacity: default_capacity.max(1),
            rings: HashMap::new(),
        }
    }

    /// Creates the ring for `owner` with the given capacity if it does not exist yet.
    ///
    /// An existing ring keeps the capacity it was created with.
    pub fn ensure_capacity(&mut self, owner: OwnerId, capacity: usize) -> &mut SampleRing {
        self.rings
            .entry(owner)
            .or_insert_with(|| SampleRing::with_capacity(capacity))
    }

    /// Appends a sample to the owner's history, creating it on first use.
    pub fn record_sample(&mut self, owner: OwnerId, position: Vec2, orientation: f32, timestamp: u64) {
        let default_capacity = self.default_capacity;
        let ring = self
            .rings
            .entry(owner)
            .or_insert_with(|| SampleRing::with_capacity(default_capacity));
        if let Some(evicted) = ring.push(Sample {
            position,
            orientation,
            timestamp,
        }) {
            log::trace!("{owner}: evicted sample from tick {}", evicted.timestamp);
        }
    }

    /// The owner's ring, if any sample was ever recorded for it.
    pub fn get(&self, owner: OwnerId) -> Option<&SampleRing> {
        self.rings.get(&owner)
    }

    /// A copy of the owner's samples, oldest first. Empty for unknown owners.
    pub fn samples(&self, owner: OwnerId) -> Vec<Sample> {
        self.rings
            .get(&owner)
            .map(SampleRing::to_vec)
            .unwrap_or_default()
    }

    /// Returns `true` if the owner has a ring.
    pub fn contains(&self, owner: OwnerId) -> bool {
        self.rings.contains_key(&owner)
    }

    /// Number of owners with a ring.
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Returns `true` if no owner has a ring.
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Iterates over the owners with a ring, in no particular order.
    pub fn owners(&self) -> impl Iterator<Item = OwnerId> + '_ {
        self.rings.keys().copied()
    }

    /// Discards the owner's history. Returns `true` if there was one.
    pub fn clear(&mut self, owner: OwnerId) -> bool {
        self.rings.remove(&owner).is_some()
    }

    /// Detaches the owner's ring and hands it to the caller.
    pub fn take(&mut self, owner: OwnerId) -> Option<SampleRing> {
        self.rings.remove(&owner)
    }

    /// Discards every history.
    pub fn clear_all(&mut self) {
        self.rings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32) -> Vec2 {
        Vec2::new(x, 0.0)
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut ring = SampleRing::with_capacity(3);
        for i in 0..5u64 {
            ring.push(Sample {
                position: p(i as f32),
                orientation: 0.0,
                timestamp: i,
            });
        }
        assert_eq!(ring.len(), 3);
        let stamps: Vec<u64> = ring.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![2, 3, 4]);
        assert_eq!(ring.oldest().map(|s| s.timestamp), Some(2));
        assert_eq!(ring.newest().map(|s| s.timestamp), Some(4));
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let ring = SampleRing::with_capacity(0);
        assert_eq!(ring.capacity(), 1);
    }

    #[test]
    fn test_interpolated_head() {
        let mut ring = SampleRing::with_capacity(4);
        for i in 0..3u64 {
            ring.push(Sample {
                position: p(i as f32 * 10.0),
                orientation: 0.0,
                timestamp: i,
            });
        }
        let mut out = Vec::new();
        ring.interpolated_positions_into(0.25, &mut out);
        assert_eq!(out, vec![p(0.0), p(10.0), p(12.5)]);
        ring.interpolated_positions_into(1.0, &mut out);
        assert_eq!(out[2], p(20.0));
    }

    #[test]
    fn test_unknown_owner_is_empty() {
        let history = PositionHistory::default();
        assert!(history.samples(OwnerId(3)).is_empty());
        assert!(history.get(OwnerId(3)).is_none());
    }

    #[test]
    fn test_capacity_fixed_at_creation() {
        let mut history = PositionHistory::new(8);
        history.ensure_capacity(OwnerId(1), 2);
        history.ensure_capacity(OwnerId(1), 50);
        for i in 0..10 {
            history.record_sample(OwnerId(1), p(i as f32), 0.0, i);
        }
        let samples = history.samples(OwnerId(1));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp, 8);
        assert_eq!(samples[1].timestamp, 9);
    }

    #[test]
    fn test_take_detaches() {
        let mut history = PositionHistory::default();
        history.record_sample(OwnerId(1), p(1.0), 0.0, 0);
        let ring = history.take(OwnerId(1));
        assert_eq!(ring.map(|r| r.len()), Some(1));
        assert!(!history.contains(OwnerId(1)));
        assert!(!history.clear(OwnerId(1)));
    }
}
