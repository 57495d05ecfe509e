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

//! Simulation timing.

use lumen_core::vfx::SimulationClock;

/// A fixed-timestep clock driven by variable frame deltas.
///
/// Frame time is accumulated with [`accumulate`](Self::accumulate) and
/// spent one fixed step at a time with [`consume_step`](Self::consume_step);
/// what is left over between two steps is the sub-tick fraction used to place
/// the head of a trail between ticks.
///
/// ```
/// use lumen_core::vfx::SimulationClock;
/// use lumen_infra::FixedStepClock;
///
/// let mut clock = FixedStepClock::new(0.01);
/// clock.accumulate(0.025);
/// let mut steps = 0;
/// while clock.consume_step() {
///     steps += 1;
/// }
/// assert_eq!(steps, 2);
/// assert_eq!(clock.tick(), 2);
/// assert!((clock.sub_tick_fraction() - 0.5).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    accumulator: f32,
    tick: u64,
    max_backlog: u32,
}

impl Default for FixedStepClock {
    /// A 60 Hz clock.
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl FixedStepClock {
    /// Creates a clock with the given step length in seconds.
    ///
    /// Non-positive or non-finite steps fall back to 60 Hz.
    pub fn new(step_seconds: f32) -> Self {
        let step = if step_seconds.is_finite() && step_seconds > 0.0 {
            step_seconds
        } else {
            log::warn!("Invalid fixed step {step_seconds}, falling back to 60 Hz");
            1.0 / 60.0
        };
        Self {
            step,
            accumulator: 0.0,
            tick: 0,
            max_backlog: 8,
        }
    }

    /// Caps how many steps can pile up in the accumulator; extra frame time is dropped.
    pub fn with_max_backlog(mut self, steps: u32) -> Self {
        self.max_backlog = steps.max(1);
        self
    }

    /// The step length in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Adds a frame's elapsed time. Negative or non-finite deltas are ignored.
    pub fn accumulate(&mut self, delta_seconds: f32) {
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) {
            return;
        }
        let cap = self.step * self.max_backlog as f32;
        let total = self.accumulator + delta_seconds;
        if total > cap {
            log::debug!("Dropping {:.3}s of simulation backlog", total - cap);
        }
        self.accumulator = total.min(cap);
    }

    /// Spends one step from the accumulator and advances the tick.
    ///
    /// Returns `false`, leaving the clock untouched, when less than a full step is stored.
    pub fn consume_step(&mut self) -> bool {
        if self.accumulator + f32::EPSILON < self.step {
            return false;
        }
        self.accumulator = (self.accumulator - self.step).max(0.0);
        self.tick += 1;
        true
    }
}

impl SimulationClock for FixedStepClock {
    fn tick(&self) -> u64 {
        self.tick
    }

    fn sub_tick_fraction(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }
}
