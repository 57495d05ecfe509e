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

//! The simulation clock contract.

/// A monotonic tick source with a sub-tick interpolation fraction.
///
/// The simulation advances in whole ticks; rendering may happen between two
/// ticks, in which case `sub_tick_fraction` reports how far (in `[0, 1]`) the
/// frame is past the last completed tick.
pub trait SimulationClock {
    /// The number of completed simulation ticks.
    fn tick(&self) -> u64;

    /// The progress toward the next tick, in `[0, 1]`.
    fn sub_tick_fraction(&self) -> f32;
}
