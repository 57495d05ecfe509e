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

//! Per-instance capability flags for line effects.

use crate::lumen_bitflags;

lumen_bitflags! {
    /// Capabilities fixed when a trail or constellation is created.
    ///
    /// The agent keeps these in its capability table and consults them during
    /// the update sweep instead of inspecting the owner's type.
    pub struct EffectFlags: u8 {
        /// The effect survives its owner being reported dead by the liveness sweep.
        const EXEMPT_FROM_SWEEP = 1 << 0;
        /// When the owner dies, fade out instead of disappearing immediately.
        const FADE_ON_PRUNE = 1 << 1;
        /// Never start fading because no new sample arrived.
        const NO_STALE_TIMEOUT = 1 << 2;
        /// Interpolate the newest point with the clock's sub-tick fraction.
        const SMOOTH_SUBTICK = 1 << 3;
    }
}
