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

//! Acts as the **[A]gent** for constellation lines.
//!
//! A constellation line is a Verlet chain hung between two anchors that the
//! host moves every tick. The agent owns the chains, steps them once per
//! tick, and retires them when they are dissolved or their owner disappears.

mod agent;

pub use agent::*;
