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

//! Acts as the **[A]gent** a host talks to.
//!
//! [`VfxAgent`] owns the trail and constellation registries and the render
//! compositor. A host records positions during its tick, calls
//! [`VfxAgent::update_all`] once per tick, and [`VfxAgent::render_all`] once
//! per frame. The registry is a plain value: dropping or
//! [resetting](VfxAgent::reset) it at a world boundary clears every effect.

mod agent;
mod geometry;

pub use agent::*;
