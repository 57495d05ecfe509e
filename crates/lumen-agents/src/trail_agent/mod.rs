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

//! Acts as the **[A]gent** for motion trails.
//!
//! Owns the trail registry: the live position history of every owner that is
//! building a trail, and the detached, frozen trails that are fading out.
//! Each tick it runs the liveness sweep, the stale-trail timeout and the fade
//! retirement, then hands visible trails to the geometry lanes on request.

mod agent;

pub use agent::*;
