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

//! The owner liveness contract used by the per-tick sweep.

use std::collections::HashSet;

use crate::ids::OwnerId;

/// Answers whether the entity behind an [`OwnerId`] still exists.
///
/// Closures and owner sets implement it, so a host can pass
/// `&|owner: OwnerId| world.contains(owner)` or a `HashSet` of live ids.
pub trait OwnerLiveness {
    /// Returns `true` if `owner` is still valid.
    fn is_alive(&self, owner: OwnerId) -> bool;
}

impl<F: Fn(OwnerId) -> bool> OwnerLiveness for F {
    fn is_alive(&self, owner: OwnerId) -> bool {
        self(owner)
    }
}

impl OwnerLiveness for HashSet<OwnerId> {
    fn is_alive(&self, owner: OwnerId) -> bool {
        self.contains(&owner)
    }
}
