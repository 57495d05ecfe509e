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

//! Geometry Lane
//!
//! Turns a centerline (a polyline in world units) into drawable geometry:
//! Catmull-Rom smoothing, the tapering functions evaluated along the line,
//! and the ribbon triangle-strip builder.

mod ribbon;
mod spline;
mod taper;

pub use ribbon::*;
pub use spline::*;
pub use taper::*;
