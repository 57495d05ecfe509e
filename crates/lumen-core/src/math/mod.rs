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

//! Provides the 2D mathematics primitives used by the line geometry pipelines.
//!
//! Everything here works in world units on a plane whose Y axis points down,
//! matching screen space. All angular functions operate in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons and guarded divisions.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, TAU};

// --- Declare Sub-Modules ---

pub mod color;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::LinearRgba;
pub use self::vector::Vec2;

// --- Utility Functions ---

/// Clamps a value to a specified minimum and maximum range.
///
/// # Examples
///
/// ```
/// use lumen_core::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
/// ```
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
///
/// NaN maps to `0.0` so a corrupted progress value can never leak into geometry.
///
/// # Examples
///
/// ```
/// use lumen_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// assert_eq!(saturate(f32::NAN), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        clamp(value, 0.0, 1.0)
    }
}

/// Returns `value` when it is finite, `fallback` otherwise.
///
/// # Examples
///
/// ```
/// use lumen_core::math::finite_or;
/// assert_eq!(finite_or(2.0, 0.0), 2.0);
/// assert_eq!(finite_or(f32::INFINITY, 0.0), 0.0);
/// ```
#[inline]
pub fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
