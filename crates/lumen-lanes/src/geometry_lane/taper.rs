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

//! Functions evaluated along a line at a normalized `progress` in `[0, 1]`.
//!
//! `progress` is `0.0` at the first centerline point (the oldest sample of a
//! trail, anchor A of a constellation line) and `1.0` at the last. Closures
//! implement the traits directly, so `&|t: f32| 4.0 * t` is a valid width.

use lumen_core::math::{saturate, LinearRgba, Vec2, TAU};
use lumen_core::settings::WidthProfile;

/// Width of the line at a given progress, in world units.
pub trait WidthFunction {
    /// Returns the full width (not the half-width) at `progress`.
    fn width(&self, progress: f32) -> f32;
}

/// Vertex color at a given progress.
pub trait ColorFunction {
    /// Returns the color at `progress`.
    fn color(&self, progress: f32) -> LinearRgba;
}

/// Displacement applied to the centerline at a given progress.
pub trait OffsetFunction {
    /// Returns the displacement at `progress`, in world units.
    fn offset(&self, progress: f32) -> Vec2;
}

impl<F: Fn(f32) -> f32> WidthFunction for F {
    fn width(&self, progress: f32) -> f32 {
        self(progress)
    }
}

impl<F: Fn(f32) -> LinearRgba> ColorFunction for F {
    fn color(&self, progress: f32) -> LinearRgba {
        self(progress)
    }
}

impl<F: Fn(f32) -> Vec2> OffsetFunction for F {
    fn offset(&self, progress: f32) -> Vec2 {
        self(progress)
    }
}

/// The same width everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantWidth(pub f32);

impl WidthFunction for ConstantWidth {
    fn width(&self, _progress: f32) -> f32 {
        self.0
    }
}

/// Linear interpolation from `start` at the tail to `end` at the head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTaper {
    /// Width at progress `0`.
    pub start: f32,
    /// Width at progress `1`.
    pub end: f32,
}

impl WidthFunction for LinearTaper {
    fn width(&self, progress: f32) -> f32 {
        let t = saturate(progress);
        self.start + (self.end - self.start) * t
    }
}

/// `peak * 4t(1 - t)`: zero at both ends, `peak` in the middle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBump {
    /// Width at progress `0.5`.
    pub peak: f32,
}

impl WidthFunction for QuadraticBump {
    fn width(&self, progress: f32) -> f32 {
        let t = saturate(progress);
        self.peak * 4.0 * t * (1.0 - t)
    }
}

/// A [`WidthProfile`] from the settings, scaled by a nominal width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfiledWidth {
    /// Shape along the line.
    pub profile: WidthProfile,
    /// Nominal width the profile factors multiply.
    pub width: f32,
}

impl ProfiledWidth {
    /// Pairs a profile with a nominal width.
    pub fn new(profile: WidthProfile, width: f32) -> Self {
        Self { profile, width }
    }
}

impl WidthFunction for ProfiledWidth {
    fn width(&self, progress: f32) -> f32 {
        match self.profile {
            WidthProfile::Constant => self.width,
            WidthProfile::LinearTaper { start, end } => LinearTaper {
                start: start * self.width,
                end: end * self.width,
            }
            .width(progress),
            WidthProfile::QuadraticBump => QuadraticBump { peak: self.width }.width(progress),
        }
    }
}

/// One color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub LinearRgba);

impl ColorFunction for SolidColor {
    fn color(&self, _progress: f32) -> LinearRgba {
        self.0
    }
}

/// A piecewise-linear color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<(f32, LinearRgba)>,
}

impl Gradient {
    /// A ramp from `from` at progress `0` to `to` at progress `1`.
    pub fn two_stop(from: LinearRgba, to: LinearRgba) -> Self {
        Self {
            stops: vec![(0.0, from), (1.0, to)],
        }
    }

    /// Builds a ramp from `(progress, color)` stops.
    ///
    /// Stops with a non-finite position are dropped; the rest are clamped to
    /// `[0, 1]` and sorted. An empty ramp evaluates to transparent.
    pub fn from_stops(stops: impl IntoIterator<Item = (f32, LinearRgba)>) -> Self {
        let mut stops: Vec<_> = stops
            .into_iter()
            .filter(|(t, _)| t.is_finite())
            .map(|(t, c)| (saturate(t), c))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// The stops, sorted by progress.
    pub fn stops(&self) -> &[(f32, LinearRgba)] {
        &self.stops
    }
}

impl ColorFunction for Gradient {
    fn color(&self, progress: f32) -> LinearRgba {
        let t = saturate(progress);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return LinearRgba::TRANSPARENT,
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return c1;
                }
                return LinearRgba::lerp(c0, c1, (t - t0) / span);
            }
        }
        last.1
    }
}

/// A sine displacement along a fixed axis, for shimmering lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWobble {
    /// Direction of the displacement; normalized on evaluation.
    pub axis: Vec2,
    /// Peak displacement in world units.
    pub amplitude: f32,
    /// Full periods over the length of the line.
    pub cycles: f32,
    /// Phase shift, in periods. Advance it over time to animate the wobble.
    pub phase: f32,
}

impl OffsetFunction for SineWobble {
    fn offset(&self, progress: f32) -> Vec2 {
        let wave = (TAU * (self.cycles * progress + self.phase)).sin();
        self.axis.normalize() * (self.amplitude * wave)
    }
}
