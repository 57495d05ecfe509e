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

//! Turns registry views into compositor geometry.

use lumen_core::math::{LinearRgba, Vec2};
use lumen_core::settings::LineRender;
use lumen_lanes::geometry_lane::{
    ColorFunction, Mesh, ProfiledWidth, RibbonBuilder, WidthFunction,
};

use crate::compositor::LineSegment;
use crate::constellation_agent::ConstellationView;
use crate::trail_agent::TrailView;

/// Reusable per-frame buffers.
#[derive(Debug, Default)]
pub(super) struct FrameScratch {
    pub raw: Vec<Vec2>,
    pub centerline: Vec<Vec2>,
    pub meshes: Vec<Mesh>,
    pub lines: Vec<Vec<LineSegment>>,
}

/// Returns the pool entry at `index`, growing the pool if needed.
pub(super) fn pool_slot<T: Default>(pool: &mut Vec<T>, index: usize) -> &mut T {
    if pool.len() <= index {
        pool.resize_with(index + 1, T::default);
    }
    &mut pool[index]
}

/// A color ramp from `tail` at progress `0` to `head` at progress `1`.
pub(super) fn two_tone(tail: LinearRgba, head: LinearRgba) -> impl Fn(f32) -> LinearRgba {
    move |t: f32| LinearRgba::lerp(tail, head, t)
}

/// Builds a trail ribbon with explicit width and color functions.
pub(super) fn trail_ribbon(
    view: &TrailView<'_>,
    fraction: f32,
    width: &dyn WidthFunction,
    color: &dyn ColorFunction,
    raw: &mut Vec<Vec2>,
    centerline: &mut Vec<Vec2>,
    mesh: &mut Mesh,
) {
    view.centerline_into(fraction, raw, centerline);
    RibbonBuilder::new(width, color).build_into(centerline, mesh);
}

/// Builds a trail ribbon with the functions its style describes.
pub(super) fn styled_trail_ribbon(
    view: &TrailView<'_>,
    fraction: f32,
    raw: &mut Vec<Vec2>,
    centerline: &mut Vec<Vec2>,
    mesh: &mut Mesh,
) {
    let width = ProfiledWidth::new(view.style.profile, view.style.width);
    let color = two_tone(view.style.primary, view.style.secondary);
    trail_ribbon(view, fraction, &width, &color, raw, centerline, mesh);
}

/// The geometry a constellation line renders as.
pub(super) enum LineGeometry {
    Ribbon,
    Lines,
}

/// Builds a constellation line as a segment list or a ribbon, per its style.
pub(super) fn constellation_geometry(
    view: &ConstellationView<'_>,
    raw: &mut Vec<Vec2>,
    mesh: &mut Mesh,
    lines: &mut Vec<LineSegment>,
) -> LineGeometry {
    let style = view.style;
    let width = ProfiledWidth::new(style.profile, style.width);
    let color = two_tone(style.primary, style.secondary);

    match style.render {
        LineRender::Ribbon => {
            view.chain.positions_into(raw);
            RibbonBuilder::new(&width, &color).build_into(raw, mesh);
            LineGeometry::Ribbon
        }
        LineRender::Segments => {
            lines.clear();
            let count = view.chain.segment_count() as f32;
            lines.extend(view.chain.segments().enumerate().map(|(i, (start, end))| {
                let progress = (i as f32 + 0.5) / count;
                LineSegment {
                    start,
                    end,
                    width: width.width(progress),
                    color: color.color(progress),
                }
            }));
            LineGeometry::Lines
        }
    }
}
