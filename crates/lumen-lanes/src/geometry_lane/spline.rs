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

use lumen_core::math::Vec2;

/// Evaluates the uniform Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
#[inline]
pub fn catmull_rom_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let a = p1 * 2.0;
    let b = (p2 - p0) * t;
    let c = (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2;
    let d = (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3;
    (a + b + c + d) * 0.5
}

/// Smooths a polyline with a Catmull-Rom spline.
///
/// Every input point is kept and `subdivisions - 1` points are inserted
/// between each consecutive pair, so the output holds
/// `(n - 1) * subdivisions + 1` points. End segments duplicate their end
/// point as the missing neighbour.
///
/// Fewer than three points, or `subdivisions <= 1`, returns the input unchanged.
pub fn smooth_catmull_rom(points: &[Vec2], subdivisions: u32) -> Vec<Vec2> {
    let mut out = Vec::new();
    smooth_catmull_rom_into(points, subdivisions, &mut out);
    out
}

/// Allocation-reusing form of [`smooth_catmull_rom`]. `out` is cleared first.
pub fn smooth_catmull_rom_into(points: &[Vec2], subdivisions: u32, out: &mut Vec<Vec2>) {
    out.clear();
    let n = points.len();
    if n < 3 || subdivisions <= 1 {
        out.extend_from_slice(points);
        return;
    }

    let steps = subdivisions as usize;
    out.reserve((n - 1) * steps + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];

        // Control points are copied, not evaluated, so they survive bit-exact.
        out.push(p1);
        for s in 1..steps {
            let t = s as f32 / steps as f32;
            out.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    out.push(points[n - 1]);
}
