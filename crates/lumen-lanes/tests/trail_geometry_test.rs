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

use lumen_core::math::{LinearRgba, Vec2};
use lumen_core::settings::WidthProfile;
use lumen_core::OwnerId;
use lumen_lanes::geometry_lane::{
    smooth_catmull_rom, Gradient, ProfiledWidth, RibbonBuilder, SineWobble,
};
use lumen_lanes::history_lane::PositionHistory;

fn zigzag(n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|i| Vec2::new(i as f32 * 12.0, if i % 2 == 0 { 0.0 } else { 9.0 }))
        .collect()
}

#[test]
fn test_history_to_ribbon() {
    let owner = OwnerId(7);
    let mut history = PositionHistory::default();
    for (tick, p) in zigzag(5).into_iter().enumerate() {
        history.record_sample(owner, p, 0.0, tick as u64);
    }

    let mut points = Vec::new();
    history
        .get(owner)
        .expect("owner has samples")
        .positions_into(&mut points);

    let width = ProfiledWidth::new(WidthProfile::QuadraticBump, 16.0);
    let color = Gradient::two_stop(LinearRgba::WHITE, LinearRgba::CYAN);
    let mesh = RibbonBuilder::new(&width, &color).build(&points);

    assert_eq!(mesh.vertices.len(), 10);
    assert_eq!(mesh.indices.len(), 24);
    assert!(mesh.is_finite());
    // Zero width at both ends of a swing trail.
    assert_eq!(mesh.vertices[0].position, mesh.vertices[1].position);
    assert_eq!(mesh.vertices[8].position, mesh.vertices[9].position);
    assert_eq!(mesh.vertices[0].color, LinearRgba::WHITE);
    assert_eq!(mesh.vertices[9].color, LinearRgba::CYAN);
}

#[test]
fn test_smoothed_curve_keeps_control_points() {
    let points = zigzag(6);
    for subdivisions in [2u32, 3, 8] {
        let smooth = smooth_catmull_rom(&points, subdivisions);
        assert_eq!(smooth.len(), (points.len() - 1) * subdivisions as usize + 1);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(smooth[i * subdivisions as usize], *p);
        }
    }
}

#[test]
fn test_smoothed_ribbon_sizes() {
    let smooth = smooth_catmull_rom(&zigzag(5), 4);
    let width = |_t: f32| 3.0_f32;
    let color = |t: f32| LinearRgba::WHITE.with_alpha(t);
    let wobble = SineWobble {
        axis: Vec2::Y,
        amplitude: 2.0,
        cycles: 3.0,
        phase: 0.1,
    };
    let mesh = RibbonBuilder::new(&width, &color)
        .with_offset(&wobble)
        .build(&smooth);

    assert_eq!(mesh.vertices.len(), 2 * smooth.len());
    assert_eq!(mesh.indices.len(), 6 * (smooth.len() - 1));
    assert!(mesh.is_finite());
    for pair in mesh.vertices.chunks_exact(2) {
        let gap = pair[0].position.distance(pair[1].position);
        assert!((gap - 3.0).abs() < 1e-4);
    }
}
