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
use lumen_core::settings::VerletSettings;
use lumen_lanes::physics_lane::VerletChain;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

fn no_gravity() -> VerletSettings {
    VerletSettings {
        bias: Vec2::ZERO,
        ..Default::default()
    }
}

#[test]
fn test_static_anchors_converge_to_rest_length() {
    let settings = VerletSettings {
        iterations: 20,
        ..no_gravity()
    };
    let (a, b) = (Vec2::ZERO, Vec2::new(100.0, 0.0));
    let mut chain = VerletChain::new(a, b, 10, 1.25, settings);
    for _ in 0..500 {
        chain.step(a, b);
    }
    let rest = chain.rest_length();
    for (start, end) in chain.segments() {
        let length = start.distance(end);
        assert!(
            (length - rest).abs() <= rest * 0.01,
            "segment length {length} is more than 1% off rest length {rest}"
        );
    }
}

#[test]
fn test_default_settings_settle_without_gravity() {
    let (a, b) = (Vec2::new(-40.0, 20.0), Vec2::new(60.0, -10.0));
    let mut chain = VerletChain::new(a, b, 16, 1.1, no_gravity());
    for _ in 0..500 {
        chain.step(a, b);
    }
    assert!(chain.max_strain() < 0.01);
}

#[test]
fn test_interior_nodes_lag_a_sudden_anchor_jump() {
    let (a, b) = (Vec2::ZERO, Vec2::new(100.0, 0.0));
    let mut chain = VerletChain::new(a, b, 10, 1.0, no_gravity());
    let before = chain.nodes()[5].position;

    let jumped = Vec2::new(100.0, 50.0);
    chain.step(a, jumped);

    assert_eq!(chain.anchors().1, jumped);
    let moved = chain.nodes()[5].position.distance(before);
    assert!(moved < 50.0, "middle node moved {moved}, as far as the anchor");
    let near_b = chain.nodes()[9].position.distance(Vec2::new(90.0, 0.0));
    assert!(near_b > moved);
}

#[test]
fn test_random_walk_stays_finite_and_bounded() {
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    let settings = VerletSettings {
        bias: Vec2::new(0.0, 0.15),
        ..Default::default()
    };
    let a = Vec2::ZERO;
    let mut b = Vec2::new(100.0, 0.0);
    let mut chain = VerletChain::new(a, b, 16, 1.1, settings);
    let total = chain.rest_length() * chain.segment_count() as f32;

    for _ in 0..1000 {
        b.x = (b.x + rng.gen_range(-3.0..3.0)).clamp(-200.0, 200.0);
        b.y = (b.y + rng.gen_range(-3.0..3.0)).clamp(-200.0, 200.0);
        chain.step(a, b);

        assert!(chain.is_finite());
        for p in chain.positions() {
            assert!(p.distance(a) < 10.0 * total.max(b.length()));
        }
    }
}
