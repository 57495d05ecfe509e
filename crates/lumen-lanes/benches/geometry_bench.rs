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

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lumen_core::math::{LinearRgba, Vec2};
use lumen_core::settings::{VerletSettings, WidthProfile};
use lumen_lanes::geometry_lane::{smooth_catmull_rom_into, Gradient, Mesh, ProfiledWidth, RibbonBuilder};
use lumen_lanes::physics_lane::VerletChain;

fn bench_geometry(c: &mut Criterion) {
    // A 24-sample swing arc, the default trail capacity.
    let samples: Vec<Vec2> = (0..24)
        .map(|i| Vec2::from_angle(i as f32 * 0.12) * 80.0)
        .collect();
    let width = ProfiledWidth::new(WidthProfile::QuadraticBump, 16.0);
    let color = Gradient::two_stop(LinearRgba::WHITE, LinearRgba::CYAN);

    let mut group = c.benchmark_group("Line Geometry");

    group.bench_function("Catmull-Rom x8 (24 samples)", |b| {
        let mut out = Vec::new();
        b.iter(|| {
            smooth_catmull_rom_into(black_box(&samples), 8, &mut out);
            black_box(out.len());
        });
    });

    group.bench_function("Ribbon (185 points)", |b| {
        let mut smooth = Vec::new();
        smooth_catmull_rom_into(&samples, 8, &mut smooth);
        let builder = RibbonBuilder::new(&width, &color);
        let mut mesh = Mesh::new();
        b.iter(|| {
            builder.build_into(black_box(&smooth), &mut mesh);
            black_box(mesh.indices.len());
        });
    });

    group.bench_function("Verlet step (16 segments)", |b| {
        let mut chain = VerletChain::new(
            Vec2::ZERO,
            Vec2::new(200.0, 0.0),
            16,
            1.1,
            VerletSettings::default(),
        );
        let mut tick = 0u32;
        b.iter(|| {
            tick = tick.wrapping_add(1);
            let sway = (tick as f32 * 0.05).sin() * 20.0;
            chain.step(Vec2::ZERO, Vec2::new(200.0, sway));
            black_box(chain.max_strain());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_geometry);
criterion_main!(benches);
