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

// Lumen Sandbox
// Runs a short headless scene and logs what the compositor submits.
//
// Usage: sandbox [settings.ron]

use anyhow::{Context, Result};
use lumen_agents::VfxAgent;
use lumen_core::math::{LinearRgba, Vec2};
use lumen_core::settings::{ConstellationStyle, LineRender, TrailStyle, VfxSettings};
use lumen_core::vfx::SimulationClock;
use lumen_core::{EffectFlags, OwnerId};
use lumen_infra::{BrushAtlas, FixedStepClock, HeadlessBackend};

const SWORD: OwnerId = OwnerId(1);
const LANTERN: OwnerId = OwnerId(2);

const SWING_TICKS: u64 = 30;
const LANTERN_DIES_AT: u64 = 75;
const TOTAL_TICKS: u64 = 120;

fn load_settings() -> Result<VfxSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            VfxSettings::load(&path).with_context(|| format!("loading settings from {path}"))
        }
        None => Ok(VfxSettings::default()),
    }
}

/// A half-circle sweep in front of the player, one point per tick.
fn swing_point(tick: u64) -> Vec2 {
    let t = tick as f32 / SWING_TICKS as f32;
    let angle = std::f32::consts::PI * (t - 0.5);
    Vec2::new(400.0, 300.0) + Vec2::from_angle(angle) * 120.0
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut agent = VfxAgent::new(load_settings()?)?;
    let textures = BrushAtlas::new();
    let mut backend = HeadlessBackend::new();
    let mut clock = FixedStepClock::default();

    let swing = TrailStyle {
        width: 24.0,
        primary: LinearRgba::new(1.0, 0.5, 0.1, 1.0),
        secondary: LinearRgba::new(1.0, 0.9, 0.6, 1.0),
        smoothing: 4,
        ..Default::default()
    };
    agent.begin_trail(SWORD, swing, EffectFlags::SMOOTH_SUBTICK);

    let rope = ConstellationStyle {
        render: LineRender::Ribbon,
        ..Default::default()
    };
    let line = agent.create_constellation_with_flags(
        Vec2::new(100.0, 100.0),
        Vec2::new(300.0, 120.0),
        16,
        rope,
        EffectFlags::FADE_ON_PRUNE,
    );
    agent.bind_constellation(line, LANTERN);

    // Render at roughly 1.5x the simulation rate so sub-tick interpolation kicks in.
    let frame = clock.step() / 1.5;
    while clock.tick() < TOTAL_TICKS {
        clock.accumulate(frame);
        while clock.consume_step() {
            let tick = clock.tick();
            if tick <= SWING_TICKS {
                agent.record_position_at(SWORD, swing_point(tick), 0.0, &clock);
            } else if tick == SWING_TICKS + 1 {
                agent.end_trail(SWORD);
            }

            let sway = (tick as f32 * 0.1).sin() * 40.0;
            agent.move_constellation_anchors(
                line,
                Vec2::new(100.0, 100.0),
                Vec2::new(300.0 + sway, 120.0),
            );

            let alive = move |owner: OwnerId| owner != LANTERN || tick < LANTERN_DIES_AT;
            let update = agent.update_all(&clock, &alive);
            if update.trails != Default::default() || update.constellations.dissolved > 0 {
                log::info!("tick {tick}: {update:?}");
            }
        }

        let stats = agent.render_all(&mut backend, &textures, &clock);
        if clock.tick() % 15 == 0 {
            log::info!(
                "tick {} (+{:.2}): {stats}, {} commands",
                clock.tick(),
                clock.sub_tick_fraction(),
                backend.commands().len()
            );
        }
        backend.take_commands();
    }

    log::info!(
        "Done: {} trails building, {} fading, {} lines",
        agent.trails().building_count(),
        agent.trails().fading_count(),
        agent.constellations().len()
    );
    Ok(())
}
