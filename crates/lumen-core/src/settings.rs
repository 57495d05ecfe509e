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

//! Settings for trails, the Verlet solver and the compositor.
//!
//! Every struct here has a `Default` with the tuned values, derives serde with
//! `#[serde(default)]` so a RON file only needs to mention what it overrides,
//! and is checked by [`VfxSettings::validate`] after loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::{LinearRgba, Vec2};
use crate::vfx::{BlendConfig, Brush};

/// The shape of a line's width along its length.
///
/// `progress` runs from `0.0` at the oldest sample (tail) to `1.0` at the
/// newest (head). The profile is scaled by the style's nominal width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum WidthProfile {
    /// Full width everywhere.
    Constant,
    /// Linear interpolation from `start` to `end` (fractions of the nominal width).
    LinearTaper {
        /// Width factor at the tail.
        start: f32,
        /// Width factor at the head.
        end: f32,
    },
    /// `4t(1 - t)`: zero at both ends, full width in the middle. Used for swing trails.
    #[default]
    QuadraticBump,
}

/// How a trail looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailStyle {
    /// Nominal width in world units.
    pub width: f32,
    /// Width shape along the trail.
    pub profile: WidthProfile,
    /// Color at the tail of the trail.
    pub primary: LinearRgba,
    /// Color at the head of the trail.
    pub secondary: LinearRgba,
    /// Maximum number of samples kept.
    pub capacity: usize,
    /// Catmull-Rom points generated per recorded segment (`1` disables smoothing).
    pub smoothing: u32,
}

impl Default for TrailStyle {
    fn default() -> Self {
        Self {
            width: 16.0,
            profile: WidthProfile::QuadraticBump,
            primary: LinearRgba::WHITE,
            secondary: LinearRgba::CYAN,
            capacity: 24,
            smoothing: 1,
        }
    }
}

/// Settings for the trail registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Ticks without a new sample before a trail starts fading on its own.
    pub stale_ticks: u64,
    /// Length of the fade window, in ticks.
    pub fade_ticks: u64,
    /// Style used when a trail is created implicitly by recording a position.
    pub default_style: TrailStyle,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            stale_ticks: 10,
            fade_ticks: 20,
            default_style: TrailStyle::default(),
        }
    }
}

/// Tunables of the Verlet line solver.
///
/// The defaults (stiffness 0.8, three relaxation passes, damping 0.96) keep a
/// 16-segment chain visibly taut without oscillating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerletSettings {
    /// Fraction of the derived velocity carried to the next tick, in `[0, 1)`.
    pub damping: f32,
    /// Fraction of the length error corrected per relaxation pass, in `(0, 1]`.
    pub stiffness: f32,
    /// Relaxation passes per tick.
    pub iterations: u32,
    /// Constant displacement added to every free node each tick.
    pub bias: Vec2,
}

impl Default for VerletSettings {
    fn default() -> Self {
        Self {
            damping: 0.96,
            stiffness: 0.8,
            iterations: 3,
            bias: Vec2::ZERO,
        }
    }
}

/// How a constellation line is turned into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineRender {
    /// One stretched quad per chain segment.
    #[default]
    Segments,
    /// A ribbon mesh through the chain nodes, using the ribbon builder.
    Ribbon,
}

/// How a constellation line looks and hangs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationStyle {
    /// Nominal width in world units.
    pub width: f32,
    /// Width shape along the line.
    pub profile: WidthProfile,
    /// Color at anchor A.
    pub primary: LinearRgba,
    /// Color at anchor B.
    pub secondary: LinearRgba,
    /// Total chain length as a multiple of the initial anchor distance (`>= 1`).
    pub slack: f32,
    /// Per-tick displacement added on top of the solver bias (sag direction).
    pub gravity: Vec2,
    /// Geometry used when rendering.
    pub render: LineRender,
}

impl Default for ConstellationStyle {
    fn default() -> Self {
        Self {
            width: 4.0,
            profile: WidthProfile::Constant,
            primary: LinearRgba::new(0.6, 0.8, 1.0, 1.0),
            secondary: LinearRgba::new(1.0, 0.7, 1.0, 1.0),
            slack: 1.1,
            gravity: Vec2::new(0.0, 0.15),
            render: LineRender::Segments,
        }
    }
}

/// One compositing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassDescriptor {
    /// Name used in logs.
    pub label: String,
    /// Blend/sampler configuration of the batch.
    pub config: BlendConfig,
    /// Brush stamped for this pass.
    pub brush: Brush,
    /// Multiplier applied to the geometry's width.
    pub width_scale: f32,
    /// Multiplier applied to the RGB of every vertex.
    pub brightness: f32,
    /// How far colors are pulled toward white, in `[0, 1]`.
    pub whiten: f32,
}

impl Default for PassDescriptor {
    fn default() -> Self {
        Self {
            label: "pass".to_string(),
            config: BlendConfig::ADDITIVE,
            brush: Brush::Pixel,
            width_scale: 1.0,
            brightness: 1.0,
            whiten: 0.0,
        }
    }
}

/// Settings for the render compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Passes in draw order. Width scales must not increase from one pass to the next.
    pub passes: Vec<PassDescriptor>,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            passes: vec![
                PassDescriptor {
                    label: "bloom".to_string(),
                    config: BlendConfig::ADDITIVE,
                    brush: Brush::SoftGlow,
                    width_scale: 3.0,
                    brightness: 0.25,
                    whiten: 0.0,
                },
                PassDescriptor {
                    label: "glow".to_string(),
                    config: BlendConfig::ADDITIVE,
                    brush: Brush::SoftGlow,
                    width_scale: 1.8,
                    brightness: 0.5,
                    whiten: 0.15,
                },
                PassDescriptor {
                    label: "core".to_string(),
                    config: BlendConfig::ADDITIVE,
                    brush: Brush::Pixel,
                    width_scale: 0.6,
                    brightness: 1.0,
                    whiten: 0.6,
                },
            ],
        }
    }
}

/// The complete Lumen configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VfxSettings {
    /// Trail registry settings.
    pub trails: TrailSettings,
    /// Verlet solver settings.
    pub verlet: VerletSettings,
    /// Default constellation style.
    pub constellation: ConstellationStyle,
    /// Compositor pass list.
    pub compositor: CompositorSettings,
}

impl VfxSettings {
    /// Parses settings from a RON string and validates them.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = ron::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a RON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&source)?;
        log::debug!("Loaded VFX settings from {}", path.display());
        Ok(settings)
    }

    /// Serializes the settings as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_trail_style(&self.trails.default_style)?;
        if self.trails.fade_ticks == 0 {
            return Err(ConfigError::invalid("trails.fade_ticks", "must be at least 1"));
        }

        let verlet = &self.verlet;
        if !(verlet.stiffness > 0.0 && verlet.stiffness <= 1.0) {
            return Err(ConfigError::invalid(
                "verlet.stiffness",
                format!("must be in (0, 1], got {}", verlet.stiffness),
            ));
        }
        if !(verlet.damping >= 0.0 && verlet.damping < 1.0) {
            return Err(ConfigError::invalid(
                "verlet.damping",
                format!("must be in [0, 1), got {}", verlet.damping),
            ));
        }
        if verlet.iterations == 0 {
            return Err(ConfigError::invalid("verlet.iterations", "must be at least 1"));
        }
        if !verlet.bias.is_finite() {
            return Err(ConfigError::invalid("verlet.bias", "must be finite"));
        }

        let constellation = &self.constellation;
        if !(constellation.width.is_finite() && constellation.width >= 0.0) {
            return Err(ConfigError::invalid(
                "constellation.width",
                "must be a finite, non-negative number",
            ));
        }
        if !(constellation.slack.is_finite() && constellation.slack >= 1.0) {
            return Err(ConfigError::invalid(
                "constellation.slack",
                format!("must be at least 1.0, got {}", constellation.slack),
            ));
        }

        validate_passes(&self.compositor.passes)
    }
}

/// Checks a trail style on its own; also used when a style is supplied at runtime.
pub fn validate_trail_style(style: &TrailStyle) -> Result<(), ConfigError> {
    if !(style.width.is_finite() && style.width >= 0.0) {
        return Err(ConfigError::invalid(
            "trails.default_style.width",
            "must be a finite, non-negative number",
        ));
    }
    if style.capacity < 2 {
        return Err(ConfigError::invalid(
            "trails.default_style.capacity",
            "must hold at least 2 samples",
        ));
    }
    Ok(())
}

/// Checks that a pass list is non-empty, well-formed and ordered widest first.
pub fn validate_passes(passes: &[PassDescriptor]) -> Result<(), ConfigError> {
    if passes.is_empty() {
        return Err(ConfigError::invalid(
            "compositor.passes",
            "at least one pass is required",
        ));
    }
    for pass in passes {
        if !(pass.width_scale.is_finite() && pass.width_scale > 0.0) {
            return Err(ConfigError::invalid(
                "compositor.passes.width_scale",
                format!("pass '{}' must have a positive width scale", pass.label),
            ));
        }
        if !(pass.brightness.is_finite() && pass.brightness >= 0.0) {
            return Err(ConfigError::invalid(
                "compositor.passes.brightness",
                format!("pass '{}' must have a non-negative brightness", pass.label),
            ));
        }
        if !(0.0..=1.0).contains(&pass.whiten) {
            return Err(ConfigError::invalid(
                "compositor.passes.whiten",
                format!("pass '{}' must whiten by a value in [0, 1]", pass.label),
            ));
        }
    }
    for pair in passes.windows(2) {
        if pair[1].width_scale > pair[0].width_scale {
            return Err(ConfigError::invalid(
                "compositor.passes",
                format!(
                    "pass '{}' is wider than the pass '{}' drawn before it; draw bloom first and core last",
                    pair[1].label, pair[0].label
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(VfxSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_ron_overrides_only_named_fields() {
        let settings = VfxSettings::from_ron_str(
            "(verlet: (stiffness: 0.5, iterations: 6), trails: (fade_ticks: 40))",
        )
        .unwrap();
        assert_eq!(settings.verlet.stiffness, 0.5);
        assert_eq!(settings.verlet.iterations, 6);
        assert_eq!(settings.verlet.damping, 0.96);
        assert_eq!(settings.trails.fade_ticks, 40);
        assert_eq!(settings.trails.stale_ticks, 10);
    }

    #[test]
    fn ron_round_trip() {
        let settings = VfxSettings::default();
        let text = settings.to_ron_string().unwrap();
        let parsed = VfxSettings::from_ron_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn rejects_out_of_range_stiffness() {
        let err = VfxSettings::from_ron_str("(verlet: (stiffness: 1.5))").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "verlet.stiffness",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_ron() {
        let err = VfxSettings::from_ron_str("(verlet: (stiffness: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_widening_pass_order() {
        let passes = vec![
            PassDescriptor {
                label: "core".into(),
                width_scale: 0.5,
                ..Default::default()
            },
            PassDescriptor {
                label: "bloom".into(),
                width_scale: 3.0,
                ..Default::default()
            },
        ];
        assert!(validate_passes(&passes).is_err());
        assert!(validate_passes(&[]).is_err());
        assert!(validate_passes(&CompositorSettings::default().passes).is_ok());
    }

    #[test]
    fn rejects_tiny_trail_capacity() {
        let style = TrailStyle {
            capacity: 1,
            ..Default::default()
        };
        assert!(validate_trail_style(&style).is_err());
    }
}
