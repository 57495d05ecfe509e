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

use lumen_core::math::{Vec2, EPSILON};
use lumen_core::settings::VerletSettings;

/// A point mass of a Verlet chain. Velocity is implicit: `position - previous_position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerletNode {
    /// Current position.
    pub position: Vec2,
    /// Position at the previous tick.
    pub previous_position: Vec2,
    /// Anchored nodes are moved only by [`VerletChain::step`]'s anchor arguments.
    pub anchored: bool,
}

impl VerletNode {
    fn at(position: Vec2, anchored: bool) -> Self {
        Self {
            position,
            previous_position: position,
            anchored,
        }
    }

    /// The displacement over the last tick.
    pub fn velocity(&self) -> Vec2 {
        self.position - self.previous_position
    }
}

/// A chain of Verlet nodes joined by equal-length distance constraints.
///
/// The first and last nodes are anchored. Nodes live in one contiguous
/// vector; node `i` is linked to node `i + 1`.
#[derive(Debug, Clone)]
pub struct VerletChain {
    nodes: Vec<VerletNode>,
    rest_length: f32,
    settings: VerletSettings,
}

impl VerletChain {
    /// Creates a chain of `segments` links between two anchors whose total
    /// length is the anchor distance times `slack` (at least `1.0`).
    pub fn new(
        anchor_a: Vec2,
        anchor_b: Vec2,
        segments: usize,
        slack: f32,
        settings: VerletSettings,
    ) -> Self {
        let segments = segments.max(1);
        let slack = if slack.is_finite() { slack.max(1.0) } else { 1.0 };
        let rest_length = anchor_a.distance(anchor_b) * slack / segments as f32;
        Self::with_rest_length(anchor_a, anchor_b, segments, rest_length, settings)
    }

    /// Creates a chain with an explicit per-link rest length.
    ///
    /// When the links are longer than the anchor gap, interior nodes start on
    /// a parabolic sag of matching arc length, bowed along the bias (or to the
    /// left of A→B when there is none). A straight start would leave the
    /// relaxation nothing to push against.
    pub fn with_rest_length(
        anchor_a: Vec2,
        anchor_b: Vec2,
        segments: usize,
        rest_length: f32,
        settings: VerletSettings,
    ) -> Self {
        let segments = segments.max(1);
        let anchor_a = finite_or_zero(anchor_a);
        let anchor_b = finite_or_zero(anchor_b);
        let rest_length = if rest_length.is_finite() {
            rest_length.max(0.0)
        } else {
            0.0
        };
        let mut chain = Self {
            nodes: Vec::with_capacity(segments + 1),
            rest_length,
            settings: sanitize(settings),
        };
        chain.lay_out(anchor_a, anchor_b, segments);
        chain
    }

    fn lay_out(&mut self, anchor_a: Vec2, anchor_b: Vec2, segments: usize) {
        let span = anchor_b - anchor_a;
        let distance = span.length();
        let total = self.rest_length * segments as f32;
        let sag = if total > distance {
            (3.0 * distance * (total - distance) / 8.0).sqrt()
        } else {
            0.0
        };

        let left = span.normalize_or(Vec2::X).perp();
        let bias = self.settings.bias;
        let side = if bias.length_squared() > EPSILON && left.dot(bias) < 0.0 {
            -left
        } else {
            left
        };

        self.nodes.clear();
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let anchored = i == 0 || i == segments;
            let position = anchor_a + span * t + side * (4.0 * sag * t * (1.0 - t));
            self.nodes.push(VerletNode::at(position, anchored));
        }
    }

    /// Advances the chain one tick with the anchors at their new positions.
    ///
    /// Non-finite anchors keep their previous position.
    pub fn step(&mut self, anchor_a: Vec2, anchor_b: Vec2) {
        self.pin_anchors(anchor_a, anchor_b);
        self.integrate();
        for _ in 0..self.settings.iterations {
            self.relax();
        }

        if !self.is_finite() {
            let (a, b) = self.anchors();
            log::warn!("Verlet chain diverged, resetting {} nodes", self.nodes.len());
            self.lay_out(a, b, self.segment_count());
        }
    }

    fn pin_anchors(&mut self, anchor_a: Vec2, anchor_b: Vec2) {
        let last = self.nodes.len() - 1;
        for (index, anchor) in [(0, anchor_a), (last, anchor_b)] {
            if anchor.is_finite() {
                self.nodes[index] = VerletNode::at(anchor, true);
            }
        }
    }

    fn integrate(&mut self) {
        let VerletSettings { damping, bias, .. } = self.settings;
        for node in self.nodes.iter_mut().filter(|n| !n.anchored) {
            let velocity = node.velocity();
            node.previous_position = node.position;
            node.position += velocity * damping + bias;
        }
    }

    fn relax(&mut self) {
        let stiffness = self.settings.stiffness;
        for i in 0..self.nodes.len() - 1 {
            let delta = self.nodes[i + 1].position - self.nodes[i].position;
            let length = delta.length();
            if length <= EPSILON {
                continue;
            }
            let error = (length - self.rest_length) / length * stiffness;
            let correction = delta * (error * 0.5);
            if !self.nodes[i].anchored {
                self.nodes[i].position += correction;
            }
            if !self.nodes[i + 1].anchored {
                self.nodes[i + 1].position -= correction;
            }
        }
    }

    /// The nodes, anchor A first.
    pub fn nodes(&self) -> &[VerletNode] {
        &self.nodes
    }

    /// Number of links.
    pub fn segment_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Rest length of each link.
    pub fn rest_length(&self) -> f32 {
        self.rest_length
    }

    /// The solver settings in use.
    pub fn settings(&self) -> &VerletSettings {
        &self.settings
    }

    /// Replaces the solver settings. Out-of-range values are clamped.
    pub fn set_settings(&mut self, settings: VerletSettings) {
        self.settings = sanitize(settings);
    }

    /// Current positions of anchors A and B.
    pub fn anchors(&self) -> (Vec2, Vec2) {
        let last = self.nodes.len() - 1;
        (self.nodes[0].position, self.nodes[last].position)
    }

    /// Iterates over node positions, anchor A first.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.nodes.iter().map(|n| n.position)
    }

    /// Writes the node positions into `out`, clearing it first.
    pub fn positions_into(&self, out: &mut Vec<Vec2>) {
        out.clear();
        out.extend(self.positions());
    }

    /// Iterates over the links as `(start, end)` position pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.nodes.windows(2).map(|w| (w[0].position, w[1].position))
    }

    /// Current length along the chain.
    pub fn total_length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }

    /// Largest relative deviation of a link from its rest length. Zero for zero-length links.
    pub fn max_strain(&self) -> f32 {
        if self.rest_length <= EPSILON {
            return 0.0;
        }
        self.segments()
            .map(|(a, b)| (a.distance(b) - self.rest_length).abs() / self.rest_length)
            .fold(0.0, f32::max)
    }

    /// Returns `true` if every node position is finite.
    pub fn is_finite(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.position.is_finite() && n.previous_position.is_finite())
    }
}

fn sanitize(settings: VerletSettings) -> VerletSettings {
    let damping = if settings.damping.is_finite() {
        settings.damping.clamp(0.0, 0.999)
    } else {
        VerletSettings::default().damping
    };
    let stiffness = if settings.stiffness.is_finite() {
        settings.stiffness.clamp(0.01, 1.0)
    } else {
        VerletSettings::default().stiffness
    };
    VerletSettings {
        damping,
        stiffness,
        iterations: settings.iterations.max(1),
        bias: finite_or_zero(settings.bias),
    }
}

fn finite_or_zero(v: Vec2) -> Vec2 {
    if v.is_finite() {
        v
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn still() -> VerletSettings {
        VerletSettings {
            bias: Vec2::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_counts_and_anchors() {
        let chain = VerletChain::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 1.0, still());
        assert_eq!(chain.nodes().len(), 11);
        assert_eq!(chain.segment_count(), 10);
        assert_relative_eq!(chain.rest_length(), 10.0);
        assert!(chain.nodes()[0].anchored && chain.nodes()[10].anchored);
        assert!(chain.nodes()[1..10].iter().all(|n| !n.anchored));
        assert_relative_eq!(chain.max_strain(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_slack_starts_sagging_along_bias() {
        let settings = VerletSettings {
            bias: Vec2::new(0.0, 0.5),
            ..Default::default()
        };
        let chain = VerletChain::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 10, 1.2, settings);
        let middle = chain.nodes()[5].position;
        assert!(middle.y > 10.0);
        // The parabola approximates the requested length closely.
        assert!((chain.total_length() - 120.0).abs() < 5.0);
    }

    #[test]
    fn test_anchors_follow_step() {
        let mut chain = VerletChain::new(Vec2::ZERO, Vec2::new(50.0, 0.0), 5, 1.1, still());
        chain.step(Vec2::new(5.0, 5.0), Vec2::new(60.0, 5.0));
        assert_eq!(chain.anchors(), (Vec2::new(5.0, 5.0), Vec2::new(60.0, 5.0)));
        assert_eq!(chain.nodes()[0].velocity(), Vec2::ZERO);
        chain.step(Vec2::new(f32::NAN, 0.0), Vec2::new(60.0, 5.0));
        assert_eq!(chain.anchors().0, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_zero_rest_length_is_stable() {
        let mut chain =
            VerletChain::with_rest_length(Vec2::ZERO, Vec2::new(30.0, 0.0), 6, 0.0, still());
        for i in 0..50 {
            chain.step(Vec2::ZERO, Vec2::new(30.0 + i as f32, 0.0));
        }
        assert!(chain.is_finite());
        assert_eq!(chain.max_strain(), 0.0);
    }

    #[test]
    fn test_zero_rest_length_holds_against_bias() {
        let anchor = Vec2::new(10.0, 10.0);
        let settings = VerletSettings {
            bias: Vec2::new(0.0, 0.15),
            ..Default::default()
        };
        let mut chain = VerletChain::new(anchor, anchor, 8, 1.1, settings);
        assert_eq!(chain.rest_length(), 0.0);
        for _ in 0..1000 {
            chain.step(anchor, anchor);
        }
        assert!(chain.is_finite());
        let drift = chain
            .positions()
            .map(|p| p.distance(anchor))
            .fold(0.0, f32::max);
        assert!(drift < 1.0, "nodes drifted {drift} away from the anchors");
    }

    #[test]
    fn test_single_segment_is_all_anchors() {
        let mut chain = VerletChain::new(Vec2::ZERO, Vec2::X, 0, 1.0, still());
        assert_eq!(chain.segment_count(), 1);
        chain.step(Vec2::Y, Vec2::ONE);
        assert_eq!(chain.positions().collect::<Vec<_>>(), vec![Vec2::Y, Vec2::ONE]);
    }

    #[test]
    fn test_out_of_range_settings_are_clamped() {
        let chain = VerletChain::new(
            Vec2::ZERO,
            Vec2::X,
            2,
            1.0,
            VerletSettings {
                damping: 4.0,
                stiffness: f32::NAN,
                iterations: 0,
                bias: Vec2::new(f32::INFINITY, 0.0),
            },
        );
        let s = chain.settings();
        assert!(s.damping < 1.0);
        assert_relative_eq!(s.stiffness, 0.8);
        assert_eq!(s.iterations, 1);
        assert_eq!(s.bias, Vec2::ZERO);
    }
}
