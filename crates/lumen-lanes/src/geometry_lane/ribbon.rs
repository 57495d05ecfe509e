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

//! The ribbon mesh builder: a centerline becomes a triangle strip.
//!
//! For `N` centerline points the mesh holds `2N` vertices and `6(N - 1)`
//! indices. Point `i` contributes vertex `2i` on the left of the direction
//! of travel (`uv.y = 0`) and vertex `2i + 1` on the right (`uv.y = 1`).

use lumen_core::math::{finite_or, LinearRgba, Vec2};
use lumen_core::vfx::RibbonVertex;

use super::taper::{ColorFunction, OffsetFunction, WidthFunction};

/// An indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertices, two per centerline point.
    pub vertices: Vec<RibbonVertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of centerline points the mesh was built from.
    pub fn point_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Empties the mesh, keeping its allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Returns `true` if every vertex position, color and UV is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.position.is_finite() && v.color.is_finite() && v.uv.is_finite())
    }

    /// Writes a restyled copy of this mesh into `out`.
    ///
    /// Each left/right vertex pair is moved apart or together about its
    /// midpoint by `width_scale`, every position is shifted by `-offset`, and
    /// every color goes through `tint`. Indices are copied as-is.
    pub fn restyle_into(
        &self,
        out: &mut Mesh,
        width_scale: f32,
        offset: Vec2,
        tint: impl Fn(LinearRgba) -> LinearRgba,
    ) {
        out.clear();
        out.vertices.reserve(self.vertices.len());
        for pair in self.vertices.chunks_exact(2) {
            let (left, right) = (pair[0], pair[1]);
            let mid = (left.position + right.position) * 0.5;
            for v in [left, right] {
                out.vertices.push(RibbonVertex {
                    position: mid + (v.position - mid) * width_scale - offset,
                    color: tint(v.color),
                    uv: v.uv,
                });
            }
        }
        out.indices.extend_from_slice(&self.indices);
    }
}

/// Builds ribbon meshes from a centerline and the functions evaluated along it.
///
/// # Example
///
/// ```
/// use lumen_core::math::{LinearRgba, Vec2};
/// use lumen_lanes::geometry_lane::{QuadraticBump, RibbonBuilder, SolidColor};
///
/// let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 5.0)];
/// let width = QuadraticBump { peak: 8.0 };
/// let color = SolidColor(LinearRgba::CYAN);
/// let mesh = RibbonBuilder::new(&width, &color).build(&points);
/// assert_eq!(mesh.vertices.len(), 6);
/// assert_eq!(mesh.indices.len(), 12);
/// ```
pub struct RibbonBuilder<'a> {
    width: &'a dyn WidthFunction,
    color: &'a dyn ColorFunction,
    offset: Option<&'a dyn OffsetFunction>,
}

impl<'a> RibbonBuilder<'a> {
    /// Creates a builder with the given width and color functions and no offset.
    pub fn new(width: &'a dyn WidthFunction, color: &'a dyn ColorFunction) -> Self {
        Self {
            width,
            color,
            offset: None,
        }
    }

    /// Displaces the centerline by `offset` before extruding it.
    pub fn with_offset(mut self, offset: &'a dyn OffsetFunction) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builds a new mesh from `points`.
    pub fn build(&self, points: &[Vec2]) -> Mesh {
        let mut mesh = Mesh::new();
        self.build_into(points, &mut mesh);
        mesh
    }

    /// Builds the mesh for `points` into `mesh`, reusing its allocations.
    ///
    /// Fewer than two points produce an empty mesh. Non-finite input points,
    /// widths, offsets and colors are replaced so the output never contains NaN.
    pub fn build_into(&self, points: &[Vec2], mesh: &mut Mesh) {
        mesh.clear();
        let n = points.len();
        if n < 2 {
            return;
        }

        let sanitized = sanitize(points);
        let points = sanitized.as_slice();
        mesh.vertices.reserve(n * 2);
        mesh.indices.reserve((n - 1) * 6);

        let mut tangent = seed_direction(points);
        let last = (n - 1) as f32;
        for i in 0..n {
            tangent = tangent_at(points, i, tangent);
            let progress = i as f32 / last;

            let mut center = points[i];
            if let Some(offset) = self.offset {
                let shift = offset.offset(progress);
                if shift.is_finite() {
                    center += shift;
                }
            }

            let half = finite_or(self.width.width(progress), 0.0).max(0.0) * 0.5;
            let color = self.color.color(progress);
            let color = if color.is_finite() {
                color
            } else {
                LinearRgba::TRANSPARENT
            };

            let side = tangent.perp() * half;
            mesh.vertices.push(RibbonVertex {
                position: center + side,
                color,
                uv: Vec2::new(progress, 0.0),
            });
            mesh.vertices.push(RibbonVertex {
                position: center - side,
                color,
                uv: Vec2::new(progress, 1.0),
            });
        }

        for i in 0..(n as u32 - 1) {
            let base = i * 2;
            mesh.indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base + 1,
                base + 3,
                base + 2,
            ]);
        }
    }
}

/// Replaces every non-finite point by the previous finite one (or the origin).
fn sanitize(points: &[Vec2]) -> Vec<Vec2> {
    let mut last_good = points.iter().copied().find(Vec2::is_finite).unwrap_or(Vec2::ZERO);
    points
        .iter()
        .map(|p| {
            if p.is_finite() {
                last_good = *p;
            }
            last_good
        })
        .collect()
}

/// The direction of the first non-degenerate segment, or `+X` for a line of
/// coincident points.
fn seed_direction(points: &[Vec2]) -> Vec2 {
    points
        .windows(2)
        .map(|w| w[1] - w[0])
        .find(|d| d.length_squared() > f32::EPSILON)
        .map(|d| d.normalize())
        .unwrap_or(Vec2::X)
}

/// Unit tangent at point `i`; `previous` is used wherever the local direction is degenerate.
fn tangent_at(points: &[Vec2], i: usize, previous: Vec2) -> Vec2 {
    let n = points.len();
    if i == 0 {
        return (points[1] - points[0]).normalize_or(previous);
    }
    if i == n - 1 {
        return (points[n - 1] - points[n - 2]).normalize_or(previous);
    }
    let incoming = (points[i] - points[i - 1]).normalize();
    let outgoing = (points[i + 1] - points[i]).normalize();
    // A hairpin cancels out; fall back to whichever side still has a direction.
    (incoming + outgoing).normalize_or(incoming.normalize_or(outgoing.normalize_or(previous)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry_lane::{ConstantWidth, SolidColor};
    use approx::assert_relative_eq;

    fn build(points: &[Vec2], width: f32) -> Mesh {
        RibbonBuilder::new(&ConstantWidth(width), &SolidColor(LinearRgba::WHITE)).build(points)
    }

    #[test]
    fn test_sizes() {
        let pts: Vec<Vec2> = (0..5).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let mesh = build(&pts, 2.0);
        assert_eq!(mesh.vertices.len(), 10);
        assert_eq!(mesh.indices.len(), 24);
        assert_eq!(&mesh.indices[..6], &[0, 1, 2, 1, 3, 2]);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_degenerate_inputs_are_empty() {
        assert!(build(&[], 2.0).is_empty());
        assert!(build(&[Vec2::ONE], 2.0).vertices.is_empty());
    }

    #[test]
    fn test_left_and_right() {
        // Travelling +X with Y down: the perpendicular (-y, x) points to +Y.
        let mesh = build(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 4.0);
        assert_eq!(mesh.vertices[0].position, Vec2::new(0.0, 2.0));
        assert_eq!(mesh.vertices[1].position, Vec2::new(0.0, -2.0));
        assert_eq!(mesh.vertices[0].uv, Vec2::new(0.0, 0.0));
        assert_eq!(mesh.vertices[3].uv, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let pts = [Vec2::ONE; 4];
        let mesh = build(&pts, 6.0);
        assert!(mesh.is_finite());
        assert_relative_eq!(mesh.vertices[0].position.distance(mesh.vertices[1].position), 6.0);
    }

    #[test]
    fn test_hairpin_stays_finite() {
        let pts = [Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::ZERO];
        let mesh = build(&pts, 2.0);
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_nan_input_is_replaced() {
        let pts = [Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::new(3.0, 0.0)];
        let nan_width = |_t: f32| f32::NAN;
        let mesh = RibbonBuilder::new(&nan_width, &SolidColor(LinearRgba::RED)).build(&pts);
        assert_eq!(mesh.vertices.len(), 6);
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_restyle_scales_about_midpoint() {
        let mesh = build(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 4.0);
        let mut out = Mesh::new();
        mesh.restyle_into(&mut out, 0.5, Vec2::new(1.0, 0.0), |c| c.scale_rgb(0.5));
        assert_eq!(out.vertices[0].position, Vec2::new(-1.0, 1.0));
        assert_eq!(out.vertices[1].position, Vec2::new(-1.0, -1.0));
        assert_relative_eq!(out.vertices[0].color.r, 0.5);
        assert_eq!(out.indices, mesh.indices);
    }
}
