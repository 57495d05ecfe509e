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

use lumen_agents::BlendScope;
use lumen_core::math::Vec2;
use lumen_core::vfx::{
    BlendConfig, BlendMode, QuadDraw, RibbonVertex, SamplerMode, TextureId, VfxBackend,
};
use lumen_core::BackendError;
use lumen_infra::{DrawCommand, HeadlessBackend};

const HOST: BlendConfig = BlendConfig::new(BlendMode::AlphaBlend, SamplerMode::PointClamp);

#[test]
fn test_scope_leaves_no_batch_when_none_was_open() {
    let mut backend = HeadlessBackend::new();
    {
        let scope = BlendScope::begin(&mut backend, BlendConfig::ADDITIVE);
        assert!(scope.is_active());
    }
    assert_eq!(backend.active_batch(), None);
    assert_eq!(
        backend.commands(),
        &[DrawCommand::BeginBatch(BlendConfig::ADDITIVE), DrawCommand::EndBatch]
    );
}

#[test]
fn test_scope_restores_host_batch() {
    let mut backend = HeadlessBackend::new();
    backend.open_host_batch(HOST);
    {
        let mut scope = BlendScope::begin(&mut backend, BlendConfig::ADDITIVE);
        scope.draw_indexed(TextureId(1), &[], &[]);
    }
    assert_eq!(backend.active_batch(), Some(HOST));
    assert_eq!(
        backend.opened_batches(),
        vec![BlendConfig::ADDITIVE, HOST],
        "the scope's own batch, then the host's again"
    );
    assert_eq!(backend.draws_outside_batch(), 0);
}

/// A host backend that ends the open batch as a side effect of drawing.
struct ClosingBackend(HeadlessBackend);

impl VfxBackend for ClosingBackend {
    fn begin_batch(&mut self, config: BlendConfig) -> Result<(), BackendError> {
        self.0.begin_batch(config)
    }
    fn end_batch(&mut self) -> Result<(), BackendError> {
        self.0.end_batch()
    }
    fn active_batch(&self) -> Option<BlendConfig> {
        self.0.active_batch()
    }
    fn draw_quad(&mut self, quad: &QuadDraw) {
        self.0.draw_quad(quad);
    }
    fn draw_indexed(&mut self, texture: TextureId, vertices: &[RibbonVertex], indices: &[u32]) {
        self.0.draw_indexed(texture, vertices, indices);
        self.0.force_close();
    }
    fn screen_offset(&self) -> Vec2 {
        self.0.screen_offset()
    }
}

#[test]
fn test_scope_tolerates_batch_closed_underneath() {
    let mut backend = ClosingBackend(HeadlessBackend::new());
    {
        let mut scope = BlendScope::begin(&mut backend, BlendConfig::ADDITIVE);
        scope.draw_indexed(TextureId(1), &[], &[]);
    }
    assert_eq!(backend.active_batch(), None);
    assert!(!backend
        .0
        .commands()
        .iter()
        .any(|c| matches!(c, DrawCommand::EndBatch)));
}

#[test]
fn test_scope_is_inert_when_begin_fails() {
    let mut backend = HeadlessBackend::new();
    backend.open_host_batch(HOST);
    backend.fail_next_begins(1);
    {
        let mut scope = BlendScope::begin(&mut backend, BlendConfig::ADDITIVE);
        assert!(!scope.is_active());
        scope.draw_indexed(TextureId(1), &[], &[]);
    }
    assert_eq!(backend.draw_count(), 0);
    assert_eq!(backend.active_batch(), Some(HOST));
}
