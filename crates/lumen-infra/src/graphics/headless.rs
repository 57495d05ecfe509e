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
use lumen_core::vfx::{BlendConfig, QuadDraw, RibbonVertex, TextureId, VfxBackend};
use lumen_core::BackendError;

/// A command recorded by the [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A batch was opened.
    BeginBatch(BlendConfig),
    /// The open batch was closed.
    EndBatch,
    /// A quad was drawn inside `batch`.
    Quad {
        /// The draw request.
        quad: QuadDraw,
        /// The batch open at the time, if any.
        batch: Option<BlendConfig>,
    },
    /// An indexed triangle list was drawn inside `batch`.
    Indexed {
        /// Texture sampled by the triangles.
        texture: TextureId,
        /// Vertex data as submitted.
        vertices: Vec<RibbonVertex>,
        /// Index data as submitted.
        indices: Vec<u32>,
        /// The batch open at the time, if any.
        batch: Option<BlendConfig>,
    },
}

/// A rendering backend with no device behind it.
///
/// It enforces the batch protocol (one open batch at a time) and records every
/// command so tests and tools can inspect what a frame would have drawn.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    commands: Vec<DrawCommand>,
    active: Option<BlendConfig>,
    screen_offset: Vec2,
    failing_begins: usize,
}

impl HeadlessBackend {
    /// Creates a backend with no open batch and a zero screen offset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the world-to-screen offset reported to the compositor.
    pub fn set_screen_offset(&mut self, offset: Vec2) {
        self.screen_offset = offset;
    }

    /// Makes the next `count` calls to `begin_batch` fail with a device error.
    pub fn fail_next_begins(&mut self, count: usize) {
        self.failing_begins = count;
    }

    /// Opens a batch without recording it, as a host would before handing over the frame.
    pub fn open_host_batch(&mut self, config: BlendConfig) {
        self.active = Some(config);
    }

    /// Closes any open batch without recording it, simulating a host that ends
    /// the batch behind the compositor's back.
    pub fn force_close(&mut self) {
        self.active = None;
    }

    /// Every command recorded so far, in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hands over the recorded commands and starts a fresh log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of draw commands (quads and indexed lists) recorded.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Quad { .. } | DrawCommand::Indexed { .. }))
            .count()
    }

    /// Number of draws submitted while no batch was open.
    pub fn draws_outside_batch(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCommand::Quad { batch: None, .. } | DrawCommand::Indexed { batch: None, .. }
                )
            })
            .count()
    }

    /// The configurations of every batch opened, in order.
    pub fn opened_batches(&self) -> Vec<BlendConfig> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::BeginBatch(config) => Some(*config),
                _ => None,
            })
            .collect()
    }
}

impl VfxBackend for HeadlessBackend {
    fn begin_batch(&mut self, config: BlendConfig) -> Result<(), BackendError> {
        if self.failing_begins > 0 {
            self.failing_begins -= 1;
            return Err(BackendError::Device("injected begin failure".to_string()));
        }
        if self.active.is_some() {
            return Err(BackendError::BatchAlreadyOpen);
        }
        log::trace!("HeadlessBackend: begin batch {:?}", config);
        self.active = Some(config);
        self.commands.push(DrawCommand::BeginBatch(config));
        Ok(())
    }

    fn end_batch(&mut self) -> Result<(), BackendError> {
        if self.active.take().is_none() {
            return Err(BackendError::BatchNotOpen);
        }
        log::trace!("HeadlessBackend: end batch");
        self.commands.push(DrawCommand::EndBatch);
        Ok(())
    }

    fn active_batch(&self) -> Option<BlendConfig> {
        self.active
    }

    fn draw_quad(&mut self, quad: &QuadDraw) {
        self.commands.push(DrawCommand::Quad {
            quad: *quad,
            batch: self.active,
        });
    }

    fn draw_indexed(&mut self, texture: TextureId, vertices: &[RibbonVertex], indices: &[u32]) {
        self.commands.push(DrawCommand::Indexed {
            texture,
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            batch: self.active,
        });
    }

    fn screen_offset(&self) -> Vec2 {
        self.screen_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_protocol() {
        let mut backend = HeadlessBackend::new();
        assert_eq!(backend.end_batch(), Err(BackendError::BatchNotOpen));
        assert!(backend.begin_batch(BlendConfig::ADDITIVE).is_ok());
        assert_eq!(
            backend.begin_batch(BlendConfig::ALPHA),
            Err(BackendError::BatchAlreadyOpen)
        );
        assert_eq!(backend.active_batch(), Some(BlendConfig::ADDITIVE));
        assert!(backend.end_batch().is_ok());
        assert_eq!(backend.active_batch(), None);
        assert_eq!(
            backend.commands(),
            &[DrawCommand::BeginBatch(BlendConfig::ADDITIVE), DrawCommand::EndBatch]
        );
    }

    #[test]
    fn test_injected_failure() {
        let mut backend = HeadlessBackend::new();
        backend.fail_next_begins(1);
        assert!(matches!(
            backend.begin_batch(BlendConfig::ALPHA),
            Err(BackendError::Device(_))
        ));
        assert!(backend.begin_batch(BlendConfig::ALPHA).is_ok());
    }

    #[test]
    fn test_draws_record_their_batch() {
        let mut backend = HeadlessBackend::new();
        backend.draw_indexed(TextureId(1), &[RibbonVertex::default(); 4], &[0, 1, 2, 1, 3, 2]);
        backend.begin_batch(BlendConfig::ADDITIVE).ok();
        backend.draw_indexed(TextureId(1), &[RibbonVertex::default(); 4], &[0, 1, 2, 1, 3, 2]);
        assert_eq!(backend.draw_count(), 2);
        assert_eq!(backend.draws_outside_batch(), 1);
        assert_eq!(backend.take_commands().len(), 3);
        assert!(backend.commands().is_empty());
    }
}
