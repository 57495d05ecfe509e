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

use lumen_core::vfx::{BlendConfig, QuadDraw, RibbonVertex, TextureId, VfxBackend};
use lumen_core::BackendError;

/// A scoped drawing batch.
///
/// Acquiring the scope ends whatever batch the backend had open and begins
/// one with the requested configuration. Dropping it ends that batch and
/// re-opens the one it found, so the host's batch state is the same before
/// and after, on every exit path. When nothing was open, nothing is left open.
///
/// If the backend refuses to open the batch the scope is inert: draws
/// through it are skipped.
pub struct BlendScope<'b, B: VfxBackend + ?Sized> {
    backend: &'b mut B,
    previous: Option<BlendConfig>,
    active: bool,
}

impl<'b, B: VfxBackend + ?Sized> BlendScope<'b, B> {
    /// Opens a batch with `config` on `backend`.
    pub fn begin(backend: &'b mut B, config: BlendConfig) -> Self {
        let previous = match backend.active_batch() {
            Some(open) => match backend.end_batch() {
                Ok(()) => Some(open),
                Err(BackendError::BatchNotOpen) => {
                    log::debug!("BlendScope: host batch was already closed");
                    None
                }
                Err(err) => {
                    log::warn!("BlendScope: could not close host batch: {err}");
                    None
                }
            },
            None => None,
        };

        let active = match backend.begin_batch(config) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("BlendScope: could not open {:?} batch: {err}", config.blend);
                false
            }
        };

        Self {
            backend,
            previous,
            active,
        }
    }

    /// Returns `true` if the scope's batch is open and draws will be submitted.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Draws a quad inside the scope's batch.
    pub fn draw_quad(&mut self, quad: &QuadDraw) {
        if self.active {
            self.backend.draw_quad(quad);
        }
    }

    /// Draws an indexed triangle list inside the scope's batch.
    pub fn draw_indexed(&mut self, texture: TextureId, vertices: &[RibbonVertex], indices: &[u32]) {
        if self.active {
            self.backend.draw_indexed(texture, vertices, indices);
        }
    }
}

impl<B: VfxBackend + ?Sized> Drop for BlendScope<'_, B> {
    fn drop(&mut self) {
        if self.active {
            match self.backend.end_batch() {
                Ok(()) => {}
                Err(BackendError::BatchNotOpen) => {
                    log::debug!("BlendScope: batch was closed before the scope ended");
                }
                Err(err) => log::warn!("BlendScope: could not close batch: {err}"),
            }
        }
        if let Some(previous) = self.previous {
            if let Err(err) = self.backend.begin_batch(previous) {
                log::warn!("BlendScope: could not restore host batch: {err}");
            }
        }
    }
}
