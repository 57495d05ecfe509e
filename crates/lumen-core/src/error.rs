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

//! Defines the error types surfaced by Lumen's collaborators and settings.
//!
//! Geometry never produces errors: degenerate input renders as nothing. The
//! only fallible seams are the rendering backend's batch scoping, which the
//! compositor swallows, and settings loading, which the host handles.

use thiserror::Error;

/// An error reported by a rendering backend while opening or closing a drawing batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// `end_batch` was called while no batch was open.
    #[error("no drawing batch is currently open")]
    BatchNotOpen,
    /// `begin_batch` was called while another batch was still open.
    #[error("a drawing batch is already open")]
    BatchAlreadyOpen,
    /// The backend failed for a reason of its own.
    #[error("backend failure: {0}")]
    Device(String),
}

/// An error raised while loading or validating [`VfxSettings`](crate::settings::VfxSettings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings source was not valid RON.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// The settings could not be written out as RON.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    /// The settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// A field holds a value outside its allowed range.
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
