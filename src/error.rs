/*
 *   Copyright (c) 2024 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use thiserror::Error;

/// Errors surfaced by [`crate::Logger`] operations.
///
/// Most logging paths never propagate an error (bytes silently drop rather than making
/// a logging call fail loudly), but a handful of conditions are worth a typed signal:
/// writing to a logger after [`crate::Logger::close`], and the two soft degradations
/// from the terminal-capability boundary.
#[derive(Debug, Error)]
pub enum LogError {
    /// Emit was attempted after [`crate::Logger::close`] ran.
    #[error("write to closed logger")]
    WriteToClosedLogger,

    /// The terminal capability boundary (width or cursor-motion escapes) could not be
    /// resolved. Callers that receive this should treat it as soft: the caller already
    /// fell back to a default (width 80, or an empty escape).
    #[error("terminal capability query failed: {0}")]
    TerminalQueryFailure(String),

    /// Caller-frame resolution failed; `file:line` fields fall back to `???:0`.
    #[error("caller resolution failed")]
    CallerResolutionFailure,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type LogResult<T> = Result<T, LogError>;
