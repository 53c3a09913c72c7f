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

use crate::error::{LogError, LogResult};

/// Default terminal width assumed when the real width can't be discovered (piped
/// output, a sink that isn't a tty, or a `crossterm` query failure).
pub const DEFAULT_WIDTH: usize = 80;

/// Queries the current terminal's column count, surfacing the underlying `crossterm`
/// failure rather than silently falling back.
pub fn try_term_width() -> LogResult<usize> {
    crossterm::terminal::size()
        .map(|(cols, _rows)| cols as usize)
        .map_err(|e| LogError::TerminalQueryFailure(e.to_string()))
}

/// Queries the current terminal's column count. Falls back to [`DEFAULT_WIDTH`] on any
/// failure (not a tty, no controlling terminal, etc.) rather than propagating an error
/// up through every line-wrapping call site.
pub fn term_width() -> usize {
    try_term_width().unwrap_or(DEFAULT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_width_never_panics_and_returns_nonzero() {
        assert!(term_width() > 0);
    }

    #[test]
    fn terminal_query_failure_carries_the_underlying_message() {
        let err = LogError::TerminalQueryFailure("not a tty".to_string());
        assert_eq!(err.to_string(), "terminal capability query failed: not a tty");
    }
}
