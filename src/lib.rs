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

//! A concurrent terminal logger: many [`Logger`] handles across many threads can write
//! to the same sink at once, each owning its own colorized prefix and flag set, while
//! in-progress ("partial") lines from every logger attached to a sink are repainted
//! in place rather than interleaved.
//!
//! # Why use this crate
//!
//! 1. Plain `eprintln!` calls from multiple threads interleave arbitrarily mid-line.
//!    This crate serializes every write through a per-sink mutex, so a line from one
//!    logger is never spliced into the middle of another's.
//! 2. Long-running work (a progress indicator, a "still connecting..." status) wants to
//!    update its own line in place instead of spamming the scrollback. A [`Logger`]
//!    with partial lines enabled does this automatically: write without a trailing
//!    `\n` and the bytes become a status line that gets repainted, not scrolled, until
//!    a `\n` finally arrives.
//! 3. Prefixes support a small color-template language (`@(dim:{isodate}) `) and a
//!    token scanner (`{date}`, `{time}`, `{isodate}`, `{elapsed}`), so timestamped,
//!    colorized log lines don't require building up the escape sequences by hand.
//!
//! # How to use this crate
//!
//! ```no_run
//! use r3bl_term_logger::{Logger, Flags};
//!
//! let logger = Logger::new_stderr("@(dim:{isodate}) ", Flags::empty());
//! logger.log(b"starting up\n").unwrap();
//! logger.log(b"connecting...").unwrap(); // no `\n`: becomes a partial status line
//! logger.log(b" done\n").unwrap();       // completes it; the line is emitted normally
//! ```
//!
//! Most programs share the process-wide [`DEFAULT_LOGGER`] instead of constructing
//! their own: any [`Logger`] that leaves a toggle (partial lines, color, templates,
//! auto-newline) unset inherits that toggle from it.
//!
//! # Module map
//!
//! - [`color`]: ANSI/SGR scanning, the `@(name,name:text)` template language, and
//!   ANSI-aware display-width measurement and truncation.
//! - [`format`]: the `{date|time|isodate|elapsed}` prefix token renderer and the
//!   cascading duration pretty-printer behind `{elapsed}`.
//! - [`logger_impl`]: the rendering engine — a per-logger [`LineBuffer`] with a virtual
//!   cursor, a per-sink cursor FSM and repaint algorithm, and the emit pipeline that
//!   ties them together.
//! - [`term_caps`]: the external-collaborator boundary — terminal width, cursor-motion
//!   escapes, caller-frame resolution, and wall-clock access, all `crossterm`/`time`
//!   backed.
//! - [`public_api`]: [`Logger`], [`Flags`], and the process-wide registry.
//!
//! [`LineBuffer`]: logger_impl::LineBuffer

pub mod color;
pub mod error;
pub mod format;
pub mod logger_impl;
pub mod public_api;
pub mod term_caps;
pub mod test_support;

pub use error::{LogError, LogResult};
pub use public_api::{shutdown, Flags, Logger, SinkId, L_STD_FLAGS, DEFAULT_LOGGER};
