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

//! The four external-collaborator boundaries the core logging engine consumes rather
//! than reimplements: terminal width, cursor-motion escapes, caller-frame resolution,
//! and wall-clock time. Backed by `crossterm` and `time` in place of the spec's
//! `tput`/IOCTL/stack-walking originals.

mod caller;
mod cursor;
mod now;
mod width;

pub use caller::{resolve as resolve_caller, shorten as shorten_file, CallerLocation};
pub use cursor::{cursor_down, cursor_up, CursorDirection};
pub use now::{now, to_zone};
pub use width::{term_width, try_term_width, DEFAULT_WIDTH};
