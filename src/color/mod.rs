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

//! ANSI/SGR handling: scanning escape sequences, tracking "currently active" color
//! state across a rewritten line, measuring and trimming display width, and expanding
//! the `@(name,name:text)` color template mini-language.

mod active_ansi;
mod ansi_scan;
mod code;
mod template;
mod width;

pub use active_ansi::{active_ansi, delta_bytes, ActiveAnsi};
pub use code::{add_color_code, lookup, ColorCode};
pub use template::{default_regexp as default_template_regexp, expand as expand_template, expand_with as expand_template_with};
pub use width::{display_width, strip_ansi, trim, trim_ellipsis};
