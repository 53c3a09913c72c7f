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

/// The four tri-state toggles every logger may leave unset, in which case it inherits
/// the process-wide `DefaultLogger`'s setting. Passed into [`super::logger_core`]
/// operations by the public API, which is the only layer that knows about the registry
/// (and thus the `DefaultLogger`).
#[derive(Debug, Clone, Copy)]
pub struct DefaultToggles {
    pub partial_lines_enabled: bool,
    pub color_enabled: bool,
    pub color_template_enabled: bool,
    pub auto_append_newline: bool,
}

impl Default for DefaultToggles {
    fn default() -> Self {
        Self {
            partial_lines_enabled: true,
            color_enabled: true,
            color_template_enabled: true,
            auto_append_newline: false,
        }
    }
}
