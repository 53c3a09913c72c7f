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

//! The rendering engine itself: a per-logger [`line_buffer::LineBuffer`] with a virtual
//! cursor, a per-sink [`sink_state::SinkState`] cursor FSM and repaint algorithm, and
//! [`logger_core::LoggerCore`], which orchestrates a write from raw bytes down to
//! painted terminal output.

pub mod ids;
pub mod line_buffer;
pub mod logger_core;
pub mod sink_state;
pub mod toggles;

pub use ids::LoggerId;
pub use line_buffer::LineBuffer;
pub use logger_core::LoggerCore;
pub use sink_state::{LoggerEntry, SinkState};
pub use toggles::DefaultToggles;
