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

use std::collections::HashMap;
use std::io::Write;

use time::OffsetDateTime;

use crate::color::{active_ansi, display_width, trim, trim_ellipsis};
use crate::public_api::flags::Flags;
use crate::term_caps;

use super::ids::LoggerId;
use super::line_buffer::LineBuffer;

const MIN_SEGMENT: usize = 6;
const SEPARATOR: &str = " | ";
const ELLIPSIS_LEN: usize = 3;

/// One constructed logger's full mutable state, keyed by [`LoggerId`] inside the
/// [`SinkState`] it currently targets. Moving a logger's mutable fields here (rather
/// than on the public handle) is what makes the sink's single mutex sufficient to
/// guard every logger operation.
pub struct LoggerEntry {
    pub prefix: Vec<u8>,
    pub prefix_formatted: Vec<u8>,
    pub flags: Flags,
    pub buf: LineBuffer,

    pub partial_lines_enabled: Option<bool>,
    pub color_enabled: Option<bool>,
    pub color_template_enabled: Option<bool>,
    pub auto_append_newline: Option<bool>,
    pub color_regexp: Option<regex::Regex>,

    pub caller_file: Option<String>,
    pub caller_line: u32,
    pub now: OffsetDateTime,
    pub line_start_time: Option<OffsetDateTime>,
    pub temp_line_active: bool,
    pub is_closed: bool,
}

impl LoggerEntry {
    pub fn new(prefix: Vec<u8>, flags: Flags, now: OffsetDateTime) -> Self {
        let prefix_formatted = crate::color::expand_template(&String::from_utf8_lossy(&prefix));
        Self {
            prefix,
            prefix_formatted,
            flags,
            buf: LineBuffer::new(),
            partial_lines_enabled: None,
            color_enabled: None,
            color_template_enabled: None,
            auto_append_newline: None,
            color_regexp: None,
            caller_file: None,
            caller_line: 0,
            now,
            line_start_time: None,
            temp_line_active: false,
            is_closed: false,
        }
    }
}

/// Per-sink cursor state and repaint engine: everything downstream of the sink's
/// single mutex (§5 of the design notes).
pub struct SinkState {
    sink: Box<dyn Write + Send>,
    last_temp: Vec<Vec<u8>>,
    temp_loggers: Vec<LoggerId>,
    cursor_line_index: i64,
    cursor_is_at_begin: bool,
    cursor_is_inline: bool,
    term_width: usize,
    multiline: bool,
    pub loggers: HashMap<LoggerId, LoggerEntry>,
}

impl SinkState {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            last_temp: vec![Vec::new()],
            temp_loggers: Vec::new(),
            cursor_line_index: 0,
            cursor_is_at_begin: true,
            cursor_is_inline: false,
            term_width: 0,
            multiline: true,
            loggers: HashMap::new(),
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn Write + Send>) {
        self.sink = sink;
    }

    pub fn set_term_width(&mut self, width: usize) {
        self.term_width = width;
    }

    pub fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
    }

    pub fn multiline(&self) -> bool {
        self.multiline
    }

    pub fn detach(&mut self, id: LoggerId) {
        self.temp_loggers.retain(|&x| x != id);
    }

    pub fn attach(&mut self, id: LoggerId) {
        if !self.temp_loggers.contains(&id) {
            self.temp_loggers.push(id);
        }
    }

    pub fn temp_loggers(&self) -> &[LoggerId] {
        &self.temp_loggers
    }

    fn effective_width(&self) -> usize {
        if self.term_width > 0 {
            self.term_width
        } else {
            term_caps::term_width()
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        let _ = self.sink.write_all(bytes);
        let _ = self.sink.flush();
    }

    /// `move_to(line)`: emits `cud`/`cuu` one step at a time until the cursor is on
    /// `line`, then a bare `\r`.
    fn move_to(&mut self, line: i64) {
        while self.cursor_line_index < line {
            self.cursor_line_index += 1;
            let bytes = term_caps::cursor_down(1);
            self.write_raw(&bytes);
        }
        while self.cursor_line_index > line {
            self.cursor_line_index -= 1;
            let bytes = term_caps::cursor_up(1);
            self.write_raw(&bytes);
        }
        self.write_raw(b"\r");
        self.cursor_is_at_begin = true;
    }

    /// Paints `buf` at partial-line row `line`, per §4.F.
    fn paint_at(&mut self, line: usize, buf: &[u8]) {
        if self.last_temp.len() <= line {
            self.last_temp.resize(line + 1, Vec::new());
        }
        if buf == self.last_temp[line].as_slice() {
            return;
        }

        let cursor_on_line = self.cursor_line_index == line as i64;
        if cursor_on_line
            && self.cursor_is_inline
            && buf.starts_with(self.last_temp[line].as_slice())
        {
            let suffix = &buf[self.last_temp[line].len()..];
            self.write_raw(suffix);
            let old_width = display_width(&self.last_temp[line]);
            self.last_temp[line] = buf.to_vec();
            self.cursor_is_inline = display_width(buf) >= old_width;
            self.cursor_is_at_begin = false;
            return;
        }

        let reset = active_ansi(&self.last_temp[line]).reset_bytes();
        if !reset.is_empty() {
            self.write_raw(&reset);
        }
        // If already at column 0 of `line`, nothing to move: `move_to` itself ends
        // with the `\r` that relocating the cursor would otherwise need.
        if !(cursor_on_line && self.cursor_is_at_begin) {
            self.move_to(line as i64);
        }
        self.write_raw(buf);

        let old_width = display_width(&self.last_temp[line]);
        let new_width = display_width(buf);
        if old_width > new_width {
            let padding = vec![b' '; old_width - new_width];
            self.write_raw(&padding);
        }
        self.cursor_is_inline = new_width >= old_width;
        self.cursor_is_at_begin = buf.is_empty();
        self.last_temp[line] = buf.to_vec();
    }

    /// Emits a completed full line (§4.F "Emitting a full line").
    pub fn emit_full_line(&mut self, formatted: &[u8]) {
        self.paint_at(0, formatted);
        let reset = active_ansi(formatted).reset_bytes();
        if !reset.is_empty() {
            self.write_raw(&reset);
        }

        if self.multiline && self.last_temp.len() > 1 {
            self.last_temp.remove(0);
            self.cursor_line_index = -1;
            self.move_to(0);
            if self.last_temp.is_empty() {
                self.last_temp.push(Vec::new());
                self.move_to(0);
                self.write_raw(b"\n");
            }
        } else {
            self.write_raw(b"\n");
            self.last_temp[0] = Vec::new();
            self.cursor_is_at_begin = true;
            self.cursor_is_inline = false;
        }
    }

    /// Re-renders every currently attached partial line, per §4.F "Updating partial
    /// lines". `pieces` is each attached logger's current formatted partial text, in
    /// `temp_loggers` order.
    pub fn update_partials(&mut self, pieces: Vec<Vec<u8>>) {
        if pieces.is_empty() {
            return;
        }
        let width = self.effective_width();

        if self.multiline {
            while self.last_temp.len() < pieces.len() {
                self.move_to(self.last_temp.len() as i64 - 1);
                self.write_raw(b"\n");
                self.last_temp.push(Vec::new());
            }
            for (i, piece) in pieces.iter().enumerate() {
                let fitted = trim_ellipsis(piece, width.saturating_sub(1));
                self.paint_at(i, &fitted);
            }
        } else {
            let fitted = self.fit_single_line(&pieces, width);
            self.paint_at(0, &fitted);
        }
    }

    fn fit_single_line(&self, pieces: &[Vec<u8>], width: usize) -> Vec<u8> {
        let sep_len = SEPARATOR.len();
        let budget = width
            .saturating_sub(1)
            .saturating_sub(sep_len.saturating_mul(pieces.len().saturating_sub(1)));

        let original_lens: Vec<usize> = pieces.iter().map(|p| display_width(p)).collect();
        let mut target_lens = original_lens.clone();

        let mut total: usize = target_lens.iter().sum();
        while total > budget {
            let (idx, _) = target_lens
                .iter()
                .enumerate()
                .max_by_key(|&(_, &len)| len)
                .unwrap();
            if target_lens[idx] <= MIN_SEGMENT {
                break;
            }
            let was_at_original = target_lens[idx] == original_lens[idx];
            target_lens[idx] -= 1;
            if was_at_original && target_lens[idx] < original_lens[idx] {
                let extra = ELLIPSIS_LEN + 1;
                target_lens[idx] = target_lens[idx].saturating_sub(extra).max(MIN_SEGMENT);
            }
            total = target_lens.iter().sum();
        }

        let mut rendered = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                rendered.extend_from_slice(SEPARATOR.as_bytes());
            }
            if target_lens[i] < original_lens[i] {
                rendered.extend(trim(piece, target_lens[i]));
                rendered.extend_from_slice("...".as_bytes());
            } else {
                rendered.extend_from_slice(piece);
            }
        }
        trim_ellipsis(&rendered, width.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSink;
    use pretty_assertions::assert_eq;

    fn state_with(sink: MockSink) -> SinkState {
        SinkState::new(Box::new(sink))
    }

    #[test]
    fn paint_at_writes_full_line_first_time() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.paint_at(0, b"hello");
        assert_eq!(sink.contents(), b"hello".to_vec());
    }

    #[test]
    fn paint_at_is_a_no_op_when_unchanged() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.paint_at(0, b"hello");
        sink.clear();
        state.paint_at(0, b"hello");
        assert!(sink.contents().is_empty());
    }

    #[test]
    fn paint_at_writes_only_suffix_when_inline_and_prefix_matches() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.paint_at(0, b"hello");
        state.cursor_is_inline = true;
        sink.clear();
        state.paint_at(0, b"hello world");
        assert_eq!(sink.contents(), b" world".to_vec());
    }

    #[test]
    fn paint_at_pads_with_spaces_when_new_content_is_shorter() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.paint_at(0, b"hello world");
        sink.clear();
        state.paint_at(0, b"hi");
        let out = sink.contents();
        let trailing_spaces = out.iter().rev().take_while(|&&b| b == b' ').count();
        assert_eq!(trailing_spaces, "hello world".len() - "hi".len());
    }

    #[test]
    fn update_partials_joins_multiple_pieces_with_separator_in_single_line_mode() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.set_multiline(false);
        state.set_term_width(80);
        state.update_partials(vec![b"alpha".to_vec(), b"beta".to_vec()]);
        assert_eq!(sink.contents(), b"alpha | beta".to_vec());
    }

    #[test]
    fn empty_pieces_is_a_no_op() {
        let sink = MockSink::new();
        let mut state = state_with(sink.clone());
        state.update_partials(vec![]);
        assert!(sink.contents().is_empty());
    }
}
