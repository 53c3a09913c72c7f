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

use crate::color::{active_ansi, delta_bytes, display_width, trim};

/// A single logger's in-progress line, with a virtual cursor that can sit anywhere
/// inside it. Never contains `\n` (once a newline appears, [`crate::logger_impl::logger_core`]
/// drains it into a painted full line).
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    buf: Vec<u8>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Clears the buffer and resets the cursor to 0, discarding any pending content.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    /// Replaces the entire buffer with `bytes` and moves the cursor to its end.
    pub fn replace(&mut self, bytes: &[u8]) {
        self.buf = bytes.to_vec();
        self.cursor = self.buf.len();
    }

    /// Discards the first `old_prefix_len` bytes of the buffer and replaces them with
    /// `new_prefix`, leaving everything from `old_prefix_len` onward untouched and
    /// moving the cursor to the end of `new_prefix`. Used by the emit pipeline to
    /// collapse a bare carriage return within a not-yet-completed line: the bytes
    /// before the `\r` are overwritten without disturbing whatever already followed
    /// the line (including a trailing `\n` and any further buffered lines).
    pub fn splice_prefix(&mut self, old_prefix_len: usize, new_prefix: &[u8]) {
        let tail = self.buf[old_prefix_len..].to_vec();
        let mut new_buf = new_prefix.to_vec();
        new_buf.extend_from_slice(&tail);
        self.cursor = new_prefix.len();
        self.buf = new_buf;
    }

    /// Writes `input` at the virtual cursor position, per the color-healing algorithm:
    /// appending at end-of-buffer is the common case; overwriting mid-line preserves
    /// the original coloring of whatever wasn't overwritten. A bare `\r` (one not
    /// immediately followed by `\n`) relocates the cursor to 0 first; only the bytes
    /// after the last such `\r` are actually injected, mirroring `splice_prefix`.
    pub fn inject(&mut self, input: &[u8]) {
        if input.is_empty() {
            return;
        }

        let mut input = input;
        if let Some(cr_idx) = last_bare_carriage_return(input) {
            self.cursor = 0;
            input = &input[cr_idx + 1..];
            if input.is_empty() {
                return;
            }
        }

        if self.cursor == self.buf.len() {
            self.buf.extend_from_slice(input);
            self.cursor = self.buf.len();
            return;
        }

        let (before, after) = self.buf.split_at(self.cursor);
        let before = before.to_vec();
        let after = after.to_vec();

        let after_width = display_width(&after);
        let input_width = display_width(input);

        if input_width >= after_width {
            let mut new_buf = before;
            new_buf.extend_from_slice(input);
            self.cursor = new_buf.len();
            self.buf = new_buf;
            return;
        }

        let removed = trim(&after, input_width);
        let mut prefix_with_removed = before.clone();
        prefix_with_removed.extend_from_slice(&removed);
        let ansi_old = active_ansi(&prefix_with_removed);

        let mut prefix_with_input = before.clone();
        prefix_with_input.extend_from_slice(input);
        let ansi_new = active_ansi(&prefix_with_input);

        let escapes = delta_bytes(&ansi_new, &ansi_old);

        let mut new_buf = before;
        new_buf.extend_from_slice(input);
        self.cursor = new_buf.len();
        new_buf.extend(escapes);
        new_buf.extend_from_slice(&after[removed.len()..]);
        self.buf = new_buf;
    }
}

/// The index of the last `\r` in `input` that is not immediately followed by `\n`
/// (a CRLF pair is a line ending, not a mid-line cursor-reset request).
fn last_bare_carriage_return(input: &[u8]) -> Option<usize> {
    input
        .iter()
        .enumerate()
        .rev()
        .find(|&(i, &b)| b == b'\r' && input.get(i + 1) != Some(&b'\n'))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inject_at_end_appends() {
        let mut lb = LineBuffer::new();
        lb.inject(b"hello");
        lb.inject(b" world");
        assert_eq!(lb.as_bytes(), b"hello world");
        assert_eq!(lb.cursor(), 11);
    }

    #[test]
    fn inject_longer_than_remainder_truncates_tail() {
        let mut lb = LineBuffer::new();
        lb.inject(b"hello world");
        lb.cursor = 0;
        lb.inject(b"goodbye universe!!!");
        assert_eq!(lb.as_bytes(), b"goodbye universe!!!");
    }

    #[test]
    fn overwrite_before_a_reset_heals_the_tails_color() {
        let mut lb = LineBuffer::new();
        lb.inject(b"\x1b[31mhello\x1b[0m world");
        lb.cursor = 10; // right after "hello", before the embedded reset
        lb.inject(b"Z");
        assert_eq!(
            lb.as_bytes(),
            b"\x1b[31mhelloZ\x1b[39mworld".as_slice()
        );
    }

    #[test]
    fn plain_overwrite_preserves_uncolored_tail() {
        let mut lb = LineBuffer::new();
        lb.inject(b"aaaaaaaaaa");
        lb.cursor = 0;
        lb.inject(b"bb");
        assert_eq!(lb.as_bytes(), b"bbaaaaaaaa");
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut lb = LineBuffer::new();
        lb.inject(b"hello");
        let before = lb.as_bytes().to_vec();
        lb.inject(b"");
        assert_eq!(lb.as_bytes(), before.as_slice());
    }

    #[test]
    fn bare_carriage_return_relocates_cursor_to_start_and_heals() {
        // Overwriting the first 3 bytes of "red apple" with "gre" leaves "apple"'s
        // leading space untouched: "gre" + " apple".
        let mut lb = LineBuffer::new();
        lb.inject(b"red apple");
        lb.inject(b"\r");
        lb.inject(b"gre");
        assert_eq!(lb.as_bytes(), b"gre apple".as_slice());
        assert_eq!(lb.cursor(), 3);
    }

    #[test]
    fn carriage_return_immediately_before_newline_is_not_bare() {
        let mut lb = LineBuffer::new();
        lb.inject(b"hello\r\nworld");
        assert_eq!(lb.as_bytes(), b"hello\r\nworld".as_slice());
    }

    #[test]
    fn last_bare_cr_in_a_single_inject_wins() {
        let mut lb = LineBuffer::new();
        lb.inject(b"aaaaaaaaaa");
        lb.inject(b"xy\rcd\ref");
        assert_eq!(lb.as_bytes(), b"efaaaaaaaa".as_slice());
        assert_eq!(lb.cursor(), 2);
    }

    #[test]
    fn splice_prefix_discards_leading_bytes_and_keeps_tail() {
        let mut lb = LineBuffer::new();
        lb.inject(b"AAA\nrest");
        lb.splice_prefix(3, b"B");
        assert_eq!(lb.as_bytes(), b"B\nrest".as_slice());
        assert_eq!(lb.cursor(), 1);
    }

    #[test]
    fn replace_resets_cursor_to_end() {
        let mut lb = LineBuffer::new();
        lb.inject(b"hello");
        lb.replace(b"hi");
        assert_eq!(lb.as_bytes(), b"hi");
        assert_eq!(lb.cursor(), 2);
    }
}
