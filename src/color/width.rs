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

use super::ansi_scan::{scan, Span};

const TAB_WIDTH: usize = 8;

/// Counts the columns `bytes` would occupy on a terminal, skipping SGR escapes and
/// expanding tabs to the next multiple of 8. Counts `char`s, not grapheme clusters: a
/// multi-codepoint grapheme (e.g. an emoji + modifier) counts once per codepoint, by
/// design, to avoid pulling in a grapheme-segmentation dependency for a display concern
/// this crate does not promise to get right for combining sequences.
pub fn display_width(bytes: &[u8]) -> usize {
    let mut width = 0usize;
    for span in scan(bytes) {
        if let Span::Text(text) = span {
            width += text_width(text);
        }
    }
    width
}

fn text_width(text: &[u8]) -> usize {
    let s = String::from_utf8_lossy(text);
    let mut width = 0usize;
    for ch in s.chars() {
        if ch == '\t' {
            width += TAB_WIDTH - (width % TAB_WIDTH);
        } else {
            width += 1;
        }
    }
    width
}

/// Copies `bytes` up to (and no further than) `max_width` display columns, preserving
/// every SGR escape encountered along the way (escapes cost zero width and are never
/// dropped, even ones past the truncation point that occur before it in byte order).
pub fn trim(bytes: &[u8], max_width: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut width = 0usize;
    'outer: for span in scan(bytes) {
        match span {
            Span::Sgr { raw, .. } => out.extend_from_slice(raw),
            Span::Text(text) => {
                let s = String::from_utf8_lossy(text);
                for ch in s.chars() {
                    let ch_width = if ch == '\t' {
                        TAB_WIDTH - (width % TAB_WIDTH)
                    } else {
                        1
                    };
                    if width + ch_width > max_width {
                        break 'outer;
                    }
                    width += ch_width;
                    if ch == '\t' {
                        out.extend(std::iter::repeat(b' ').take(ch_width));
                    } else {
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                }
            }
        }
    }
    out
}

/// Drops every SGR escape from `bytes`, leaving only the plain text. Used when a
/// logger or sink has color disabled outright, rather than merely un-templated.
pub fn strip_ansi(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for span in scan(bytes) {
        if let Span::Text(text) = span {
            out.extend_from_slice(text);
        }
    }
    out
}

/// Like [`trim`], but if truncation actually happened, the cut is made 3 columns short
/// and a literal `"..."` is appended in their place, so the truncation is visible to the
/// reader. If `bytes` already fits, it is returned untouched (no ellipsis appended to
/// content that wasn't cut). Guaranteed to fit within `max_width` only for `max_width >=
/// 3`; below that, the 3-byte ellipsis itself may overrun it.
pub fn trim_ellipsis(bytes: &[u8], max_width: usize) -> Vec<u8> {
    if display_width(bytes) <= max_width {
        return trim(bytes, max_width);
    }
    let mut out = trim(bytes, max_width.saturating_sub(3));
    out.extend_from_slice(b"...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_escapes() {
        let bytes = b"\x1b[31mhello\x1b[0m";
        assert_eq!(display_width(bytes), 5);
    }

    #[test]
    fn width_expands_tabs_to_next_multiple_of_eight() {
        assert_eq!(display_width(b"a\tb"), 9);
        assert_eq!(display_width(b"\t"), 8);
        assert_eq!(display_width(b"ab\tc"), 9);
    }

    #[test]
    fn trim_preserves_escapes_that_precede_the_cut() {
        let bytes = b"\x1b[31mhello world";
        let trimmed = trim(bytes, 5);
        assert_eq!(trimmed, b"\x1b[31mhello".to_vec());
    }

    #[test]
    fn trim_ellipsis_only_applied_when_truncated() {
        let bytes = b"hello world";
        assert_eq!(trim_ellipsis(b"hello", 10), b"hello".to_vec());
        let cut = trim_ellipsis(bytes, 6);
        assert_eq!(cut, b"hel...".to_vec());
        assert_eq!(display_width(&cut), 6);
    }

    #[test]
    fn trim_ellipsis_below_three_columns_still_emits_the_full_ellipsis() {
        assert_eq!(trim_ellipsis(b"hello", 0), b"...".to_vec());
    }

    #[test]
    fn strip_ansi_drops_only_escapes() {
        assert_eq!(strip_ansi(b"\x1b[31mhello\x1b[0m"), b"hello".to_vec());
    }
}
