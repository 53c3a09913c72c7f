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

//! Low-level `ESC [ DIGITS m` scanner shared by [`crate::color::AnsiAccumulator`] (which
//! folds the digits into [`crate::color::ActiveAnsi`]) and
//! [`crate::color::width`] (which only needs to skip the bytes).

const ESC: u8 = 0x1b;

/// One chunk of a scanned byte span: either plain text, or a complete `ESC [ N m`
/// sequence with its parsed SGR codes.
pub enum Span<'a> {
    Text(&'a [u8]),
    Sgr { raw: &'a [u8], codes: Vec<u16> },
}

/// Splits `bytes` into an ordered sequence of [`Span`]s. Never splits an `ESC [ N m`
/// sequence across two spans; a malformed escape (missing trailing `m`) is treated as
/// plain text starting at the `ESC` byte.
pub fn scan(bytes: &[u8]) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut text_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == ESC && bytes.get(i + 1) == Some(&b'[') {
            if let Some(end) = find_sgr_end(bytes, i + 2) {
                if text_start < i {
                    spans.push(Span::Text(&bytes[text_start..i]));
                }
                let raw = &bytes[i..=end];
                let codes = parse_codes(&bytes[i + 2..end]);
                spans.push(Span::Sgr { raw, codes });
                text_start = end + 1;
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    if text_start < bytes.len() {
        spans.push(Span::Text(&bytes[text_start..]));
    }
    spans
}

/// Finds the index of the terminating `m` for an SGR sequence starting at `start`
/// (the byte right after `ESC [`). Only digits and `;` are permitted in between.
fn find_sgr_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'0'..=b'9' | b';' => j += 1,
            b'm' => return Some(j),
            _ => return None,
        }
    }
    None
}

fn parse_codes(digits: &[u8]) -> Vec<u16> {
    if digits.is_empty() {
        return vec![0];
    }
    digits
        .split(|b| *b == b';')
        .map(|part| {
            if part.is_empty() {
                0
            } else {
                std::str::from_utf8(part)
                    .ok()
                    .and_then(|s| s.parse::<u16>().ok())
                    .unwrap_or(0)
            }
        })
        .collect()
}

/// Renders a single SGR code as a complete `ESC [ N m` escape sequence.
pub fn sgr_escape(code: u16) -> Vec<u8> {
    format!("\x1b[{code}m").into_bytes()
}
