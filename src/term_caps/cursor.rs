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
use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Which direction a cached cursor-motion escape moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorDirection {
    Up,
    Down,
}

/// Cache of cursor-motion escape byte sequences, keyed by (direction, step count), so
/// repeated repaints don't re-encode the same `crossterm` command on every call. This
/// stands in for the spec's `tput`-subprocess-backed cache: the bytes `crossterm`
/// produces for `MoveUp(n)`/`MoveDown(n)` are pure functions of `n`, so caching by value
/// is correct and avoids the subprocess entirely.
static CURSOR_CACHE: Lazy<Mutex<HashMap<(CursorDirection, u16), Vec<u8>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the escape bytes that move the cursor `n` rows in `direction`, from cache if
/// already computed. `n == 0` yields an empty sequence (no-op).
pub fn motion_bytes(direction: CursorDirection, n: u16) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let mut cache = CURSOR_CACHE.lock().unwrap();
    cache
        .entry((direction, n))
        .or_insert_with(|| encode(direction, n))
        .clone()
}

fn encode(direction: CursorDirection, n: u16) -> Vec<u8> {
    use crossterm::cursor::{MoveDown, MoveUp};
    use crossterm::Command;

    let mut out = String::new();
    let result = match direction {
        CursorDirection::Up => MoveUp(n).write_ansi(&mut out),
        CursorDirection::Down => MoveDown(n).write_ansi(&mut out),
    };
    // `write_ansi` on a `String` sink is infallible; `crossterm`'s `Command` trait
    // only returns `fmt::Result` because it's generic over any `fmt::Write`.
    result.expect("writing ansi escape to a String cannot fail");
    out.into_bytes()
}

pub fn cursor_up(n: u16) -> Vec<u8> {
    motion_bytes(CursorDirection::Up, n)
}

pub fn cursor_down(n: u16) -> Vec<u8> {
    motion_bytes(CursorDirection::Down, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_is_empty() {
        assert!(cursor_up(0).is_empty());
        assert!(cursor_down(0).is_empty());
    }

    #[test]
    fn nonzero_steps_produce_bytes_and_are_cached() {
        let first = cursor_up(3);
        let second = cursor_up(3);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn up_and_down_differ() {
        assert_ne!(cursor_up(2), cursor_down(2));
    }
}
