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

use super::ansi_scan::{scan, sgr_escape, Span};

/// The pair of SGR attributes a reader would see as "currently active" after printing
/// some byte span: an intensity (none / bright / dim) and a foreground color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveAnsi {
    /// `0` = no intensity, `1` = bright (`SGR 1`), `2` = dim (`SGR 2`).
    pub intensity: u8,
    /// `0` = untouched, `30..=37` = a basic color, `39` = explicit foreground reset.
    pub forecolor: u16,
}

impl ActiveAnsi {
    /// Folds one raw SGR code into the accumulated state, per the update rules in the
    /// data model: `0` zeros both fields; `1`/`2` set intensity; `39` clears the
    /// foreground; anything else sets the foreground.
    pub fn update(&mut self, code: u16) {
        match code {
            0 => {
                self.intensity = 0;
                self.forecolor = 0;
            }
            1 | 2 => self.intensity = code as u8,
            39 => self.forecolor = 39,
            other => self.forecolor = other,
        }
    }

    /// The bytes that would restore a reader to the "nothing active" state: `SGR 0` if
    /// intensity is set, else `SGR 39` if the foreground was touched, else nothing.
    pub fn reset_bytes(&self) -> Vec<u8> {
        if self.intensity != 0 {
            sgr_escape(0)
        } else if self.forecolor != 0 {
            sgr_escape(39)
        } else {
            Vec::new()
        }
    }
}

/// Scans a byte span for `ESC [ DIGITS m` sequences and folds every match into an
/// [`ActiveAnsi`], in order. The result is what a downstream reader would see as
/// "currently active" having printed the whole span from a neutral start state.
pub fn active_ansi(bytes: &[u8]) -> ActiveAnsi {
    let mut state = ActiveAnsi::default();
    for span in scan(bytes) {
        if let Span::Sgr { codes, .. } = span {
            for code in codes {
                state.update(code);
            }
        }
    }
    state
}

/// Computes the escape bytes that must follow `input` so that everything after it
/// keeps rendering with the attributes of `target`, given that printing `input` itself
/// (on top of whatever came before it) leaves the reader in state `after_input`.
///
/// This is the delta used by [`crate::line_buffer::LineBuffer::inject`] to "heal" the
/// color of a line's untouched tail after a mid-line rewrite.
pub fn delta_bytes(after_input: &ActiveAnsi, target: &ActiveAnsi) -> Vec<u8> {
    let intensity_changed = after_input.intensity != target.intensity;
    let forecolor_changed = after_input.forecolor != target.forecolor;
    if !intensity_changed && !forecolor_changed {
        return Vec::new();
    }
    let mut out = Vec::new();
    if intensity_changed {
        out.extend(sgr_escape(0));
    } else if forecolor_changed {
        out.extend(sgr_escape(39));
    }
    if target.intensity != 0 {
        out.extend(sgr_escape(target.intensity as u16));
    }
    if target.forecolor != 0 {
        out.extend(sgr_escape(target.forecolor));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_all_zeros_both_fields() {
        let state = active_ansi(b"\x1b[1m\x1b[31m\x1b[0m");
        assert_eq!(state, ActiveAnsi::default());
    }

    #[test]
    fn tracks_intensity_and_forecolor() {
        let state = active_ansi(b"\x1b[2m\x1b[34mhello");
        assert_eq!(state.intensity, 2);
        assert_eq!(state.forecolor, 34);
    }

    #[test]
    fn forty_nine_clears_forecolor_to_explicit_reset() {
        let mut state = ActiveAnsi {
            intensity: 0,
            forecolor: 31,
        };
        state.update(39);
        assert_eq!(state.forecolor, 39);
    }

    #[test]
    fn reset_bytes_prefers_full_reset() {
        let state = ActiveAnsi {
            intensity: 1,
            forecolor: 31,
        };
        assert_eq!(state.reset_bytes(), sgr_escape(0));
    }

    #[test]
    fn reset_bytes_falls_back_to_forecolor_reset() {
        let state = ActiveAnsi {
            intensity: 0,
            forecolor: 31,
        };
        assert_eq!(state.reset_bytes(), sgr_escape(39));
    }

    #[test]
    fn reset_bytes_empty_when_untouched() {
        assert_eq!(ActiveAnsi::default().reset_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn delta_bytes_no_change_is_empty() {
        let a = ActiveAnsi {
            intensity: 1,
            forecolor: 31,
        };
        assert!(delta_bytes(&a, &a).is_empty());
    }

    #[test]
    fn delta_bytes_reapplies_old_state_on_intensity_change() {
        let after_input = ActiveAnsi {
            intensity: 0,
            forecolor: 31,
        };
        let target = ActiveAnsi {
            intensity: 1,
            forecolor: 31,
        };
        let bytes = delta_bytes(&after_input, &target);
        assert_eq!(bytes, [sgr_escape(0), sgr_escape(1), sgr_escape(31)].concat());
    }
}
