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
use std::sync::RwLock;

use once_cell::sync::Lazy;

use super::ansi_scan::sgr_escape;

/// A reset/intensity/foreground triple that can be rendered to a complete SGR escape
/// sequence (e.g. `@(dim)` -> `ESC[2m`, `@(bright,red)` -> `ESC[1mESC[31m`,
/// `@(reset)` -> `ESC[0m`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCode {
    /// Whether this code includes a full `SGR 0` reset.
    pub reset: bool,
    /// `Some(1)` for bright, `Some(2)` for dim, `None` for no intensity.
    pub intensity: Option<u16>,
    /// `Some(30..=37)` basic foreground color, `Some(39)` for an explicit foreground
    /// reset (`cr`), `None` for no color change.
    pub forecolor: Option<u16>,
}

impl ColorCode {
    pub const fn new(intensity: Option<u16>, forecolor: Option<u16>) -> Self {
        Self {
            reset: false,
            intensity,
            forecolor,
        }
    }

    pub const fn reset_all() -> Self {
        Self {
            reset: true,
            intensity: None,
            forecolor: None,
        }
    }

    /// Renders the escape bytes for this code: reset first if present, then
    /// intensity, then forecolor, with no trailing reset appended (callers own that).
    pub fn to_escape_bytes(self) -> Vec<u8> {
        let mut out = Vec::new();
        if self.reset {
            out.extend(sgr_escape(0));
        }
        if let Some(i) = self.intensity {
            out.extend(sgr_escape(i));
        }
        if let Some(c) = self.forecolor {
            out.extend(sgr_escape(c));
        }
        out
    }
}

const BLACK: u16 = 30;
const RED: u16 = 31;
const GREEN: u16 = 32;
const YELLOW: u16 = 33;
const BLUE: u16 = 34;
const MAGENTA: u16 = 35;
const CYAN: u16 = 36;
const WHITE: u16 = 37;

const BRIGHT: u16 = 1;
const DIM: u16 = 2;

/// Process-wide symbol table mapping color template names (`@(name)`) to
/// [`ColorCode`]s. Seeded with the built-in names and extensible at runtime via
/// [`add_color_code`].
///
/// `dim` maps to a literal `SGR 2`, not `BRIGHT|BLACK` — the two are visually distinct
/// (most terminals render `SGR 2` as a genuinely dimmed foreground, not black-on-black)
/// and the worked example in the testable properties calls for a single `ESC[2m`.
static COLOR_TABLE: Lazy<RwLock<HashMap<&'static str, ColorCode>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("black", ColorCode::new(None, Some(BLACK)));
    m.insert("red", ColorCode::new(None, Some(RED)));
    m.insert("green", ColorCode::new(None, Some(GREEN)));
    m.insert("yellow", ColorCode::new(None, Some(YELLOW)));
    m.insert("blue", ColorCode::new(None, Some(BLUE)));
    m.insert("magenta", ColorCode::new(None, Some(MAGENTA)));
    m.insert("cyan", ColorCode::new(None, Some(CYAN)));
    m.insert("white", ColorCode::new(None, Some(WHITE)));
    m.insert("bright", ColorCode::new(Some(BRIGHT), None));
    m.insert("dim", ColorCode::new(Some(DIM), None));
    m.insert("r", ColorCode::reset_all());
    m.insert("reset", ColorCode::reset_all());
    m.insert("cr", ColorCode::new(None, Some(39)));
    // Semantic aliases: not spelled out verbatim anywhere, chosen to match the
    // conventional red/green/yellow triad every other logger in this family uses.
    m.insert("error", ColorCode::new(None, Some(RED)));
    m.insert("success", ColorCode::new(None, Some(GREEN)));
    m.insert("warn", ColorCode::new(None, Some(YELLOW)));
    RwLock::new(m)
});

/// Looks up a color template name. Unknown names resolve to no-op (no escape bytes),
/// matching the template expander's "unrecognized name is left unstyled" behavior.
pub fn lookup(name: &str) -> Option<ColorCode> {
    COLOR_TABLE.read().unwrap().get(name).copied()
}

/// Registers or overrides a color template name at runtime.
pub fn add_color_code(name: &'static str, code: ColorCode) {
    COLOR_TABLE.write().unwrap().insert(name, code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_is_a_single_sgr_two_not_bright_black() {
        let dim = lookup("dim").unwrap();
        assert_eq!(dim.to_escape_bytes(), b"\x1b[2m".to_vec());
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        assert!(lookup("nonexistent-color-xyz").is_none());
    }

    #[test]
    fn bright_red_combination_emits_both_codes_in_order() {
        let combo = ColorCode::new(Some(BRIGHT), Some(RED));
        assert_eq!(combo.to_escape_bytes(), b"\x1b[1m\x1b[31m".to_vec());
    }

    #[test]
    fn add_color_code_is_visible_to_later_lookups() {
        add_color_code("my-test-alias", ColorCode::new(None, Some(CYAN)));
        assert_eq!(lookup("my-test-alias").unwrap().forecolor, Some(CYAN));
    }

    #[test]
    fn semantic_aliases_match_conventional_triad() {
        assert_eq!(lookup("error").unwrap().forecolor, Some(RED));
        assert_eq!(lookup("success").unwrap().forecolor, Some(GREEN));
        assert_eq!(lookup("warn").unwrap().forecolor, Some(YELLOW));
    }

    #[test]
    fn reset_aliases_emit_sgr_zero() {
        assert_eq!(lookup("r").unwrap().to_escape_bytes(), b"\x1b[0m".to_vec());
        assert_eq!(lookup("reset").unwrap().to_escape_bytes(), b"\x1b[0m".to_vec());
    }

    #[test]
    fn cr_resets_only_the_foreground() {
        assert_eq!(lookup("cr").unwrap().to_escape_bytes(), b"\x1b[39m".to_vec());
    }
}
