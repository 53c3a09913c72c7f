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

use once_cell::sync::Lazy;
use regex::Regex;

use super::active_ansi::active_ansi;
use super::code::lookup;

/// Matches `@(name,name,...)` or `@(name,name,...:text)`, capturing the comma-joined
/// name list in group 1 and the optional styled text in group 3.
static TEMPLATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\(([\w,]+)(:([^)]*))?\)").unwrap());

/// Expands every `@(name,name:text)` occurrence in `input` using the default matcher.
///
/// With a `:text` payload, the names' escape bytes are emitted, then `text`, then
/// `active_ansi(just-emitted escapes).reset_bytes()`. Without a payload, the template
/// splices in the raw escape bytes for the named codes with no reset, turning a color
/// "on" for everything that follows until something else turns it off. If any name in
/// the list is unrecognized, the whole match (including the `@(...)` wrapper) is
/// emitted unchanged rather than partially applied.
pub fn expand(input: &str) -> Vec<u8> {
    expand_with(input, &TEMPLATE_RE)
}

/// The default `@(name,name:text)` matcher, for callers that need to compare a
/// per-logger override against "no override configured".
pub fn default_regexp() -> Regex {
    TEMPLATE_RE.clone()
}

/// Like [`expand`], but matches templates with a caller-supplied `regexp` instead of
/// the default, per [`crate::Logger::set_color_template_regexp`].
pub fn expand_with(input: &str, regexp: &Regex) -> Vec<u8> {
    let mut out = Vec::new();
    let mut last_end = 0usize;
    for caps in regexp.captures_iter(input) {
        let whole = caps.get(0).unwrap();
        out.extend_from_slice(input[last_end..whole.start()].as_bytes());
        last_end = whole.end();

        let names = caps.get(1).unwrap().as_str();
        let text = caps.get(3).map(|m| m.as_str());

        let codes: Option<Vec<_>> = names.split(',').map(lookup).collect();
        let Some(codes) = codes else {
            out.extend_from_slice(whole.as_str().as_bytes());
            continue;
        };

        let mut escapes = Vec::new();
        for code in codes {
            escapes.extend(code.to_escape_bytes());
        }
        out.extend_from_slice(&escapes);

        if let Some(text) = text {
            out.extend_from_slice(text.as_bytes());
            out.extend(active_ansi(&escapes).reset_bytes());
        }
    }
    out.extend_from_slice(input[last_end..].as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_with_text_matches_worked_example() {
        let out = expand("@(dim:2024-01-01T00:00:00Z)");
        assert_eq!(
            out,
            b"\x1b[2m2024-01-01T00:00:00Z\x1b[0m".to_vec()
        );
    }

    #[test]
    fn color_only_with_text_resets_to_thirtynine() {
        let out = expand("@(red:boom)");
        assert_eq!(out, b"\x1b[31mboom\x1b[39m".to_vec());
    }

    #[test]
    fn no_payload_splices_raw_codes_with_no_reset() {
        let out = expand("prefix @(bright,red) suffix");
        assert_eq!(out, b"prefix \x1b[1m\x1b[31m suffix".to_vec());
    }

    #[test]
    fn unrecognized_name_is_emitted_unchanged() {
        let out = expand("@(not-a-real-color:x)");
        assert_eq!(out, b"@(not-a-real-color:x)".to_vec());
    }

    #[test]
    fn partial_recognition_still_leaves_whole_match_unchanged() {
        let out = expand("@(red,not-a-real-color:x)");
        assert_eq!(out, b"@(red,not-a-real-color:x)".to_vec());
    }

    #[test]
    fn plain_text_passes_through_untouched() {
        assert_eq!(expand("no templates here"), b"no templates here".to_vec());
    }
}
