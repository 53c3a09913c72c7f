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
use time::OffsetDateTime;

use crate::public_api::flags::Flags;
use crate::term_caps::{self, CallerLocation};

use super::duration::format_duration;

/// Matches `{date}`, `{time}`, `{isodate}`, `{elapsed}`, and the microsecond-precision
/// variant of each (`{time micros}`, `{isodate micros}`) inside an already
/// color-template-expanded prefix.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(date|time|isodate|elapsed)( micros)?\}").unwrap());

/// Everything a single line's prefix needs: the wall-clock instant it's being rendered
/// at, whether that instant (and the trailing date/time/elapsed block) should be in UTC
/// or local time, and when the line started (for `{elapsed}` and the trailing
/// `(elapsed)` block).
pub struct RenderContext {
    pub now: OffsetDateTime,
    pub utc: bool,
    pub line_start: Option<OffsetDateTime>,
}

/// Substitutes every `{date|time|isodate|elapsed}` token in `prefix_formatted`, then
/// appends the flag-driven trailing block: ISO date (if `Lisodate`), else date and/or
/// time (with microseconds if `Lmicroseconds`); then `file:line: ` (short or long per
/// flag, `Lshortfile` winning if both are set); then `(elapsed) ` if `Lelapsed`.
pub fn render(
    prefix_formatted: &[u8],
    flags: Flags,
    ctx: &RenderContext,
    caller: Option<&CallerLocation>,
) -> Vec<u8> {
    let text = String::from_utf8_lossy(prefix_formatted);
    let instant = term_caps::to_zone(ctx.now, ctx.utc);

    let mut out = TOKEN_RE
        .replace_all(&text, |caps: &regex::Captures| {
            let token = caps.get(1).unwrap().as_str();
            let micros = caps.get(2).is_some();
            render_token(token, micros, instant, ctx)
        })
        .into_owned()
        .into_bytes();

    if flags.contains(Flags::LISODATE) {
        out.extend(isodate_string(instant, false).into_bytes());
        out.push(b' ');
    } else {
        if flags.contains(Flags::LDATE) {
            out.extend(date_string(instant).into_bytes());
            out.push(b' ');
        }
        if flags.contains(Flags::LTIME) {
            out.extend(time_string(instant, flags.contains(Flags::LMICROSECONDS)).into_bytes());
            out.push(b' ');
        }
    }

    if flags.intersects(Flags::LSHORTFILE | Flags::LLONGFILE) {
        let loc = caller.cloned().unwrap_or(CallerLocation {
            file: "???".to_string(),
            line: 0,
            ok: false,
        });
        let file = if flags.contains(Flags::LSHORTFILE) {
            term_caps::shorten_file(&loc.file).to_string()
        } else {
            loc.file.clone()
        };
        out.extend(format!("{file}:{}: ", loc.line).into_bytes());
    }

    if flags.contains(Flags::LELAPSED) {
        out.extend(format!("({}) ", elapsed_string(instant, ctx)).into_bytes());
    }

    out
}

fn render_token(token: &str, micros: bool, instant: OffsetDateTime, ctx: &RenderContext) -> String {
    match token {
        "date" => date_string(instant),
        "time" => time_string(instant, micros),
        "isodate" => isodate_string(instant, micros),
        "elapsed" => elapsed_string(instant, ctx),
        _ => unreachable!("token regex only matches known token names"),
    }
}

fn date_string(instant: OffsetDateTime) -> String {
    format!(
        "{:04}/{:02}/{:02}",
        instant.year(),
        u8::from(instant.month()),
        instant.day()
    )
}

fn time_string(instant: OffsetDateTime, micros: bool) -> String {
    if micros {
        format!(
            "{:02}:{:02}:{:02}.{:06}",
            instant.hour(),
            instant.minute(),
            instant.second(),
            instant.microsecond()
        )
    } else {
        format!(
            "{:02}:{:02}:{:02}",
            instant.hour(),
            instant.minute(),
            instant.second()
        )
    }
}

fn isodate_string(instant: OffsetDateTime, micros: bool) -> String {
    let date = format!(
        "{:04}-{:02}-{:02}",
        instant.year(),
        u8::from(instant.month()),
        instant.day()
    );
    let time = time_string(instant, micros);
    format!("{date}T{time}Z")
}

fn elapsed_string(instant: OffsetDateTime, ctx: &RenderContext) -> String {
    match ctx.line_start {
        None => "-".to_string(),
        Some(start) if start == instant => "-".to_string(),
        Some(start) => {
            let delta = instant - start;
            let secs = delta.whole_seconds().unsigned_abs();
            let nanos = delta.subsec_nanoseconds().unsigned_abs();
            format_duration(std::time::Duration::new(secs, nanos))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ctx(now: OffsetDateTime, line_start: Option<OffsetDateTime>) -> RenderContext {
        RenderContext {
            now,
            utc: true,
            line_start,
        }
    }

    #[test]
    fn elapsed_is_dash_when_line_start_is_none() {
        let now = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(elapsed_string(now, &ctx(now, None)), "-");
    }

    #[test]
    fn elapsed_is_dash_when_line_start_equals_now() {
        let now = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(elapsed_string(now, &ctx(now, Some(now))), "-");
    }

    #[test]
    fn elapsed_formats_the_delta() {
        let start = datetime!(2024-01-01 00:00:00 UTC);
        let now = datetime!(2024-01-01 00:01:30 UTC);
        assert_eq!(elapsed_string(now, &ctx(now, Some(start))), " 1.5m");
    }

    #[test]
    fn date_token_renders_slash_separated() {
        let now = datetime!(2024-03-05 00:00:00 UTC);
        assert_eq!(date_string(now), "2024/03/05");
    }

    #[test]
    fn isodate_token_renders_with_trailing_z() {
        let now = datetime!(2024-03-05 06:07:08 UTC);
        assert_eq!(isodate_string(now, false), "2024-03-05T06:07:08Z");
    }

    #[test]
    fn render_substitutes_tokens_and_appends_flag_block() {
        let start = datetime!(2024-01-01 00:00:00 UTC);
        let now = datetime!(2024-01-01 00:00:00 UTC);
        let rendered = render(
            b"prefix: {isodate} ",
            Flags::empty(),
            &ctx(now, Some(start)),
            None,
        );
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "prefix: 2024-01-01T00:00:00Z "
        );
    }

    #[test]
    fn render_appends_shortfile_and_elapsed_when_flagged() {
        let start = datetime!(2024-01-01 00:00:00 UTC);
        let now = datetime!(2024-01-01 00:01:00 UTC);
        let caller = CallerLocation {
            file: "/a/b/main.rs".to_string(),
            line: 42,
            ok: true,
        };
        let rendered = render(
            b"",
            Flags::LSHORTFILE | Flags::LELAPSED,
            &ctx(now, Some(start)),
            Some(&caller),
        );
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "main.rs:42: ( 1.0m) "
        );
    }
}
