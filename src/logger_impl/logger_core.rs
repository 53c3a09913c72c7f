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

use std::panic::Location;
use std::sync::{Arc, Mutex};

use crate::color::{expand_template, strip_ansi};
use crate::error::{LogError, LogResult};
use crate::format::{render_prefix, RenderContext};
use crate::public_api::flags::Flags;
use crate::term_caps::{self, CallerLocation};

use super::ids::LoggerId;
use super::sink_state::{LoggerEntry, SinkState};
use super::toggles::DefaultToggles;

/// Owns a logger's identity and the sink it currently targets. Every mutable field
/// lives in the sink's [`SinkState::loggers`] map, so the sink's mutex is the only lock
/// an operation here ever needs (invariant I5).
#[derive(Clone)]
pub struct LoggerCore {
    pub id: LoggerId,
    pub sink: Arc<Mutex<SinkState>>,
}

impl LoggerCore {
    fn effective(&self, entry: &LoggerEntry, defaults: &DefaultToggles) -> EffectiveToggles {
        EffectiveToggles {
            partial_lines: entry.partial_lines_enabled.unwrap_or(defaults.partial_lines_enabled),
            color: entry.color_enabled.unwrap_or(defaults.color_enabled),
            color_template: entry
                .color_template_enabled
                .unwrap_or(defaults.color_template_enabled),
            auto_newline: entry.auto_append_newline.unwrap_or(defaults.auto_append_newline),
        }
    }

    /// The full emit pipeline (§4.G): expand tabs, auto-newline, inject at the virtual
    /// cursor, drain completed lines to the scroll region, and repaint every attached
    /// partial line.
    pub fn emit(
        &self,
        bytes: &[u8],
        defaults: &DefaultToggles,
        caller_loc: &'static Location<'static>,
    ) -> LogResult<()> {
        let mut guard = self.sink.lock().unwrap();
        self.emit_locked(&mut guard, bytes, defaults, caller_loc)
    }

    fn emit_locked(
        &self,
        sink: &mut SinkState,
        bytes: &[u8],
        defaults: &DefaultToggles,
        caller_loc: &'static Location<'static>,
    ) -> LogResult<()> {
        let now_utc = term_caps::now();

        let flags = {
            let entry = sink
                .loggers
                .get(&self.id)
                .ok_or(LogError::WriteToClosedLogger)?;
            if entry.is_closed {
                return Err(LogError::WriteToClosedLogger);
            }
            entry.flags
        };
        let now = term_caps::to_zone(now_utc, flags.contains(Flags::LUTC));

        let eff = {
            let entry = sink.loggers.get(&self.id).unwrap();
            self.effective(entry, defaults)
        };

        let mut input = String::from_utf8_lossy(bytes).replace('\t', "        ");
        if eff.auto_newline && !input.ends_with('\n') {
            input.push('\n');
        }
        let mut input_bytes = input.into_bytes();
        if eff.color_template {
            let entry = sink.loggers.get(&self.id).unwrap();
            input_bytes = match &entry.color_regexp {
                Some(regexp) => crate::color::expand_template_with(
                    &String::from_utf8_lossy(&input_bytes),
                    regexp,
                ),
                None => expand_template(&String::from_utf8_lossy(&input_bytes)),
            };
        }

        {
            let entry = sink.loggers.get_mut(&self.id).unwrap();
            entry.now = now;
            entry.buf.inject(&input_bytes);
        }

        let mut any_full_line = false;
        loop {
            let entry = sink.loggers.get_mut(&self.id).unwrap();
            let buf = entry.buf.as_bytes();
            let nl_idx = match buf.iter().position(|&b| b == b'\n') {
                Some(i) => i,
                None => break,
            };
            let line = &buf[..nl_idx];
            if let Some(cr_idx) = line.iter().position(|&b| b == b'\r') {
                if cr_idx + 1 != nl_idx {
                    let after = line[cr_idx + 1..].to_vec();
                    entry.buf.splice_prefix(nl_idx, &after);
                    continue;
                }
            }

            let line_content = entry.buf.as_bytes()[..nl_idx].to_vec();
            let remaining = entry.buf.as_bytes()[nl_idx + 1..].to_vec();
            entry.buf.replace(&remaining);
            // `replace` moves the cursor to the end; the residual bytes (if any) are
            // meant to be re-scanned as-is, with the cursor left past them (matching
            // "inject" having already placed them there before the newline arrived).

            if entry.flags.intersects(Flags::LSHORTFILE | Flags::LLONGFILE)
                && entry.caller_file.is_none()
            {
                let resolved = term_caps::resolve_caller(0, caller_loc);
                if resolved.ok {
                    entry.caller_file = Some(resolved.file);
                    entry.caller_line = resolved.line;
                } else {
                    return Err(LogError::CallerResolutionFailure);
                }
            }

            sink.detach(self.id);
            let entry = sink.loggers.get_mut(&self.id).unwrap();
            entry.temp_line_active = false;

            let formatted = Self::render_full_line(entry, &line_content, eff.color);
            sink.emit_full_line(&formatted);
            any_full_line = true;
        }

        if any_full_line {
            let entry = sink.loggers.get_mut(&self.id).unwrap();
            entry.caller_file = None;
        }

        let residual_width = {
            let entry = sink.loggers.get(&self.id).unwrap();
            crate::color::display_width(entry.buf.as_bytes())
        };
        let already_attached = sink.temp_loggers().contains(&self.id);
        if !already_attached && eff.partial_lines && residual_width > 0 {
            sink.attach(self.id);
            let entry = sink.loggers.get_mut(&self.id).unwrap();
            entry.line_start_time = Some(now);
            entry.temp_line_active = true;
        }

        let pieces: Vec<Vec<u8>> = sink
            .temp_loggers()
            .to_vec()
            .iter()
            .filter_map(|id| sink.loggers.get(id).map(|entry| Self::render_partial(entry)))
            .collect();
        sink.update_partials(pieces);

        Ok(())
    }

    fn caller_location(entry: &LoggerEntry) -> Option<CallerLocation> {
        entry.caller_file.as_ref().map(|file| CallerLocation {
            file: file.clone(),
            line: entry.caller_line,
            ok: true,
        })
    }

    fn render_full_line(entry: &LoggerEntry, line_content: &[u8], color_enabled: bool) -> Vec<u8> {
        let ctx = RenderContext {
            now: entry.now,
            utc: entry.flags.contains(Flags::LUTC),
            line_start: entry.line_start_time,
        };
        let caller = Self::caller_location(entry);
        let caller = if entry.flags.contains(Flags::LSHORTFILE) {
            caller.map(|mut c| {
                c.file = term_caps::shorten_file(&c.file).to_string();
                c
            })
        } else {
            caller
        };
        let mut out = render_prefix(&entry.prefix_formatted, entry.flags, &ctx, caller.as_ref());
        out.extend_from_slice(line_content);
        if !color_enabled {
            out = strip_ansi(&out);
        }
        out
    }

    fn render_partial(entry: &LoggerEntry) -> Vec<u8> {
        let ctx = RenderContext {
            now: entry.now,
            utc: entry.flags.contains(Flags::LUTC),
            line_start: entry.line_start_time,
        };
        let caller = Self::caller_location(entry);
        let mut out = render_prefix(&entry.prefix_formatted, entry.flags, &ctx, caller.as_ref());
        out.extend_from_slice(entry.buf.as_bytes());
        out
    }

    pub fn replace(
        &self,
        bytes: &[u8],
        defaults: &DefaultToggles,
        caller_loc: &'static Location<'static>,
    ) -> LogResult<()> {
        let mut guard = self.sink.lock().unwrap();
        {
            let entry = guard
                .loggers
                .get_mut(&self.id)
                .ok_or(LogError::WriteToClosedLogger)?;
            entry.buf.clear();
        }
        self.emit_locked(&mut guard, bytes, defaults, caller_loc)
    }

    pub fn flush(&self, defaults: &DefaultToggles, caller_loc: &'static Location<'static>) -> LogResult<()> {
        let mut guard = self.sink.lock().unwrap();
        let nonempty = guard
            .loggers
            .get(&self.id)
            .map(|e| !e.buf.is_empty())
            .unwrap_or(false);
        if nonempty {
            self.emit_locked(&mut guard, b"\n", defaults, caller_loc)
        } else {
            Ok(())
        }
    }

    pub fn close(&self, defaults: &DefaultToggles, caller_loc: &'static Location<'static>) -> LogResult<()> {
        self.flush(defaults, caller_loc)?;
        let mut guard = self.sink.lock().unwrap();
        if let Some(entry) = guard.loggers.get_mut(&self.id) {
            entry.is_closed = true;
        }
        Ok(())
    }

    /// Satisfies the sink `Write` contract: the byte count is always reported as
    /// written, matching the reference implementation's `write(bytes) -> (n, err)`.
    pub fn write(
        &self,
        bytes: &[u8],
        defaults: &DefaultToggles,
        caller_loc: &'static Location<'static>,
    ) -> (usize, LogResult<()>) {
        (bytes.len(), self.emit(bytes, defaults, caller_loc))
    }

    pub fn bail(&self, defaults: &DefaultToggles, msg: &str, caller_loc: &'static Location<'static>) -> ! {
        let _ = self.flush(defaults, caller_loc);
        let backtrace = std::backtrace::Backtrace::force_capture();
        let text = backtrace.to_string();
        // The first two frames belong to this function and `Backtrace::force_capture`
        // itself; neither is useful to a reader debugging the bail site.
        for line in text.lines().skip(2) {
            let _ = self.emit(line.as_bytes(), defaults, caller_loc);
        }
        let _ = self.emit(
            format!("Bailed due to error: {msg}").as_bytes(),
            defaults,
            caller_loc,
        );
        std::process::exit(1);
    }

    pub fn fatal(&self, defaults: &DefaultToggles, bytes: &[u8], caller_loc: &'static Location<'static>) -> ! {
        let _ = self.emit(bytes, defaults, caller_loc);
        std::process::exit(1);
    }

    pub fn panic(&self, defaults: &DefaultToggles, bytes: &[u8], caller_loc: &'static Location<'static>) -> ! {
        let _ = self.emit(bytes, defaults, caller_loc);
        let _ = self.flush(defaults, caller_loc);
        panic!("{}", String::from_utf8_lossy(bytes));
    }
}

struct EffectiveToggles {
    partial_lines: bool,
    color: bool,
    color_template: bool,
    auto_newline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public_api::flags::L_STD_FLAGS;
    use crate::test_support::MockSink;

    fn make_core(prefix: &[u8]) -> (LoggerCore, MockSink) {
        let sink_io = MockSink::new();
        let mut state = SinkState::new(Box::new(sink_io.clone()));
        let id = LoggerId::next();
        state
            .loggers
            .insert(id, LoggerEntry::new(prefix.to_vec(), Flags::empty(), term_caps::now()));
        (
            LoggerCore {
                id,
                sink: Arc::new(Mutex::new(state)),
            },
            sink_io,
        )
    }

    #[test]
    fn emit_complete_line_writes_prefix_and_message() {
        let (core, sink) = make_core(b"");
        let defaults = DefaultToggles::default();
        core.emit(b"hello\n", &defaults, Location::caller()).unwrap();
        assert!(sink.contents().ends_with(b"hello\n"));
    }

    #[test]
    fn emit_on_closed_logger_errors() {
        let (core, _sink) = make_core(b"");
        let defaults = DefaultToggles::default();
        core.close(&defaults, Location::caller()).unwrap();
        let result = core.emit(b"more\n", &defaults, Location::caller());
        assert!(matches!(result, Err(LogError::WriteToClosedLogger)));
    }

    #[test]
    fn partial_line_attaches_as_temp_logger() {
        let (core, _sink) = make_core(b"");
        let defaults = DefaultToggles::default();
        core.emit(b"working", &defaults, Location::caller()).unwrap();
        let guard = core.sink.lock().unwrap();
        assert!(guard.temp_loggers().contains(&core.id));
    }

    #[test]
    fn completing_a_partial_line_detaches_it() {
        let (core, _sink) = make_core(b"");
        let defaults = DefaultToggles::default();
        core.emit(b"working", &defaults, Location::caller()).unwrap();
        core.emit(b" done\n", &defaults, Location::caller()).unwrap();
        let guard = core.sink.lock().unwrap();
        assert!(!guard.temp_loggers().contains(&core.id));
    }

    #[test]
    fn std_flags_render_date_and_time_in_output() {
        let (core, sink) = make_core(b"");
        {
            let mut guard = core.sink.lock().unwrap();
            guard.loggers.get_mut(&core.id).unwrap().flags = L_STD_FLAGS;
        }
        let defaults = DefaultToggles::default();
        core.emit(b"hi\n", &defaults, Location::caller()).unwrap();
        let out = String::from_utf8(sink.contents()).unwrap();
        assert!(out.contains('/'));
        assert!(out.contains(':'));
    }
}
