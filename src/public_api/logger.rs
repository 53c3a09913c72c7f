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

use std::io::Write;
use std::panic::Location;
use std::sync::{Arc, RwLock};

use crate::error::LogResult;
use crate::logger_impl::{LoggerCore, LoggerEntry, LoggerId};
use crate::term_caps;

use super::flags::Flags;
use super::registry::{self, SinkId};

/// A handle to one logger. Cheap to clone indirectly (via [`Logger::id`] plus the
/// registry), but the handle itself is usually shared behind an `Arc` or a `static`,
/// since `set_output` needs to rebind which sink the handle targets.
pub struct Logger {
    core: RwLock<LoggerCore>,
}

impl Logger {
    fn from_parts(id: LoggerId, sink: Arc<std::sync::Mutex<crate::logger_impl::SinkState>>) -> Self {
        let core = LoggerCore { id, sink };
        registry::global().register(core.clone());
        Self {
            core: RwLock::new(core),
        }
    }

    pub(crate) fn from_core(core: LoggerCore) -> Self {
        Self {
            core: RwLock::new(core),
        }
    }

    /// Builds a logger writing to `sink_id`, creating that sink (via `make_sink`) the
    /// first time it is used.
    pub fn new(
        prefix: impl Into<Vec<u8>>,
        flags: Flags,
        sink_id: SinkId,
        make_sink: impl FnOnce() -> Box<dyn Write + Send>,
    ) -> Self {
        let sink = registry::global().get_or_create_sink(sink_id, make_sink);
        let id = LoggerId::next();
        {
            let mut state = sink.lock().unwrap();
            state
                .loggers
                .insert(id, LoggerEntry::new(prefix.into(), flags, term_caps::now()));
        }
        Self::from_parts(id, sink)
    }

    pub fn new_stdout(prefix: impl Into<Vec<u8>>, flags: Flags) -> Self {
        let sink = registry::global().stdout_sink();
        let id = LoggerId::next();
        {
            let mut state = sink.lock().unwrap();
            state
                .loggers
                .insert(id, LoggerEntry::new(prefix.into(), flags, term_caps::now()));
        }
        Self::from_parts(id, sink)
    }

    pub fn new_stderr(prefix: impl Into<Vec<u8>>, flags: Flags) -> Self {
        let sink = registry::global().stderr_sink();
        let id = LoggerId::next();
        {
            let mut state = sink.lock().unwrap();
            state
                .loggers
                .insert(id, LoggerEntry::new(prefix.into(), flags, term_caps::now()));
        }
        Self::from_parts(id, sink)
    }

    fn core(&self) -> LoggerCore {
        self.core.read().unwrap().clone()
    }

    fn defaults() -> crate::logger_impl::DefaultToggles {
        registry::global().default_toggles()
    }

    #[track_caller]
    pub fn log(&self, bytes: &[u8]) -> LogResult<()> {
        self.core().emit(bytes, &Self::defaults(), Location::caller())
    }

    #[track_caller]
    pub fn replace(&self, bytes: &[u8]) -> LogResult<()> {
        self.core().replace(bytes, &Self::defaults(), Location::caller())
    }

    #[track_caller]
    pub fn flush(&self) -> LogResult<()> {
        self.core().flush(&Self::defaults(), Location::caller())
    }

    #[track_caller]
    pub fn close(&self) -> LogResult<()> {
        self.core().close(&Self::defaults(), Location::caller())
    }

    #[track_caller]
    pub fn write_bytes(&self, bytes: &[u8]) -> (usize, LogResult<()>) {
        self.core().write(bytes, &Self::defaults(), Location::caller())
    }

    #[track_caller]
    pub fn bail(&self, msg: &str) -> ! {
        self.core().bail(&Self::defaults(), msg, Location::caller())
    }

    #[track_caller]
    pub fn fatal(&self, bytes: &[u8]) -> ! {
        self.core().fatal(&Self::defaults(), bytes, Location::caller())
    }

    #[track_caller]
    pub fn panic(&self, bytes: &[u8]) -> ! {
        self.core().panic(&Self::defaults(), bytes, Location::caller())
    }

    fn with_entry_mut(&self, f: impl FnOnce(&mut LoggerEntry)) {
        let core = self.core();
        let mut guard = core.sink.lock().unwrap();
        if let Some(entry) = guard.loggers.get_mut(&core.id) {
            f(entry);
        }
    }

    pub fn set_prefix(&self, prefix: impl Into<Vec<u8>>) {
        let prefix = prefix.into();
        self.with_entry_mut(|entry| {
            entry.prefix_formatted = match &entry.color_regexp {
                Some(regexp) => {
                    crate::color::expand_template_with(&String::from_utf8_lossy(&prefix), regexp)
                }
                None => crate::color::expand_template(&String::from_utf8_lossy(&prefix)),
            };
            entry.prefix = prefix;
        });
    }

    pub fn set_flags(&self, flags: Flags) {
        self.with_entry_mut(|entry| entry.flags = flags);
    }

    /// Moves this logger to a different sink, flushing it on the old sink first and
    /// explicitly detaching it from the old sink's `temp_loggers` list before the move.
    #[track_caller]
    pub fn set_output(&self, sink_id: SinkId, make_sink: impl FnOnce() -> Box<dyn Write + Send>) {
        let defaults = Self::defaults();
        let mut guard = self.core.write().unwrap();
        let old_sink = Arc::clone(&guard.sink);
        let _ = guard.flush(&defaults, Location::caller());

        let entry = {
            let mut old = old_sink.lock().unwrap();
            old.detach(guard.id);
            old.loggers.remove(&guard.id)
        };
        let Some(entry) = entry else { return };

        let new_sink = registry::global().get_or_create_sink(sink_id, make_sink);
        {
            let mut new = new_sink.lock().unwrap();
            new.loggers.insert(guard.id, entry);
        }
        guard.sink = new_sink;
    }

    pub fn show_partial_lines(&self) {
        self.with_entry_mut(|entry| entry.partial_lines_enabled = Some(true));
    }

    pub fn hide_partial_lines(&self) {
        self.with_entry_mut(|entry| entry.partial_lines_enabled = Some(false));
    }

    pub fn enable_color(&self) {
        self.with_entry_mut(|entry| entry.color_enabled = Some(true));
    }

    pub fn disable_color(&self) {
        self.with_entry_mut(|entry| entry.color_enabled = Some(false));
    }

    pub fn enable_color_template(&self) {
        self.with_entry_mut(|entry| entry.color_template_enabled = Some(true));
    }

    pub fn disable_color_template(&self) {
        self.with_entry_mut(|entry| entry.color_template_enabled = Some(false));
    }

    pub fn enable_auto_newlines(&self) {
        self.with_entry_mut(|entry| entry.auto_append_newline = Some(true));
    }

    pub fn disable_auto_newlines(&self) {
        self.with_entry_mut(|entry| entry.auto_append_newline = Some(false));
    }

    /// Overrides the default `@(NAMES[:TEXT])` matcher for this logger's prefix and
    /// message-body template expansion.
    pub fn set_color_template_regexp(&self, regexp: regex::Regex) {
        self.with_entry_mut(|entry| {
            entry.prefix_formatted =
                crate::color::expand_template_with(&String::from_utf8_lossy(&entry.prefix), &regexp);
            entry.color_regexp = Some(regexp);
        });
    }

    /// Sets the sink's terminal width, flushing every logger currently attached to it
    /// first (a width change invalidates whatever partial-line layout was in progress).
    pub fn set_terminal_width(&self, width: usize) {
        let core = self.core();
        let defaults = Self::defaults();
        self.flush_all_attached(&core, &defaults);
        core.sink.lock().unwrap().set_term_width(width);
    }

    pub fn enable_multiline(&self) {
        let core = self.core();
        let defaults = Self::defaults();
        self.flush_all_attached(&core, &defaults);
        core.sink.lock().unwrap().set_multiline(true);
    }

    pub fn enable_single_line(&self) {
        let core = self.core();
        let defaults = Self::defaults();
        self.flush_all_attached(&core, &defaults);
        core.sink.lock().unwrap().set_multiline(false);
    }

    #[track_caller]
    fn flush_all_attached(&self, core: &LoggerCore, defaults: &crate::logger_impl::DefaultToggles) {
        let attached: Vec<LoggerId> = core.sink.lock().unwrap().temp_loggers().to_vec();
        let loc = Location::caller();
        for id in attached {
            let other = LoggerCore {
                id,
                sink: Arc::clone(&core.sink),
            };
            let _ = other.flush(defaults, loc);
        }
    }

    pub fn id(&self) -> LoggerId {
        self.core().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSink;

    #[test]
    fn new_logger_writes_through_a_custom_sink() {
        let sink = MockSink::new();
        let sink_for_closure = sink.clone();
        let logger = Logger::new(
            b"".to_vec(),
            Flags::empty(),
            SinkId::Custom("logger-test-a"),
            move || Box::new(sink_for_closure),
        );
        logger.log(b"hi\n").unwrap();
        assert!(sink.contents().ends_with(b"hi\n"));
    }

    #[test]
    fn set_prefix_changes_rendered_output() {
        let sink = MockSink::new();
        let sink_for_closure = sink.clone();
        let logger = Logger::new(
            b"".to_vec(),
            Flags::empty(),
            SinkId::Custom("logger-test-b"),
            move || Box::new(sink_for_closure),
        );
        logger.set_prefix(b"PFX: ".to_vec());
        logger.log(b"hi\n").unwrap();
        assert!(sink.contents().starts_with(b"PFX: hi"));
    }

    #[test]
    fn custom_template_regexp_overrides_the_default_matcher() {
        let sink = MockSink::new();
        let sink_for_closure = sink.clone();
        let logger = Logger::new(
            b"".to_vec(),
            Flags::empty(),
            SinkId::Custom("logger-test-d"),
            move || Box::new(sink_for_closure),
        );
        logger.enable_color_template();
        // `%(red:x)` instead of the default `@(red:x)` syntax.
        logger.set_color_template_regexp(regex::Regex::new(r"%\(([\w,]+)(:([^)]*))?\)").unwrap());
        logger.log(b"%(red:boom)\n").unwrap();
        assert!(sink.contents().starts_with(b"\x1b[31mboom"));

        sink.clear();
        logger.log(b"@(red:boom)\n").unwrap();
        assert!(sink.contents().starts_with(b"@(red:boom)"));
    }

    #[test]
    fn closed_logger_rejects_further_writes() {
        let sink = MockSink::new();
        let sink_for_closure = sink.clone();
        let logger = Logger::new(
            b"".to_vec(),
            Flags::empty(),
            SinkId::Custom("logger-test-c"),
            move || Box::new(sink_for_closure),
        );
        logger.close().unwrap();
        assert!(logger.log(b"x\n").is_err());
    }
}
