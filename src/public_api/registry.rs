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
use std::io::{self, Write};
use std::sync::{Arc, Mutex, RwLock};

use once_cell::sync::Lazy;

use crate::logger_impl::{DefaultToggles, LoggerCore, LoggerEntry, LoggerId, SinkState};
use crate::term_caps;

use super::flags::Flags;
use super::logger::Logger;

/// Identifies a sink for the purposes of the process-wide `sink -> SinkState` map.
/// Rust gives `dyn Write` trait objects no structural identity to key a map on (unlike
/// the reference implementation, which keys by the sink value itself), so sinks are
/// named explicitly instead; [`LogSystem::get_or_create_sink`] only invokes the
/// supplied constructor the first time a given [`SinkId`] is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkId {
    Stdout,
    Stderr,
    Custom(&'static str),
}

struct Stdout;
impl Write for Stdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

struct Stderr;
impl Write for Stderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// The process-wide registry: a `sink -> SinkState` map guarded by a reader/writer
/// lock (read-locked for lookup, write-locked only to register a new sink), plus the
/// list of every constructed logger, used by [`shutdown`] to flush and close all of
/// them.
pub struct LogSystem {
    sinks: RwLock<HashMap<SinkId, Arc<Mutex<SinkState>>>>,
    loggers: Mutex<Vec<LoggerCore>>,
    default_logger_id: LoggerId,
}

impl LogSystem {
    fn new() -> Self {
        let stderr_sink = Arc::new(Mutex::new(SinkState::new(Box::new(Stderr))));
        let mut sinks = HashMap::new();
        sinks.insert(SinkId::Stderr, Arc::clone(&stderr_sink));

        let default_logger_id = LoggerId::next();
        {
            let mut state = stderr_sink.lock().unwrap();
            let mut entry = LoggerEntry::new(
                b"@(dim:{isodate}) ".to_vec(),
                Flags::empty(),
                term_caps::now(),
            );
            entry.partial_lines_enabled = Some(true);
            entry.color_enabled = Some(true);
            entry.color_template_enabled = Some(true);
            entry.auto_append_newline = Some(false);
            state.loggers.insert(default_logger_id, entry);
        }

        Self {
            sinks: RwLock::new(sinks),
            loggers: Mutex::new(Vec::new()),
            default_logger_id,
        }
    }

    /// Returns (creating lazily if necessary) the [`SinkState`] for `id`, invoking
    /// `make_sink` only the first time `id` is registered.
    pub fn get_or_create_sink(
        &self,
        id: SinkId,
        make_sink: impl FnOnce() -> Box<dyn Write + Send>,
    ) -> Arc<Mutex<SinkState>> {
        if let Some(existing) = self.sinks.read().unwrap().get(&id) {
            return Arc::clone(existing);
        }
        let mut sinks = self.sinks.write().unwrap();
        Arc::clone(
            sinks
                .entry(id)
                .or_insert_with(|| Arc::new(Mutex::new(SinkState::new(make_sink())))),
        )
    }

    pub fn stdout_sink(&self) -> Arc<Mutex<SinkState>> {
        self.get_or_create_sink(SinkId::Stdout, || Box::new(Stdout))
    }

    pub fn stderr_sink(&self) -> Arc<Mutex<SinkState>> {
        self.get_or_create_sink(SinkId::Stderr, || Box::new(Stderr))
    }

    pub fn register(&self, core: LoggerCore) {
        self.loggers.lock().unwrap().push(core);
    }

    /// The tri-state defaults every logger with an unset toggle inherits, sourced live
    /// from the `DefaultLogger`'s own (always-set) toggles.
    pub fn default_toggles(&self) -> DefaultToggles {
        let sink = self.stderr_sink();
        let guard = sink.lock().unwrap();
        match guard.loggers.get(&self.default_logger_id) {
            Some(entry) => DefaultToggles {
                partial_lines_enabled: entry.partial_lines_enabled.unwrap_or(true),
                color_enabled: entry.color_enabled.unwrap_or(true),
                color_template_enabled: entry.color_template_enabled.unwrap_or(true),
                auto_append_newline: entry.auto_append_newline.unwrap_or(false),
            },
            None => DefaultToggles::default(),
        }
    }

    pub fn default_logger_core(&self) -> LoggerCore {
        LoggerCore {
            id: self.default_logger_id,
            sink: self.stderr_sink(),
        }
    }

    /// Flushes and closes every constructed logger, then terminates the process with
    /// status 1. Locks are held permanently, matching the spec's "locks are held
    /// permanently" shutdown contract: this function never returns.
    pub fn shutdown(&self) -> ! {
        let loggers = self.loggers.lock().unwrap();
        let defaults = self.default_toggles();
        for core in loggers.iter() {
            let _ = core.close(&defaults, std::panic::Location::caller());
        }
        std::process::exit(1);
    }
}

static LOG_SYSTEM: Lazy<LogSystem> = Lazy::new(LogSystem::new);

pub fn global() -> &'static LogSystem {
    &LOG_SYSTEM
}

/// A process-wide [`Logger`] writing to standard error, used as the fallback provider
/// for every other logger's unset tri-state toggles.
pub static DEFAULT_LOGGER: Lazy<Logger> =
    Lazy::new(|| Logger::from_core(global().default_logger_core()));

/// Flushes and closes every constructed logger, then exits the process with status 1.
pub fn shutdown() -> ! {
    global().shutdown()
}

pub fn stdout_sink_id() -> SinkId {
    SinkId::Stdout
}

pub fn stderr_sink_id() -> SinkId {
    SinkId::Stderr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toggles_match_default_logger_construction() {
        let toggles = global().default_toggles();
        assert!(toggles.partial_lines_enabled);
        assert!(toggles.color_enabled);
        assert!(toggles.color_template_enabled);
        assert!(!toggles.auto_append_newline);
    }

    #[test]
    fn stdout_and_stderr_sinks_are_distinct() {
        let out = global().stdout_sink();
        let err = global().stderr_sink();
        assert!(!Arc::ptr_eq(&out, &err));
    }

    #[test]
    fn repeated_lookup_of_the_same_sink_id_returns_the_same_state() {
        let id = SinkId::Custom("test-sink-a");
        let first = global().get_or_create_sink(id, || Box::new(Vec::new()));
        let second = global().get_or_create_sink(id, || Box::new(Vec::new()));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
