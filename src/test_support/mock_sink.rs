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

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// A cloneable, `Arc<Mutex<Vec<u8>>>`-backed [`Write`] fixture for exercising sinks in
/// tests without a real terminal. Every clone shares the same backing buffer, so a test
/// can hand one handle to a [`crate::logger_impl::sink_state::SinkState`] and inspect
/// the written bytes through another.
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.buf.lock().unwrap().clear();
    }
}

impl Write for MockSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_appends_and_clone_shares_buffer() {
        let mut sink = MockSink::new();
        let reader = sink.clone();
        sink.write_all(b"hello").unwrap();
        assert_eq!(reader.contents(), b"hello".to_vec());
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut sink = MockSink::new();
        sink.write_all(b"hello").unwrap();
        sink.clear();
        assert!(sink.contents().is_empty());
    }
}
