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

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier for one constructed logger. Stands in for the reference
/// implementation's use of the logger's own address as a map key and `temp_loggers`
/// list element: a `Logger` handle carries its `LoggerId` and the `Arc<Mutex<SinkState>>`
/// it currently targets, and every mutable field lives in the `SinkState`'s
/// `LoggerId`-keyed map rather than on the handle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoggerId(u64);

impl LoggerId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_ids_are_distinct() {
        let a = LoggerId::next();
        let b = LoggerId::next();
        assert_ne!(a, b);
    }
}
