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

use bitflags::bitflags;

bitflags! {
    /// Per-logger prefix rendering toggles. Powers of two in declared order, mirroring
    /// the Go `log` package's `Ldate, Ltime, ...` flag set this crate's prefix
    /// formatting is modeled on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        const LDATE         = 1 << 0;
        const LTIME         = 1 << 1;
        const LMICROSECONDS = 1 << 2;
        const LLONGFILE     = 1 << 3;
        const LSHORTFILE    = 1 << 4;
        const LUTC          = 1 << 5;
        const LELAPSED      = 1 << 6;
        const LISODATE      = 1 << 7;
    }
}

/// `Ldate | Ltime`, the conventional starting point for a logger's flags.
pub const L_STD_FLAGS: Flags = Flags::LDATE.union(Flags::LTIME);

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_flags_is_date_and_time() {
        assert!(L_STD_FLAGS.contains(Flags::LDATE));
        assert!(L_STD_FLAGS.contains(Flags::LTIME));
        assert!(!L_STD_FLAGS.contains(Flags::LUTC));
    }

    #[test]
    fn shortfile_and_longfile_can_both_be_set() {
        let flags = Flags::LSHORTFILE | Flags::LLONGFILE;
        assert!(flags.contains(Flags::LSHORTFILE));
        assert!(flags.contains(Flags::LLONGFILE));
    }
}
