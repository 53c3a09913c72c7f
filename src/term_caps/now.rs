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

use time::OffsetDateTime;

/// The current wall-clock instant, as the single source of truth every timestamped
/// field in a rendered line (`{date}`, `{time}`, `{isodate}`, `{elapsed}`'s `now` term)
/// is derived from.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Converts `instant` to local time if `utc` is false; returns it unchanged if `utc` is
/// true. `LUTC` unset means the process's local offset applies.
pub fn to_zone(instant: OffsetDateTime, utc: bool) -> OffsetDateTime {
    if utc {
        return instant;
    }
    // `time`'s local-offset lookup is marked unsound on some platforms when other
    // threads may be mutating the environment; failing that, UTC is the safe fallback.
    let local_offset =
        time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    instant.to_offset(local_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_true_is_a_no_op() {
        let now = now();
        assert_eq!(to_zone(now, true), now);
    }
}
