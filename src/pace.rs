// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Time and pace string codec
//!
//! Parses and formats human-readable durations ("mm:ss" / "h:mm:ss") and
//! per-lap paces to and from a numeric seconds representation. Pure string
//! handling with no dependencies on the rest of the engine.
//!
//! All engine paces are seconds per 400 m track lap.

use crate::error::{EngineError, Result};

/// Meters per track lap; the engine's pace unit is seconds per lap.
pub const LAP_METERS: f64 = 400.0;

/// Parse a "mm:ss" or "h:mm:ss" duration string into whole seconds.
///
/// Fails on empty input, non-numeric segments, out-of-range positional
/// segments (minutes/seconds must be < 60 when a higher unit is present),
/// or totals past what fits in `u32` seconds.
pub fn parse_time(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::parse(input, "empty input"));
    }

    let segments: Vec<&str> = trimmed.split(':').collect();
    if segments.len() < 2 || segments.len() > 3 {
        return Err(EngineError::parse(input, "expected mm:ss or h:mm:ss"));
    }

    let mut values = Vec::with_capacity(segments.len());
    for segment in &segments {
        let value: u32 = segment
            .parse()
            .map_err(|_| EngineError::parse(input, format!("non-numeric segment '{segment}'")))?;
        values.push(value);
    }

    // Every segment below the leading one is positional and must stay < 60.
    for value in &values[1..] {
        if *value >= 60 {
            return Err(EngineError::parse(input, "minutes/seconds must be below 60"));
        }
    }

    let mut total: u32 = 0;
    for value in &values {
        total = total
            .checked_mul(60)
            .and_then(|scaled| scaled.checked_add(*value))
            .ok_or_else(|| EngineError::parse(input, "duration too large"))?;
    }
    Ok(total)
}

/// Format whole seconds as "m:ss", switching to "h:mm:ss" at one hour.
///
/// Round-trips with [`parse_time`] to the canonical zero-padded form.
pub fn format_time(seconds: u32) -> String {
    if seconds >= 3600 {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

/// Format a per-lap pace in the fixed "m:ss/400m" form.
pub fn format_pace(seconds_per_lap: u32) -> String {
    format!("{}/400m", format_time(seconds_per_lap))
}

/// Convert a per-lap pace to the "/km" display form runners expect.
pub fn format_km_pace(seconds_per_lap: f64) -> String {
    let km_seconds = (seconds_per_lap * 1000.0 / LAP_METERS).round() as u32;
    format!("{}/km", format_time(km_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_minutes_seconds() {
        assert_eq!(parse_time("12:34").unwrap(), 754);
        assert_eq!(parse_time("0:05").unwrap(), 5);
        assert_eq!(parse_time("59:59").unwrap(), 3599);
    }

    #[test]
    fn test_parse_time_hours() {
        assert_eq!(parse_time("1:02:03").unwrap(), 3723);
        assert_eq!(parse_time("2:00:00").unwrap(), 7200);
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(matches!(parse_time("abc"), Err(EngineError::Parse { .. })));
        assert!(matches!(parse_time(""), Err(EngineError::Parse { .. })));
        assert!(matches!(parse_time("12"), Err(EngineError::Parse { .. })));
        assert!(matches!(parse_time("1:2:3:4"), Err(EngineError::Parse { .. })));
        assert!(matches!(parse_time("12:xx"), Err(EngineError::Parse { .. })));
    }

    #[test]
    fn test_parse_time_rejects_out_of_range_segments() {
        assert!(matches!(parse_time("12:60"), Err(EngineError::Parse { .. })));
        assert!(matches!(parse_time("1:75:00"), Err(EngineError::Parse { .. })));
    }

    #[test]
    fn test_parse_time_rejects_oversized_durations() {
        // Leading segments near u32::MAX minutes must error, not overflow.
        assert!(matches!(
            parse_time("100000000:00"),
            Err(EngineError::Parse { .. })
        ));
        assert!(matches!(
            parse_time("4294967295:59:59"),
            Err(EngineError::Parse { .. })
        ));
        // The largest representable duration still parses.
        assert_eq!(parse_time("71582788:15").unwrap(), u32::MAX);
    }

    #[test]
    fn test_format_time_picks_form_by_magnitude() {
        assert_eq!(format_time(754), "12:34");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(3723), "1:02:03");
        assert_eq!(format_time(3600), "1:00:00");
    }

    #[test]
    fn test_round_trip_is_canonical() {
        // Leading zeros normalize away; everything else round-trips exactly.
        for input in ["12:34", "1:02:03", "0:59", "59:59"] {
            let seconds = parse_time(input).unwrap();
            assert_eq!(format_time(seconds), input);
        }
        assert_eq!(format_time(parse_time("02:05").unwrap()), "2:05");
        assert_eq!(format_time(parse_time("01:02:03").unwrap()), "1:02:03");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(96), "1:36/400m");
        assert_eq!(format_pace(75), "1:15/400m");
    }

    #[test]
    fn test_format_km_pace() {
        // 96 s/400m is 240 s/km
        assert_eq!(format_km_pace(96.0), "4:00/km");
    }
}
