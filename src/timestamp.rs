//! Timestamp unit conversion.
//!
//! Conversions go through `f64`. Tick counts above 2^53 lose precision; the
//! packet timestamps seen in practice are far below that, and the values are
//! only used for diagnostics.

use ffmpeg_next as ffmpeg;

/// Convert a tick count in `time_base` units to microseconds.
///
/// Computes `round(time_base * ticks * 1_000_000)`. Negative results
/// saturate to 0, as does a time base with a zero denominator.
pub fn pts_to_us(time_base: ffmpeg::Rational, ticks: i64) -> u64 {
    let seconds_per_tick = rational_to_f64(time_base);
    (seconds_per_tick * ticks as f64 * 1_000_000.0).round() as u64
}

/// Format a timestamp as seconds with six decimals, or `NOPTS`.
pub fn ts_to_timestr(ts: Option<i64>, time_base: ffmpeg::Rational) -> String {
    match ts {
        Some(ts) => format!("{:.6}", rational_to_f64(time_base) * ts as f64),
        None => "NOPTS".to_string(),
    }
}

/// Convert a container-level duration (`AV_TIME_BASE` units) to milliseconds.
///
/// Unknown durations (`AV_NOPTS_VALUE`) map to 0.
pub fn duration_us_to_ms(duration_us: Option<i64>) -> i64 {
    duration_us.map(|us| us / 1000).unwrap_or(0)
}

fn rational_to_f64(r: ffmpeg::Rational) -> f64 {
    if r.denominator() == 0 {
        0.0
    } else {
        r.numerator() as f64 / r.denominator() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pts_to_us() {
        let tb = ffmpeg::Rational::new(1, 90000);
        assert_eq!(pts_to_us(tb, 90000), 1_000_000);
        assert_eq!(pts_to_us(tb, 45000), 500_000);
        assert_eq!(pts_to_us(tb, 0), 0);
        assert_eq!(pts_to_us(ffmpeg::Rational::new(1, 1000), 1234), 1_234_000);
    }

    #[test]
    fn test_pts_to_us_rounds() {
        // 1/3 s = 333333.33.. us, 2/3 s = 666666.66.. us
        let tb = ffmpeg::Rational::new(1, 3);
        assert_eq!(pts_to_us(tb, 1), 333_333);
        assert_eq!(pts_to_us(tb, 2), 666_667);
    }

    #[test]
    fn test_pts_to_us_monotonic() {
        let tb = ffmpeg::Rational::new(1001, 30000);
        let mut last = 0;
        for ticks in 0..5000 {
            let us = pts_to_us(tb, ticks);
            assert!(us >= last);
            last = us;
        }
    }

    #[test]
    fn test_pts_to_us_degenerate() {
        assert_eq!(pts_to_us(ffmpeg::Rational::new(1, 0), 100), 0);
        assert_eq!(pts_to_us(ffmpeg::Rational::new(1, 1000), -5), 0);
    }

    #[test]
    fn test_ts_to_timestr() {
        let tb = ffmpeg::Rational::new(1, 1000);
        assert_eq!(ts_to_timestr(Some(1500), tb), "1.500000");
        assert_eq!(ts_to_timestr(None, tb), "NOPTS");
    }

    #[test]
    fn test_duration_us_to_ms() {
        assert_eq!(duration_us_to_ms(Some(33_366_000)), 33_366);
        assert_eq!(duration_us_to_ms(None), 0);
    }
}
