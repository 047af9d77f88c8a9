//! Video stream metadata extraction

use crate::types::{Rational, StreamDescriptor};

use super::MediaInfo;

/// Fill the video fields of `info` from the selected video stream.
pub fn extract_video_info(stream: &StreamDescriptor, info: &mut MediaInfo) {
    let codec = &stream.codec;
    info.has_video = true;
    info.video_codec = codec.codec_id;
    info.video_width = codec.width;
    info.video_height = codec.height;
    info.video_frame_rate = rounded_frame_rate(stream.frame_rate);
    info.video_rotation = stream.tag_with_prefix("rotate").map(parse_leading_int).unwrap_or(0);
}

/// Frame rate rounded to the nearest integer; 29.97 becomes 30.
pub fn rounded_frame_rate(rate: Rational) -> i32 {
    if rate.denominator() == 0 {
        return 0;
    }
    (rate.numerator() as f64 / rate.denominator() as f64).round() as i32
}

/// Parse an integer the way C `atoi` does.
///
/// Skips leading whitespace, accepts one sign, stops at the first non-digit
/// and yields 0 when no digit is found.
pub fn parse_leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| (acc * 10 + (b - b'0') as i64).min(i32::MAX as i64 + 1));
    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
