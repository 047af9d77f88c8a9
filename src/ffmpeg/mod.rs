//! FFmpeg module - the container library behind the demuxer
//!
//! This module handles:
//! - FFmpeg initialization
//! - Routing FFmpeg's own log output into `tracing`
//! - The libavformat-backed `Source`/`Input` implementation

pub mod context;
pub mod helpers;

pub use context::{FfmpegInput, FfmpegSource};
pub use ffmpeg_next as ffmpeg;

/// Initialize the FFmpeg library.
///
/// This should be called once at application startup before any session runs.
pub fn init() -> Result<(), crate::error::Error> {
    ffmpeg::init()
        .map_err(|e| crate::error::Error::InitFailed(format!("ffmpeg::init() failed: {}", e)))?;

    tracing::info!("FFmpeg initialized");

    Ok(())
}

/// Map a level name from the configuration to an `AV_LOG_*` value.
pub fn av_log_level(name: &str) -> Option<i32> {
    let level = match name.to_ascii_lowercase().as_str() {
        "quiet" => ffmpeg::ffi::AV_LOG_QUIET as i32,
        "panic" => ffmpeg::ffi::AV_LOG_PANIC as i32,
        "fatal" => ffmpeg::ffi::AV_LOG_FATAL as i32,
        "error" => ffmpeg::ffi::AV_LOG_ERROR as i32,
        "warning" | "warn" => ffmpeg::ffi::AV_LOG_WARNING as i32,
        "info" => ffmpeg::ffi::AV_LOG_INFO as i32,
        "verbose" => ffmpeg::ffi::AV_LOG_VERBOSE as i32,
        "debug" => ffmpeg::ffi::AV_LOG_DEBUG as i32,
        "trace" => ffmpeg::ffi::AV_LOG_TRACE as i32,
        _ => return None,
    };
    Some(level)
}

/// Install a log callback that forwards FFmpeg messages to `tracing`.
///
/// **Ordering:** must be called after `init()` and before any session starts,
/// because the log level and callback are process-wide FFmpeg state.
pub fn install_log_filter(level: i32) {
    // SAFETY: both functions modify global FFmpeg state and are safe to call
    // after `ffmpeg::init()`.  They are called once at startup before any
    // session thread begins reading.
    unsafe {
        ffmpeg::ffi::av_log_set_level(level);
        ffmpeg::ffi::av_log_set_callback(Some(ffmpeg_log_callback));
    }
}

/// Messages that libavformat emits for harmless stream quirks.
const SUPPRESSED_MESSAGES: &[&str] = &[
    "Could not update timestamps for skipped samples",
    "Could not update timestamps for discarded samples",
    "Error parsing Opus packet header",
];

unsafe extern "C" fn ffmpeg_log_callback(
    avcl: *mut std::ffi::c_void,
    level: std::ffi::c_int,
    fmt: *const std::ffi::c_char,
    vl: ffmpeg::ffi::va_list,
) {
    use std::ffi::CStr;

    if level > ffmpeg::ffi::av_log_get_level() {
        return;
    }

    let mut buf = [0 as std::ffi::c_char; 1024];
    let mut print_prefix: std::ffi::c_int = 1;
    ffmpeg::ffi::av_log_format_line(
        avcl,
        level,
        fmt,
        vl,
        buf.as_mut_ptr(),
        buf.len() as std::ffi::c_int,
        &mut print_prefix,
    );

    let msg = CStr::from_ptr(buf.as_ptr()).to_string_lossy();
    let msg = msg.trim_end();
    if msg.is_empty() || SUPPRESSED_MESSAGES.iter().any(|s| msg.contains(s)) {
        return;
    }

    if level <= ffmpeg::ffi::AV_LOG_ERROR as i32 {
        tracing::error!(target: "ffmpeg", "{}", msg);
    } else if level <= ffmpeg::ffi::AV_LOG_WARNING as i32 {
        tracing::warn!(target: "ffmpeg", "{}", msg);
    } else if level <= ffmpeg::ffi::AV_LOG_INFO as i32 {
        tracing::info!(target: "ffmpeg", "{}", msg);
    } else if level <= ffmpeg::ffi::AV_LOG_DEBUG as i32 {
        tracing::debug!(target: "ffmpeg", "{}", msg);
    } else {
        tracing::trace!(target: "ffmpeg", "{}", msg);
    }
}

/// Get the version information of the linked libavformat.
pub fn version_info() -> String {
    // SAFETY: `avformat_version` only returns a compile-time constant.
    let v = unsafe { ffmpeg::ffi::avformat_version() };
    format!("libavformat {}.{}.{}", v >> 16, (v >> 8) & 0xff, v & 0xff)
}
