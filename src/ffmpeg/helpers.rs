//! Safe wrappers around FFmpeg FFI calls.
//!
//! Every function in this module is `pub` and **safe** to call.  All `unsafe`
//! blocks are contained here with explicit safety arguments.  Callers outside
//! this module should never need to write `unsafe` for routine FFmpeg access.

use std::ffi::CString;
use std::ptr;

use bytes::Bytes;
use ffmpeg_next as ffmpeg;

use crate::types::CodecParams;

// ── Input lifecycle ─────────────────────────────────────────────────────────

/// Open a container with `avformat_open_input` without probing its streams.
///
/// `ffmpeg::format::input` opens and probes in one call, which makes an
/// unreadable file and an unprobeable one indistinguishable.  The returned
/// `Input` closes the context when dropped.
pub fn open_input(url: &str) -> Result<ffmpeg::format::context::Input, ffmpeg::Error> {
    let c_url = CString::new(url).map_err(|_| ffmpeg::Error::Other {
        errno: ffmpeg::error::EINVAL,
    })?;

    // SAFETY: `ps` starts null so libavformat allocates the context.  On
    // failure libavformat frees it and leaves `ps` null, so there is nothing
    // to release.  On success ownership moves into `Input`, whose `Drop`
    // calls `avformat_close_input` exactly once.
    unsafe {
        let mut ps: *mut ffmpeg::ffi::AVFormatContext = ptr::null_mut();
        match ffmpeg::ffi::avformat_open_input(
            &mut ps,
            c_url.as_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
        ) {
            0 => Ok(ffmpeg::format::context::Input::wrap(ps)),
            e => Err(ffmpeg::Error::from(e)),
        }
    }
}

/// Run `avformat_find_stream_info` on an opened input.
pub fn find_stream_info(input: &mut ffmpeg::format::context::Input) -> Result<(), ffmpeg::Error> {
    // SAFETY: `input.as_mut_ptr()` is a valid, open `AVFormatContext` for the
    // lifetime of `input`.  Passing null options is documented as allowed.
    let ret = unsafe { ffmpeg::ffi::avformat_find_stream_info(input.as_mut_ptr(), ptr::null_mut()) };
    if ret < 0 {
        Err(ffmpeg::Error::from(ret))
    } else {
        Ok(())
    }
}

/// Container duration in `AV_TIME_BASE` units, `None` for `AV_NOPTS_VALUE`.
pub fn input_duration(input: &ffmpeg::format::context::Input) -> Option<i64> {
    let duration = input.duration();
    if duration == ffmpeg::ffi::AV_NOPTS_VALUE {
        None
    } else {
        Some(duration)
    }
}

// ── Codec-parameter field accessors ─────────────────────────────────────────

/// Copy every field the demuxer reports out of an `AVCodecParameters` struct.
///
/// `ffmpeg-next` does not expose most of these through safe accessors.
pub fn codec_params(params: &ffmpeg::codec::parameters::Parameters) -> CodecParams {
    // SAFETY: `params.as_ptr()` returns a valid non-null pointer for the
    // lifetime of `params`.  All fields read are plain scalars; `ch_layout.u`
    // is only read as a mask when `order` says the mask variant is active.
    let p = unsafe { &*params.as_ptr() };
    let channel_layout =
        if p.ch_layout.order == ffmpeg::ffi::AVChannelOrder::AV_CHANNEL_ORDER_NATIVE {
            unsafe { p.ch_layout.u.mask }
        } else {
            0
        };

    CodecParams {
        codec_id: params.id(),
        profile: p.profile,
        width: p.width.max(0) as u32,
        height: p.height.max(0) as u32,
        channel_layout,
        channels: p.ch_layout.nb_channels.max(0) as u16,
        sample_format: p.format,
        sample_rate: p.sample_rate.max(0) as u32,
        frame_size: p.frame_size.max(0) as u32,
        extradata: codec_params_extradata(params),
    }
}

/// Copy the `extradata` bytes from an `AVCodecParameters` struct.
///
/// Returns an empty buffer when the stream carries no extradata.
pub fn codec_params_extradata(params: &ffmpeg::codec::parameters::Parameters) -> Bytes {
    // SAFETY: `extradata` is either null or points to at least
    // `extradata_size` bytes owned by the parameters struct, which outlives
    // this call.  The bytes are copied before returning.
    unsafe {
        let p = params.as_ptr();
        if (*p).extradata.is_null() || (*p).extradata_size <= 0 {
            return Bytes::new();
        }
        let data = std::slice::from_raw_parts((*p).extradata, (*p).extradata_size as usize);
        Bytes::copy_from_slice(data)
    }
}

// ── Packet field accessors ──────────────────────────────────────────────────

/// Read the raw `flags` field of an `AVPacket`.
///
/// `ffmpeg::packet::Flags` does not define `AV_PKT_FLAG_DISCARD`, so the
/// bits are read directly.
pub fn packet_flags(packet: &ffmpeg::Packet) -> i32 {
    // SAFETY: `packet.as_ptr()` is valid for the lifetime of `packet`;
    // `flags` is a plain i32 field.
    unsafe { (*packet.as_ptr()).flags }
}
