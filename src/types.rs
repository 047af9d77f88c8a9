//! Value types copied out of the container library.
//!
//! Nothing here borrows from FFmpeg: descriptors and packets are plain owned
//! data, so a session can hand them to a consumer and the consumer can keep
//! them after the container handle is gone.

use bytes::Bytes;
use ffmpeg_next as ffmpeg;

/// `ffmpeg_next::codec::Id`
pub use ffmpeg_next::codec::Id;

/// `ffmpeg_next::media::Type`
pub use ffmpeg_next::media::Type as MediaType;

/// `ffmpeg_next::Rational`
pub use ffmpeg_next::Rational;

/// Codec parameters of one stream.
///
/// Fields that do not apply to the stream's media kind are left at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecParams {
    /// Codec identifier (e.g. `Id::H264`, `Id::AAC`)
    pub codec_id: Id,
    /// Codec profile, `-99` when unknown
    pub profile: i32,
    /// Width of the video in pixels
    pub width: u32,
    /// Height of the video in pixels
    pub height: u32,
    /// Channel layout bit mask (0 when the layout is not a native mask)
    pub channel_layout: u64,
    /// Number of audio channels
    pub channels: u16,
    /// Raw `AVSampleFormat` value, `-1` when unknown
    pub sample_format: i32,
    /// Sampling rate in Hz
    pub sample_rate: u32,
    /// Samples per audio frame (0 when variable or unknown)
    pub frame_size: u32,
    /// Out-of-band codec initialization data (SPS/PPS, AudioSpecificConfig...)
    pub extradata: Bytes,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            codec_id: Id::None,
            profile: -99,
            width: 0,
            height: 0,
            channel_layout: 0,
            channels: 0,
            sample_format: -1,
            sample_rate: 0,
            frame_size: 0,
            extradata: Bytes::new(),
        }
    }
}

/// Immutable view of one container stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    /// Zero-based index of this stream in the container
    pub index: usize,
    /// Media kind (audio, video, subtitle, data...)
    pub medium: MediaType,
    /// Time base of packet timestamps
    pub time_base: Rational,
    /// Real base frame rate (`r_frame_rate`), `0/1` when unknown
    pub frame_rate: Rational,
    /// Codec parameters
    pub codec: CodecParams,
    /// Stream metadata tags in container order
    pub tags: Vec<(String, String)>,
}

impl StreamDescriptor {
    /// Create a descriptor with default codec parameters and no tags.
    pub fn new(index: usize, medium: MediaType, codec_id: Id) -> Self {
        Self {
            index,
            medium,
            time_base: Rational::new(1, 1000),
            frame_rate: Rational::new(0, 1),
            codec: CodecParams {
                codec_id,
                ..Default::default()
            },
            tags: Vec::new(),
        }
    }

    /// First tag whose key starts with `prefix`.
    ///
    /// Same lookup as `av_dict_get(.., AV_DICT_IGNORE_SUFFIX)`: keys are
    /// compared case-insensitively.
    pub fn tag_with_prefix(&self, prefix: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| {
                key.len() >= prefix.len()
                    && key.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
            })
            .map(|(_, value)| value.as_str())
    }
}

/// Container-level summary handed to every consumer callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    /// Path or URI the container was opened from
    pub url: String,
    /// Short name of the detected container format (e.g. `mov,mp4,m4a,3gp,3g2,mj2`)
    pub format_name: String,
    /// Container duration in microseconds, `None` when unknown
    pub duration_us: Option<i64>,
    /// Total bitrate in bits per second (0 when unknown)
    pub bit_rate: u64,
    /// Number of streams in the container
    pub stream_count: usize,
}

/// `AV_PKT_FLAG_KEY`
pub const PKT_FLAG_KEY: i32 = 0x0001;
/// `AV_PKT_FLAG_CORRUPT`
pub const PKT_FLAG_CORRUPT: i32 = 0x0002;
/// `AV_PKT_FLAG_DISCARD`
pub const PKT_FLAG_DISCARD: i32 = 0x0004;

/// A single compressed access unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Stream index. Holds the container index when read, the output index
    /// once the session has remapped it.
    pub stream_index: usize,
    /// Presentation timestamp in `time_base` units
    pub pts: Option<i64>,
    /// Decoding timestamp in `time_base` units
    pub dts: Option<i64>,
    /// Duration in `time_base` units (0 when unknown)
    pub duration: i64,
    /// Raw `AV_PKT_FLAG_*` bits
    pub flags: i32,
    /// Time base of the originating stream
    pub time_base: Rational,
    /// Compressed payload
    pub data: Bytes,
}

impl Packet {
    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Packet starts a keyframe
    pub fn is_key(&self) -> bool {
        self.flags & PKT_FLAG_KEY != 0
    }

    /// Demuxer asked for this packet to be dropped
    pub fn is_discard(&self) -> bool {
        self.flags & PKT_FLAG_DISCARD != 0
    }

    /// Demuxer flagged the payload as corrupt
    pub fn is_corrupt(&self) -> bool {
        self.flags & PKT_FLAG_CORRUPT != 0
    }

    /// Presentation timestamp in microseconds, if present
    pub fn pts_us(&self) -> Option<u64> {
        self.pts
            .map(|pts| crate::timestamp::pts_to_us(self.time_base, pts))
    }
}

pub(crate) fn media_type_name(medium: ffmpeg::media::Type) -> &'static str {
    match medium {
        ffmpeg::media::Type::Video => "video",
        ffmpeg::media::Type::Audio => "audio",
        ffmpeg::media::Type::Subtitle => "subtitle",
        ffmpeg::media::Type::Data => "data",
        ffmpeg::media::Type::Attachment => "attachment",
        _ => "unknown",
    }
}
