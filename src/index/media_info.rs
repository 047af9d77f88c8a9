//! Flat per-session media summary

use ffmpeg_next as ffmpeg;
use serde::{Serialize, Serializer};

use crate::types::{ContainerInfo, StreamDescriptor};

use super::{extract_audio_info, extract_video_info};

/// Summary of the selected audio and video streams.
///
/// Populated once per session; fields of an absent stream stay at their
/// defaults and the matching `has_*` flag is false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    /// Container duration in milliseconds (0 when unknown)
    pub duration_ms: i64,

    pub has_audio: bool,
    #[serde(serialize_with = "serialize_codec")]
    pub audio_codec: ffmpeg::codec::Id,
    pub audio_profile: i32,
    /// Channel layout mask
    pub audio_channel_layout: u64,
    pub audio_channels: u16,
    /// Raw `AVSampleFormat` value
    pub audio_sample_format: i32,
    pub audio_sample_rate: u32,
    pub samples_per_frame: u32,

    pub has_video: bool,
    #[serde(serialize_with = "serialize_codec")]
    pub video_codec: ffmpeg::codec::Id,
    pub video_width: u32,
    pub video_height: u32,
    /// Nearest-integer frames per second
    pub video_frame_rate: i32,
    /// Rotation in degrees from the `rotate` tag
    pub video_rotation: i32,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            has_audio: false,
            audio_codec: ffmpeg::codec::Id::None,
            audio_profile: 0,
            audio_channel_layout: 0,
            audio_channels: 0,
            audio_sample_format: 0,
            audio_sample_rate: 0,
            samples_per_frame: 0,
            has_video: false,
            video_codec: ffmpeg::codec::Id::None,
            video_width: 0,
            video_height: 0,
            video_frame_rate: 0,
            video_rotation: 0,
        }
    }
}

impl MediaInfo {
    /// Build the summary from the session's selected streams.
    ///
    /// Either stream may be absent.
    pub fn from_selection(
        container: &ContainerInfo,
        audio: Option<&StreamDescriptor>,
        video: Option<&StreamDescriptor>,
    ) -> Self {
        let mut info = MediaInfo::default();
        if let Some(stream) = audio {
            extract_audio_info(container, stream, &mut info);
        } else {
            info.duration_ms = crate::timestamp::duration_us_to_ms(container.duration_us);
        }
        if let Some(stream) = video {
            extract_video_info(stream, &mut info);
        }
        info
    }
}

fn serialize_codec<S: Serializer>(id: &ffmpeg::codec::Id, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.name())
}
