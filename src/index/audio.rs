//! Audio stream metadata extraction

use crate::timestamp::duration_us_to_ms;
use crate::types::{ContainerInfo, StreamDescriptor};

use super::MediaInfo;

/// Fill the audio fields of `info` from the selected audio stream.
///
/// Also records the container duration, converted to milliseconds.
pub fn extract_audio_info(container: &ContainerInfo, stream: &StreamDescriptor, info: &mut MediaInfo) {
    let codec = &stream.codec;
    info.duration_ms = duration_us_to_ms(container.duration_us);
    info.has_audio = true;
    info.audio_codec = codec.codec_id;
    info.audio_profile = codec.profile;
    info.audio_channel_layout = codec.channel_layout;
    info.audio_channels = codec.channels;
    info.audio_sample_format = codec.sample_format;
    info.audio_sample_rate = codec.sample_rate;
    info.samples_per_frame = codec.frame_size;
}
