//! Consumer callback interface

use crate::types::{ContainerInfo, Packet, StreamDescriptor};

/// Receiver of everything a demuxing session produces.
///
/// Callbacks run synchronously on the session's thread, in this order:
/// `on_init`, `on_video_extradata`, `on_audio_extradata`, then packets, then
/// `on_teardown`.  `on_error` is called at most once, after teardown when the
/// session got that far.  A callback that blocks stalls the whole session.
pub trait DemuxConsumer {
    /// Container opened and classified.  Either stream may be absent.
    fn on_init(
        &mut self,
        container: &ContainerInfo,
        audio: Option<&StreamDescriptor>,
        video: Option<&StreamDescriptor>,
    );

    /// Out-of-band codec data of the video stream (possibly empty).
    ///
    /// Not called when there is no video stream.
    fn on_video_extradata(&mut self, container: &ContainerInfo, extradata: &[u8]);

    /// Out-of-band codec data of the audio stream (possibly empty).
    ///
    /// Not called when there is no audio stream.
    fn on_audio_extradata(&mut self, container: &ContainerInfo, extradata: &[u8]);

    /// One compressed audio packet, already remapped to its output index.
    fn on_audio_packet(&mut self, container: &ContainerInfo, packet: &Packet);

    /// One compressed video packet, already remapped to its output index.
    fn on_video_packet(&mut self, container: &ContainerInfo, packet: &Packet);

    /// The read loop ended (end of input, stop request or read error).
    fn on_teardown(&mut self, container: &ContainerInfo);

    /// The session failed.  `code` is a negative `AVERROR` value.
    fn on_error(&mut self, code: i32, message: &str);
}
