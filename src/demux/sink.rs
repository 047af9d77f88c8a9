//! A consumer that summarizes what a session delivered

use serde::Serialize;

use crate::index::MediaInfo;
use crate::types::{ContainerInfo, Packet, StreamDescriptor};

use super::consumer::DemuxConsumer;

/// Per-kind packet totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackSummary {
    pub packets: u64,
    pub bytes: u64,
    pub keyframes: u64,
    pub extradata_len: usize,
    /// First presentation timestamp in microseconds
    pub first_pts_us: Option<u64>,
    /// Last presentation timestamp in microseconds
    pub last_pts_us: Option<u64>,
}

impl TrackSummary {
    fn add(&mut self, packet: &Packet) {
        self.packets += 1;
        self.bytes += packet.size() as u64;
        if packet.is_key() {
            self.keyframes += 1;
        }
        if let Some(us) = packet.pts_us() {
            self.first_pts_us.get_or_insert(us);
            self.last_pts_us = Some(us);
        }
    }
}

/// Error reported through `on_error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub code: i32,
    pub message: String,
}

/// Collects a `MediaInfo` and packet totals for one session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummarySink {
    pub url: Option<String>,
    pub format_name: Option<String>,
    pub media_info: Option<MediaInfo>,
    pub audio: TrackSummary,
    pub video: TrackSummary,
    pub torn_down: bool,
    pub error: Option<SessionError>,
    /// Log every packet at info level
    #[serde(skip)]
    pub print_packets: bool,
}

impl SummarySink {
    pub fn new(print_packets: bool) -> Self {
        Self {
            print_packets,
            ..Default::default()
        }
    }

    fn print(&self, tag: &str, packet: &Packet) {
        if self.print_packets {
            tracing::info!(
                "{} packet: stream={} pts_us={:?} size={} key={}",
                tag,
                packet.stream_index,
                packet.pts_us(),
                packet.size(),
                packet.is_key()
            );
        }
    }
}

impl DemuxConsumer for SummarySink {
    fn on_init(
        &mut self,
        container: &ContainerInfo,
        audio: Option<&StreamDescriptor>,
        video: Option<&StreamDescriptor>,
    ) {
        self.url = Some(container.url.clone());
        self.format_name = Some(container.format_name.clone());
        self.media_info = Some(MediaInfo::from_selection(container, audio, video));
    }

    fn on_video_extradata(&mut self, _container: &ContainerInfo, extradata: &[u8]) {
        self.video.extradata_len = extradata.len();
    }

    fn on_audio_extradata(&mut self, _container: &ContainerInfo, extradata: &[u8]) {
        self.audio.extradata_len = extradata.len();
    }

    fn on_audio_packet(&mut self, _container: &ContainerInfo, packet: &Packet) {
        self.print("audio", packet);
        self.audio.add(packet);
    }

    fn on_video_packet(&mut self, _container: &ContainerInfo, packet: &Packet) {
        self.print("video", packet);
        self.video.add(packet);
    }

    fn on_teardown(&mut self, _container: &ContainerInfo) {
        self.torn_down = true;
    }

    fn on_error(&mut self, code: i32, message: &str) {
        self.error = Some(SessionError {
            code,
            message: message.to_string(),
        });
    }
}
