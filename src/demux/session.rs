//! The demuxing control loop
//!
//! ```text
//! Closed -> Opened -> Probed -> Mapped -> Initialized -> Streaming
//!        -> {Draining, Failed} -> Closed
//! ```
//!
//! The opened `Input` is owned by `drive` and dropped on every return path,
//! so the container handle and the mapping are released exactly once no
//! matter where the session ends.

use tracing::Span;

use crate::error::DemuxError;
use crate::index::{classify_streams, Route, StreamMapping};
use crate::timestamp::{pts_to_us, ts_to_timestr};
use crate::types::{media_type_name, ContainerInfo, Packet, StreamDescriptor};

use super::consumer::DemuxConsumer;
use super::continuation::Continuation;
use super::source::{Input, Source};

/// Lifecycle states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Opened,
    Probed,
    Mapped,
    Initialized,
    Streaming,
    Draining,
    Failed,
}

/// Why the read loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// All packets were read
    EndOfInput,
    /// The continuation asked to stop
    Stopped,
}

/// Packet counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Packets returned by the container
    pub packets_read: u64,
    /// Packets handed to `on_audio_packet`
    pub audio_packets: u64,
    /// Packets handed to `on_video_packet`
    pub video_packets: u64,
    /// Dropped: stream excluded or index out of range
    pub excluded: u64,
    /// Dropped: discard flag set
    pub discarded: u64,
    /// Dropped after remapping: neither the audio nor the video stream
    pub unrouted: u64,
}

/// Result of a session that did not fail
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub stats: SessionStats,
    pub mapping: StreamMapping,
    /// Last state reached before the handle was released
    pub last_state: SessionState,
}

/// Runs demuxing sessions against a `Source`.
pub struct DemuxSession<S: Source> {
    source: S,
    span: Option<Span>,
}

impl<S: Source> DemuxSession<S> {
    pub fn new(source: S) -> Self {
        Self { source, span: None }
    }

    /// Emit all session diagnostics inside `span` instead of a fresh
    /// `demux` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Run one session over `url`.
    ///
    /// The consumer is notified of everything, including a failure; the
    /// return value repeats the outcome for the caller.
    pub fn run<C, K>(
        &self,
        url: &str,
        consumer: &mut C,
        continuation: K,
    ) -> Result<SessionReport, DemuxError>
    where
        C: DemuxConsumer + ?Sized,
        K: Continuation,
    {
        let span = self
            .span
            .clone()
            .unwrap_or_else(|| tracing::info_span!("demux", url = %url));
        let _enter = span.enter();

        let mut state = StateTracker::default();
        let result = self.drive(url, consumer, continuation, &mut state);
        state.enter(SessionState::Closed);

        match result {
            Ok(report) => {
                tracing::info!(
                    "Session ended ({:?}): read={}, audio={}, video={}",
                    report.outcome,
                    report.stats.packets_read,
                    report.stats.audio_packets,
                    report.stats.video_packets
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Session failed in {:?}: {}", state.last_active, e);
                consumer.on_error(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn drive<C, K>(
        &self,
        url: &str,
        consumer: &mut C,
        mut continuation: K,
        state: &mut StateTracker,
    ) -> Result<SessionReport, DemuxError>
    where
        C: DemuxConsumer + ?Sized,
        K: Continuation,
    {
        let mut input = self.source.open(url)?;
        state.enter(SessionState::Opened);

        input.probe()?;
        state.enter(SessionState::Probed);

        let container = input.container_info();
        log_streams(&container, input.streams());

        let mapping = classify_streams(input.streams());
        state.enter(SessionState::Mapped);

        // Cloned so the descriptors outlive the shared borrow of `input`
        let audio: Option<StreamDescriptor> = mapping
            .audio()
            .and_then(|s| input.streams().get(s.input_index).cloned());
        let video: Option<StreamDescriptor> = mapping
            .video()
            .and_then(|s| input.streams().get(s.input_index).cloned());

        consumer.on_init(&container, audio.as_ref(), video.as_ref());
        match &video {
            Some(v) => consumer.on_video_extradata(&container, &v.codec.extradata),
            None => tracing::debug!("No video stream, skipping video extradata"),
        }
        match &audio {
            Some(a) => consumer.on_audio_extradata(&container, &a.codec.extradata),
            None => tracing::debug!("No audio stream, skipping audio extradata"),
        }
        state.enter(SessionState::Initialized);

        state.enter(SessionState::Streaming);
        let mut stats = SessionStats::default();
        let end = loop {
            if !continuation.keep_going() {
                tracing::info!("Stop requested after {} packets", stats.packets_read);
                break Ok(SessionOutcome::Stopped);
            }

            let mut packet = match input.read_packet() {
                Ok(Some(packet)) => packet,
                Ok(None) => break Ok(SessionOutcome::EndOfInput),
                Err(e) => break Err(e),
            };
            stats.packets_read += 1;

            let Some(output_index) = mapping.remap(packet.stream_index) else {
                stats.excluded += 1;
                continue;
            };
            if packet.is_discard() {
                stats.discarded += 1;
                continue;
            }

            let input_index = packet.stream_index;
            packet.stream_index = output_index;
            match mapping.route(output_index) {
                Route::Audio => {
                    log_packet(&packet, "audio");
                    consumer.on_audio_packet(&container, &packet);
                    stats.audio_packets += 1;
                }
                Route::Video => {
                    log_packet(&packet, "video");
                    consumer.on_video_packet(&container, &packet);
                    stats.video_packets += 1;
                }
                Route::Unrouted => {
                    tracing::debug!(
                        "Dropping packet of stream {} (output {}): not a selected stream",
                        input_index,
                        output_index
                    );
                    stats.unrouted += 1;
                }
            }
            // `packet` drops here, releasing its payload
        };

        state.enter(SessionState::Draining);
        tracing::info!("Teardown");
        consumer.on_teardown(&container);

        match end {
            Ok(outcome) => Ok(SessionReport {
                outcome,
                stats,
                mapping,
                last_state: state.last_active,
            }),
            Err(e) => {
                state.enter(SessionState::Failed);
                Err(e)
            }
        }
    }
}

/// Tracks and logs state transitions; remembers the last non-closed state.
#[derive(Debug)]
struct StateTracker {
    current: SessionState,
    last_active: SessionState,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            current: SessionState::Closed,
            last_active: SessionState::Closed,
        }
    }
}

impl StateTracker {
    fn enter(&mut self, next: SessionState) {
        tracing::trace!("{:?} -> {:?}", self.current, next);
        self.current = next;
        if next != SessionState::Closed {
            self.last_active = next;
        }
    }
}

/// Stream summary logged after probing
fn log_streams(container: &ContainerInfo, streams: &[StreamDescriptor]) {
    tracing::info!(
        "Input {}: format={}, duration_us={:?}, streams={}",
        container.url,
        container.format_name,
        container.duration_us,
        streams.len()
    );
    for s in streams {
        tracing::debug!(
            "Stream {}: type={}, codec={}, time_base={}/{}, {}x{}, {}Hz, {}ch, extradata={}B",
            s.index,
            media_type_name(s.medium),
            s.codec.codec_id.name(),
            s.time_base.numerator(),
            s.time_base.denominator(),
            s.codec.width,
            s.codec.height,
            s.codec.sample_rate,
            s.codec.channels,
            s.codec.extradata.len()
        );
    }
}

fn log_packet(packet: &Packet, tag: &str) {
    tracing::debug!(
        "{}, flags:{} pts:{} pts_time:{} dts_time:{} size:{}",
        tag,
        packet.flags,
        packet.pts.map(|pts| pts_to_us(packet.time_base, pts)).unwrap_or(0),
        ts_to_timestr(packet.pts, packet.time_base),
        ts_to_timestr(packet.dts, packet.time_base),
        packet.size()
    );
}
