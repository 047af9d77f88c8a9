//! Container demuxer
//!
//! Opens a container, selects the first audio and the first video stream,
//! and pushes each compressed packet of those two streams to a consumer,
//! together with codec extradata and a flat media summary.
//!
//! ```no_run
//! use avdemux::{demux, StopToken, SummarySink};
//!
//! avdemux::ffmpeg::init().expect("ffmpeg init");
//! let mut sink = SummarySink::new(false);
//! let report = demux("clip.mp4", &mut sink, StopToken::new()).expect("demux");
//! println!("{} video packets", report.stats.video_packets);
//! ```

pub mod config;
pub mod demux;
pub mod error;
pub mod ffmpeg;
pub mod index;
pub mod timestamp;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use demux::{
    demux, Continuation, DemuxConsumer, DemuxSession, Input, Limit, SessionOutcome,
    SessionReport, SessionState, SessionStats, Source, StopToken, SummarySink,
};
pub use error::{DemuxError, Error, Result};
pub use index::{classify_streams, MediaInfo, Route, StreamDiagnostic, StreamMapping};
pub use timestamp::pts_to_us;
pub use types::{CodecParams, ContainerInfo, Packet, StreamDescriptor};
