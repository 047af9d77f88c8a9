//! Demuxing sessions
//!
//! This module handles:
//! - The container access seam (`Source`/`Input`)
//! - The consumer callback interface
//! - Cooperative cancellation
//! - The session control loop

pub mod consumer;
pub mod continuation;
pub mod session;
pub mod sink;
pub mod source;

pub use consumer::DemuxConsumer;
pub use continuation::{Continuation, Limit, StopToken};
pub use session::{DemuxSession, SessionOutcome, SessionReport, SessionState, SessionStats};
pub use sink::{SummarySink, TrackSummary};
pub use source::{Input, Source};

use crate::error::DemuxError;
use crate::ffmpeg::FfmpegSource;

/// Demux `url` with libavformat, pushing packets to `consumer` until end of
/// input, a stop from `continuation`, or an error.
pub fn demux<C, K>(url: &str, consumer: &mut C, continuation: K) -> Result<SessionReport, DemuxError>
where
    C: DemuxConsumer + ?Sized,
    K: Continuation,
{
    DemuxSession::new(FfmpegSource).run(url, consumer, continuation)
}
