//! Stream classification and index remapping
//!
//! One pass over the container's streams in index order.  The first audio
//! and the first video stream are selected; every audio, video or subtitle
//! stream gets the next output index; anything else is excluded.

use ffmpeg_next as ffmpeg;

use crate::types::{media_type_name, StreamDescriptor};

/// A stream chosen as the audio or video representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedStream {
    /// Index of the stream in the container
    pub input_index: usize,
    /// Index assigned in the filtered output stream set
    pub output_index: usize,
}

/// Where a remapped packet goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Audio,
    Video,
    /// Has an output index but is neither selected stream
    Unrouted,
}

/// Non-fatal classification anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDiagnostic {
    /// Stream is not audio, video or subtitle; it is excluded
    InvalidMediaType {
        index: usize,
        medium: ffmpeg::media::Type,
    },
    /// A second video stream; the first one stays selected
    DuplicateVideo { index: usize, selected: usize },
    /// A second audio stream; the first one stays selected
    DuplicateAudio { index: usize, selected: usize },
    /// Subtitle streams are recognized but never routed
    Subtitle { index: usize },
}

/// Result of classifying a container's streams.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamMapping {
    slots: Vec<Option<usize>>,
    audio: Option<SelectedStream>,
    video: Option<SelectedStream>,
    diagnostics: Vec<StreamDiagnostic>,
}

impl StreamMapping {
    /// Number of input streams covered by the mapping
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Mapping covers no streams
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Output index for a container stream index.
    ///
    /// `None` when the stream is excluded or the index is out of range.
    pub fn remap(&self, input_index: usize) -> Option<usize> {
        self.slots.get(input_index).copied().flatten()
    }

    /// Per-input-stream output indices (`None` = excluded)
    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Selected audio stream
    pub fn audio(&self) -> Option<SelectedStream> {
        self.audio
    }

    /// Selected video stream
    pub fn video(&self) -> Option<SelectedStream> {
        self.video
    }

    /// Anomalies found while classifying
    pub fn diagnostics(&self) -> &[StreamDiagnostic] {
        &self.diagnostics
    }

    /// Route for a packet that has already been remapped to `output_index`
    pub fn route(&self, output_index: usize) -> Route {
        if self.audio.map(|s| s.output_index) == Some(output_index) {
            Route::Audio
        } else if self.video.map(|s| s.output_index) == Some(output_index) {
            Route::Video
        } else {
            Route::Unrouted
        }
    }
}

/// Classify streams and build the index mapping.
///
/// Deterministic: the same descriptors always give the same mapping.
pub fn classify_streams(streams: &[StreamDescriptor]) -> StreamMapping {
    let mut mapping = StreamMapping {
        slots: Vec::with_capacity(streams.len()),
        ..Default::default()
    };
    let mut next_output = 0;

    for (i, stream) in streams.iter().enumerate() {
        match stream.medium {
            ffmpeg::media::Type::Video => match mapping.video {
                None => {
                    mapping.video = Some(SelectedStream {
                        input_index: i,
                        output_index: next_output,
                    })
                }
                Some(selected) => mapping.diagnostics.push(StreamDiagnostic::DuplicateVideo {
                    index: i,
                    selected: selected.input_index,
                }),
            },
            ffmpeg::media::Type::Audio => match mapping.audio {
                None => {
                    mapping.audio = Some(SelectedStream {
                        input_index: i,
                        output_index: next_output,
                    })
                }
                Some(selected) => mapping.diagnostics.push(StreamDiagnostic::DuplicateAudio {
                    index: i,
                    selected: selected.input_index,
                }),
            },
            ffmpeg::media::Type::Subtitle => {
                mapping.diagnostics.push(StreamDiagnostic::Subtitle { index: i })
            }
            medium => {
                mapping.slots.push(None);
                mapping
                    .diagnostics
                    .push(StreamDiagnostic::InvalidMediaType { index: i, medium });
                continue;
            }
        }

        mapping.slots.push(Some(next_output));
        next_output += 1;
    }

    for diagnostic in &mapping.diagnostics {
        log_diagnostic(diagnostic);
    }

    tracing::info!(
        "Classified {} streams: audio={:?}, video={:?}, outputs={}",
        mapping.len(),
        mapping.audio.map(|s| s.input_index),
        mapping.video.map(|s| s.input_index),
        next_output
    );

    mapping
}

fn log_diagnostic(diagnostic: &StreamDiagnostic) {
    match diagnostic {
        StreamDiagnostic::InvalidMediaType { index, medium } => tracing::warn!(
            "Stream {}: unsupported media type {}, excluded",
            index,
            media_type_name(*medium)
        ),
        StreamDiagnostic::DuplicateVideo { index, selected } => tracing::warn!(
            "Stream {}: video stream already selected ({}), ignoring",
            index,
            selected
        ),
        StreamDiagnostic::DuplicateAudio { index, selected } => tracing::warn!(
            "Stream {}: audio stream already selected ({}), ignoring",
            index,
            selected
        ),
        StreamDiagnostic::Subtitle { index } => {
            tracing::warn!("Stream {}: subtitle streams are not forwarded", index)
        }
    }
}
