//! Stream classification and metadata extraction
//!
//! This module handles:
//! - Selecting one audio and one video stream and building the index mapping
//! - Audio summary fields (codec, channels, sample format and rate)
//! - Video summary fields (codec, resolution, frame rate, rotation)

pub mod audio;
pub mod mapping;
pub mod media_info;
pub mod video;

pub use audio::extract_audio_info;
pub use mapping::{classify_streams, Route, SelectedStream, StreamDiagnostic, StreamMapping};
pub use media_info::MediaInfo;
pub use video::extract_video_info;
