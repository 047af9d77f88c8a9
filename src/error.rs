use ffmpeg_next as ffmpeg;
use thiserror::Error;

/// Main error type for the demuxer binary and ambient layer
#[derive(Error, Debug)]
pub enum Error {
    /// A demuxing session failed
    #[error("Demux error: {0}")]
    Demux(#[from] DemuxError),

    /// Failure during global FFmpeg initialization
    #[error("FFmpeg initialization failed: {0}")]
    InitFailed(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Fatal errors of a demuxing session.
///
/// Each one ends the session; none of them is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemuxError {
    /// The container could not be opened (bad path, unsupported format, I/O failure)
    #[error("Failed to open input {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: ffmpeg::Error,
    },

    /// Stream information could not be determined
    #[error("Failed to find stream info: {0}")]
    Probe(#[source] ffmpeg::Error),

    /// Reading a packet failed for a reason other than end of input
    #[error("Failed to read packet: {0}")]
    Read(#[source] ffmpeg::Error),
}

impl DemuxError {
    /// The underlying FFmpeg error
    pub fn ffmpeg_error(&self) -> ffmpeg::Error {
        match self {
            DemuxError::Open { source, .. } => *source,
            DemuxError::Probe(e) | DemuxError::Read(e) => *e,
        }
    }

    /// Numeric error code reported to the consumer.
    ///
    /// This is the negative `AVERROR` value, so it is never 0.
    pub fn code(&self) -> i32 {
        let code: i32 = self.ffmpeg_error().into();
        if code == 0 {
            -1
        } else {
            code
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_nonzero() {
        let errors = [
            DemuxError::Open {
                url: "missing.mp4".to_string(),
                source: ffmpeg::Error::Other {
                    errno: ffmpeg::error::ENOENT,
                },
            },
            DemuxError::Probe(ffmpeg::Error::InvalidData),
            DemuxError::Read(ffmpeg::Error::Other {
                errno: ffmpeg::error::EIO,
            }),
        ];
        for e in &errors {
            assert!(e.code() < 0, "{} has code {}", e, e.code());
        }
    }

    #[test]
    fn test_open_error_message() {
        let e = DemuxError::Open {
            url: "missing.mp4".to_string(),
            source: ffmpeg::Error::InvalidData,
        };
        assert!(e.to_string().starts_with("Failed to open input missing.mp4"));
    }
}
