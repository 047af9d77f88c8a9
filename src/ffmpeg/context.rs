//! libavformat-backed container access

use bytes::Bytes;
use ffmpeg_next as ffmpeg;

use crate::demux::source::{Input, Source};
use crate::error::DemuxError;
use crate::types::{ContainerInfo, Packet, StreamDescriptor};

use super::helpers;

/// Opens containers through libavformat.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegSource;

impl Source for FfmpegSource {
    type Input = FfmpegInput;

    fn open(&self, url: &str) -> Result<FfmpegInput, DemuxError> {
        FfmpegInput::open(url)
    }
}

/// Wrapper for an FFmpeg input context.
///
/// The context is closed when this value is dropped.
pub struct FfmpegInput {
    inner: ffmpeg::format::context::Input,
    url: String,
    streams: Vec<StreamDescriptor>,
}

impl FfmpegInput {
    /// Open a media file or URL for reading
    pub fn open(url: &str) -> Result<Self, DemuxError> {
        let inner = helpers::open_input(url).map_err(|source| DemuxError::Open {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Opened input: {}", url);

        Ok(Self {
            inner,
            url: url.to_string(),
            streams: Vec::new(),
        })
    }
}

impl Input for FfmpegInput {
    fn probe(&mut self) -> Result<(), DemuxError> {
        helpers::find_stream_info(&mut self.inner).map_err(DemuxError::Probe)?;
        self.streams = self.inner.streams().map(|s| describe_stream(&s)).collect();
        Ok(())
    }

    fn container_info(&self) -> ContainerInfo {
        ContainerInfo {
            url: self.url.clone(),
            format_name: self.inner.format().name().to_string(),
            duration_us: helpers::input_duration(&self.inner),
            bit_rate: self.inner.bit_rate().max(0) as u64,
            stream_count: self.inner.nb_streams() as usize,
        }
    }

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn read_packet(&mut self) -> Result<Option<Packet>, DemuxError> {
        let mut packet = ffmpeg::Packet::empty();
        match packet.read(&mut self.inner) {
            Ok(()) => {}
            Err(ffmpeg::Error::Eof) => return Ok(None),
            Err(e) => return Err(DemuxError::Read(e)),
        }

        let stream_index = packet.stream();
        let time_base = self
            .streams
            .get(stream_index)
            .map(|s| s.time_base)
            .unwrap_or(ffmpeg::Rational::new(1, 1_000_000));

        // The payload is copied; the AVPacket is unreferenced when `packet` drops.
        Ok(Some(Packet {
            stream_index,
            pts: packet.pts(),
            dts: packet.dts(),
            duration: packet.duration(),
            flags: helpers::packet_flags(&packet),
            time_base,
            data: packet.data().map(Bytes::copy_from_slice).unwrap_or_default(),
        }))
    }
}

/// Build a descriptor from a probed stream
pub fn describe_stream(stream: &ffmpeg::Stream) -> StreamDescriptor {
    let params = stream.parameters();
    StreamDescriptor {
        index: stream.index(),
        medium: params.medium(),
        time_base: stream.time_base(),
        frame_rate: stream.rate(),
        codec: helpers::codec_params(&params),
        tags: stream
            .metadata()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}
