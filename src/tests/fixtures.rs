//! Test fixtures for session tests
//!
//! Provides a scripted container source and a consumer that records every
//! callback it receives.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use ffmpeg_next as ffmpeg;

use crate::demux::{DemuxConsumer, Input, Source};
use crate::error::DemuxError;
use crate::types::{
    ContainerInfo, Id, MediaType, Packet, Rational, StreamDescriptor, PKT_FLAG_DISCARD,
    PKT_FLAG_KEY,
};

/// One scripted read result
#[derive(Debug, Clone)]
pub enum Step {
    Packet(Packet),
    Fail(ffmpeg::Error),
}

/// How often containers were opened, read and released
#[derive(Debug, Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub reads: AtomicUsize,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// A source whose containers replay a fixed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pub streams: Vec<StreamDescriptor>,
    pub steps: Vec<Step>,
    pub open_error: Option<ffmpeg::Error>,
    pub probe_error: Option<ffmpeg::Error>,
    pub counters: Arc<Counters>,
}

impl ScriptedSource {
    pub fn new(streams: Vec<StreamDescriptor>, packets: Vec<Packet>) -> Self {
        Self {
            streams,
            steps: packets.into_iter().map(Step::Packet).collect(),
            ..Default::default()
        }
    }
}

impl Source for ScriptedSource {
    type Input = ScriptedInput;

    fn open(&self, url: &str) -> Result<ScriptedInput, DemuxError> {
        if let Some(source) = self.open_error {
            return Err(DemuxError::Open {
                url: url.to_string(),
                source,
            });
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedInput {
            url: url.to_string(),
            streams: self.streams.clone(),
            steps: self.steps.iter().cloned().collect(),
            probe_error: self.probe_error,
            counters: self.counters.clone(),
        })
    }
}

pub struct ScriptedInput {
    url: String,
    streams: Vec<StreamDescriptor>,
    steps: VecDeque<Step>,
    probe_error: Option<ffmpeg::Error>,
    counters: Arc<Counters>,
}

impl Input for ScriptedInput {
    fn probe(&mut self) -> Result<(), DemuxError> {
        match self.probe_error {
            Some(e) => Err(DemuxError::Probe(e)),
            None => Ok(()),
        }
    }

    fn container_info(&self) -> ContainerInfo {
        ContainerInfo {
            url: self.url.clone(),
            format_name: "scripted".to_string(),
            duration_us: Some(10_000_000),
            bit_rate: 0,
            stream_count: self.streams.len(),
        }
    }

    fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    fn read_packet(&mut self) -> Result<Option<Packet>, DemuxError> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        match self.steps.pop_front() {
            Some(Step::Packet(p)) => Ok(Some(p)),
            Some(Step::Fail(e)) => Err(DemuxError::Read(e)),
            None => Ok(None),
        }
    }
}

impl Drop for ScriptedInput {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A recorded consumer callback
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Init {
        audio: Option<usize>,
        video: Option<usize>,
    },
    VideoExtradata(Vec<u8>),
    AudioExtradata(Vec<u8>),
    Audio(Packet),
    Video(Packet),
    Teardown,
    Error(i32, String),
}

/// Consumer that records every callback in order
#[derive(Debug, Default)]
pub struct RecordingConsumer {
    pub events: Vec<Event>,
}

impl RecordingConsumer {
    pub fn audio_packets(&self) -> Vec<&Packet> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Audio(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn video_packets(&self) -> Vec<&Packet> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Video(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn errors(&self) -> Vec<(i32, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Error(code, msg) => Some((*code, msg.clone())),
                _ => None,
            })
            .collect()
    }
}

impl DemuxConsumer for RecordingConsumer {
    fn on_init(
        &mut self,
        _container: &ContainerInfo,
        audio: Option<&StreamDescriptor>,
        video: Option<&StreamDescriptor>,
    ) {
        self.events.push(Event::Init {
            audio: audio.map(|s| s.index),
            video: video.map(|s| s.index),
        });
    }

    fn on_video_extradata(&mut self, _container: &ContainerInfo, extradata: &[u8]) {
        self.events.push(Event::VideoExtradata(extradata.to_vec()));
    }

    fn on_audio_extradata(&mut self, _container: &ContainerInfo, extradata: &[u8]) {
        self.events.push(Event::AudioExtradata(extradata.to_vec()));
    }

    fn on_audio_packet(&mut self, _container: &ContainerInfo, packet: &Packet) {
        self.events.push(Event::Audio(packet.clone()));
    }

    fn on_video_packet(&mut self, _container: &ContainerInfo, packet: &Packet) {
        self.events.push(Event::Video(packet.clone()));
    }

    fn on_teardown(&mut self, _container: &ContainerInfo) {
        self.events.push(Event::Teardown);
    }

    fn on_error(&mut self, code: i32, message: &str) {
        self.events.push(Event::Error(code, message.to_string()));
    }
}

/// H.264 video stream with SPS/PPS-like extradata
pub fn video_stream(index: usize) -> StreamDescriptor {
    let mut s = StreamDescriptor::new(index, MediaType::Video, Id::H264);
    s.time_base = Rational::new(1, 90000);
    s.frame_rate = Rational::new(30000, 1001);
    s.codec.width = 1280;
    s.codec.height = 720;
    s.codec.extradata = Bytes::from_static(&[0x01, 0x64, 0x00, 0x1f]);
    s
}

/// AAC audio stream with an AudioSpecificConfig
pub fn audio_stream(index: usize) -> StreamDescriptor {
    let mut s = StreamDescriptor::new(index, MediaType::Audio, Id::AAC);
    s.time_base = Rational::new(1, 48000);
    s.codec.sample_rate = 48000;
    s.codec.channels = 2;
    s.codec.channel_layout = 0x3;
    s.codec.frame_size = 1024;
    s.codec.extradata = Bytes::from_static(&[0x11, 0x90]);
    s
}

pub fn stream(index: usize, medium: MediaType) -> StreamDescriptor {
    StreamDescriptor::new(index, medium, Id::None)
}

/// A keyframe packet of `stream_index` with the given pts
pub fn packet(stream_index: usize, pts: i64) -> Packet {
    Packet {
        stream_index,
        pts: Some(pts),
        dts: Some(pts),
        duration: 0,
        flags: PKT_FLAG_KEY,
        time_base: Rational::new(1, 1000),
        data: Bytes::from(vec![stream_index as u8; 16]),
    }
}

/// A packet carrying the discard flag
pub fn discarded_packet(stream_index: usize, pts: i64) -> Packet {
    Packet {
        flags: PKT_FLAG_DISCARD,
        ..packet(stream_index, pts)
    }
}
