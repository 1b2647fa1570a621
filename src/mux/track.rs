//! Per-track muxer state: configuration supplied up front plus the running bookkeeping needed
//! to normalize timestamps and merge each track's buffers into Cluster order.

use crate::codec::CodecKind;
use std::collections::VecDeque;

/// Whether a track carries picture or sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// A video track (VP8 or VP9).
    Video,
    /// An audio track (Opus).
    Audio,
}

/// Track capabilities supplied to [`crate::mux::Muxer::new`]. The complete set of tracks is
/// fixed at construction time; there is no `add_track` once muxing has begun.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// The codec carried by this track.
    pub codec: CodecKind,
    /// Whether this is a video or audio track.
    pub kind: TrackKind,
    /// Frame width in pixels. Required for video tracks.
    pub pixel_width: Option<u32>,
    /// Frame height in pixels. Required for video tracks.
    pub pixel_height: Option<u32>,
    /// Sample rate in Hz. Required for audio tracks.
    pub sample_rate: Option<u32>,
    /// Channel count (1 or 2). Required for Opus tracks.
    pub channels: Option<u8>,
}

/// A single coded frame queued for muxing.
#[derive(Debug, Clone)]
pub(crate) struct Block {
    pub absolute_timestamp: i64,
    pub payload: Vec<u8>,
    pub track_number: u64,
    pub codec: CodecKind,
}

#[derive(Debug)]
pub(crate) struct Track {
    /// 1-based, assigned in construction order; matches the wire `TrackNumber`.
    pub track_number: u64,
    pub config: TrackConfig,
    /// The timestamp offset fixing the track's first buffer to absolute timestamp 0.
    pub offset: Option<i64>,
    pub uses_dts: bool,
    pub last_absolute_timestamp: Option<i64>,
    /// Buffers accepted but not yet safe to emit, oldest first.
    pub pending: VecDeque<Block>,
    pub ended: bool,
}

impl Track {
    pub fn new(track_number: u64, config: TrackConfig) -> Self {
        Self {
            track_number,
            config,
            offset: None,
            uses_dts: false,
            last_absolute_timestamp: None,
            pending: VecDeque::new(),
            ended: false,
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.config.kind
    }
}
