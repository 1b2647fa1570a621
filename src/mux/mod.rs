//! The WebM muxer: accepts timestamped coded frames per track and produces a single,
//! fully-formed WebM byte stream.
//!
//! Unlike the demuxer, the muxer is not incremental on the output side: a Cluster's contents,
//! and therefore the Segment's, cannot be finalized until clustering decisions for every block
//! inside it are known, so bytes are only produced once by [`Muxer::finish`].

mod cluster_engine;
mod serializer;
mod track;

use crate::codec::{is_video_keyframe, CodecKind};
use crate::element::Element;
use crate::error::Error;
use cluster_engine::ClusterEngine;
pub use track::{TrackConfig, TrackKind};
use track::{Block, Track};

/// Muxer-wide configuration. Constructed once and passed to [`Muxer::new`]; there is no
/// external configuration file format, matching how this crate is embedded as a library.
#[derive(Debug, Clone, Copy)]
pub struct MuxerConfig {
    /// The `TimestampScale` to declare in the output `Info`, in nanoseconds per tick.
    /// Every pushed timestamp is interpreted in this unit.
    pub timestamp_scale: u64,
}

impl Default for MuxerConfig {
    fn default() -> Self {
        Self {
            timestamp_scale: 1_000_000, // milliseconds
        }
    }
}

/// Builds a single WebM Segment from timestamped, per-track coded frames.
///
/// Tracks are fixed at construction; `track_id` in [`push_buffer`](Muxer::push_buffer) indexes
/// into the slice passed to [`new`](Muxer::new).
#[derive(Debug)]
pub struct Muxer {
    config: MuxerConfig,
    tracks: Vec<Track>,
    cluster_engine: ClusterEngine,
}

impl Muxer {
    /// Create a muxer for a fixed, complete list of tracks.
    pub fn new(tracks: Vec<TrackConfig>, config: MuxerConfig) -> Self {
        let tracks = tracks
            .into_iter()
            .enumerate()
            .map(|(i, config)| Track::new((i + 1) as u64, config))
            .collect();
        Self {
            config,
            tracks,
            cluster_engine: ClusterEngine::new(),
        }
    }

    fn track_mut(&mut self, track_id: usize) -> crate::Result<&mut Track> {
        self.tracks
            .get_mut(track_id)
            .ok_or(Error::UnknownTrack(track_id as u64))
    }

    /// Push one coded frame for `track_id`. `pts`/`dts` are in the caller's own timebase;
    /// each track's first buffer fixes the offset that normalizes its timestamps to start at 0.
    pub fn push_buffer(
        &mut self,
        track_id: usize,
        pts: Option<i64>,
        dts: Option<i64>,
        payload: Vec<u8>,
    ) -> crate::Result<()> {
        let codec = self.tracks[track_id.min(self.tracks.len().saturating_sub(1))].config.codec;
        let track = self.track_mut(track_id)?;
        if track.ended {
            return Err(Error::TrackEnded(track_id as u64));
        }

        let raw_ts = pts.or(dts).ok_or(Error::MissingTimestamp(track_id as u64))?;
        if track.offset.is_none() {
            track.offset = Some(-raw_ts);
            track.uses_dts = pts.is_none();
        }
        let absolute_timestamp = raw_ts + track.offset.unwrap();

        if let Some(previous) = track.last_absolute_timestamp {
            if absolute_timestamp < previous {
                return Err(Error::NonMonotonicTimestamp {
                    track: track_id as u64,
                    previous,
                    next: absolute_timestamp,
                });
            }
        }
        track.last_absolute_timestamp = Some(absolute_timestamp);

        track.pending.push_back(Block {
            absolute_timestamp,
            payload,
            track_number: track.track_number,
            codec,
        });

        self.drain_ready()
    }

    /// Mark `track_id` as having no further buffers. Unblocks the merge once every other
    /// active track also has a pending buffer or has itself ended.
    pub fn end_track(&mut self, track_id: usize) -> crate::Result<()> {
        self.track_mut(track_id)?.ended = true;
        self.drain_ready()
    }

    fn drain_ready(&mut self) -> crate::Result<()> {
        loop {
            if !self.tracks.iter().all(|t| t.ended || !t.pending.is_empty()) {
                return Ok(());
            }
            let Some(idx) = self.pick_next_index() else {
                return Ok(());
            };
            let block = self.tracks[idx].pending.pop_front().unwrap();
            let kind = self.tracks[idx].kind();
            let keyframe = match block.codec {
                CodecKind::Opus => false,
                _ => is_video_keyframe(block.codec, &block.payload)?,
            };
            self.cluster_engine.accept(block, keyframe, kind);
        }
    }

    /// Among tracks with a pending buffer, the one with the smallest absolute timestamp;
    /// video sorts before audio on a tie.
    fn pick_next_index(&self) -> Option<usize> {
        self.tracks
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.pending.front().map(|b| (i, b.absolute_timestamp)))
            .min_by_key(|&(i, ts)| {
                let video_first = !matches!(self.tracks[i].kind(), TrackKind::Video);
                (ts, video_first)
            })
            .map(|(i, _)| i)
    }

    /// Flush every track, finalize clustering, and encode the complete WebM byte stream.
    pub fn finish(mut self) -> crate::Result<Vec<u8>> {
        for track in &mut self.tracks {
            track.ended = true;
        }
        self.drain_ready()?;

        if self.cluster_engine.is_empty() {
            return Err(Error::MissingElement(crate::base::VInt64::new(
                *crate::master::Cluster::ID,
            )));
        }

        let clusters = self.cluster_engine.into_clusters();
        serializer::serialize(&self.tracks, clusters, self.config.timestamp_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opus_track() -> TrackConfig {
        TrackConfig {
            codec: CodecKind::Opus,
            kind: TrackKind::Audio,
            pixel_width: None,
            pixel_height: None,
            sample_rate: Some(48_000),
            channels: Some(2),
        }
    }

    fn vp8_track() -> TrackConfig {
        TrackConfig {
            codec: CodecKind::Vp8,
            kind: TrackKind::Video,
            pixel_width: Some(640),
            pixel_height: Some(480),
            sample_rate: None,
            channels: None,
        }
    }

    #[test]
    fn test_single_track_mux_round_shape() {
        let mut muxer = Muxer::new(vec![vp8_track()], MuxerConfig::default());
        for i in 0..3 {
            let keyframe_tag = if i == 0 { 0x00 } else { 0x01 };
            muxer
                .push_buffer(0, Some(i * 33), None, vec![keyframe_tag, 0, 0, 9, 9])
                .unwrap();
        }
        let bytes = muxer.finish().unwrap();
        assert!(!bytes.is_empty());
        // Starts with the EBML header ID.
        assert_eq!(&bytes[0..4], &[0x1A, 0x45, 0xDF, 0xA3]);
    }

    #[test]
    fn test_unknown_track_errors() {
        let mut muxer = Muxer::new(vec![vp8_track()], MuxerConfig::default());
        let err = muxer.push_buffer(5, Some(0), None, vec![0; 4]).unwrap_err();
        assert!(matches!(err, Error::UnknownTrack(5)));
    }

    #[test]
    fn test_audio_and_video_merge_by_timestamp() {
        let mut muxer = Muxer::new(vec![vp8_track(), opus_track()], MuxerConfig::default());
        muxer.push_buffer(0, Some(0), None, vec![0x00, 0, 0, 1]).unwrap();
        muxer.push_buffer(1, Some(0), None, vec![1, 2, 3]).unwrap();
        muxer.push_buffer(0, Some(20), None, vec![0x01, 0, 0, 2]).unwrap();
        muxer.push_buffer(1, Some(20), None, vec![4, 5, 6]).unwrap();
        muxer.end_track(0).unwrap();
        muxer.end_track(1).unwrap();
        let bytes = muxer.finish().unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_non_monotonic_timestamp_rejected() {
        let mut muxer = Muxer::new(vec![vp8_track()], MuxerConfig::default());
        muxer.push_buffer(0, Some(10), None, vec![0x00, 0, 0, 1]).unwrap();
        let err = muxer.push_buffer(0, Some(5), None, vec![0x01, 0, 0, 2]).unwrap_err();
        assert!(matches!(err, Error::NonMonotonicTimestamp { .. }));
    }
}
