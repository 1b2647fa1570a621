//! Groups a merged, time-ordered sequence of blocks into Clusters, applying the boundary
//! policy: a new Cluster starts whenever the current one has grown past 5 MiB, the gap since
//! its first block has reached 5 seconds, or a video keyframe arrives.

use crate::block::{Lacing, SimpleBlock};
use crate::mux::track::{Block, TrackKind};

const MAX_CLUSTER_SIZE_BYTES: usize = 5 * 1024 * 1024;
const MAX_CLUSTER_DURATION_MS: i64 = 5_000;

/// A Cluster under construction.
#[derive(Debug)]
pub(crate) struct ClusterBuilder {
    pub timestamp: i64,
    pub blocks: Vec<(i64, SimpleBlock)>,
    size_bytes: usize,
}

impl ClusterBuilder {
    fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            blocks: Vec::new(),
            size_bytes: 0,
        }
    }

    fn push(&mut self, block: &Block, keyframe: bool) {
        let simple_block = SimpleBlock {
            track_number: block.track_number,
            relative_timecode: (block.absolute_timestamp - self.timestamp) as i16,
            keyframe,
            discardable: false,
            lacing: Lacing::None,
            payload: block.payload.clone(),
        };
        self.size_bytes += simple_block.payload.len() + 16;
        self.blocks.push((block.absolute_timestamp, simple_block));
    }

    /// The track number of the first video keyframe in this cluster, used to build the Cues.
    pub fn leading_video_track(&self) -> Option<u64> {
        self.blocks
            .iter()
            .find(|(_, b)| b.keyframe)
            .map(|(_, b)| b.track_number)
    }
}

/// Accepts a time-ordered stream of blocks and partitions it into Clusters.
#[derive(Debug, Default)]
pub(crate) struct ClusterEngine {
    clusters: Vec<ClusterBuilder>,
}

impl ClusterEngine {
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
        }
    }

    /// Accept the next block in merged order. `is_video_keyframe` tells the engine whether
    /// this particular block should be treated as a video keyframe for both the Cluster
    /// boundary policy and the SimpleBlock's own keyframe flag.
    pub fn accept(&mut self, block: Block, is_video_keyframe: bool, track_kind: TrackKind) {
        let starts_new_cluster = match self.clusters.last() {
            None => true,
            Some(current) => {
                let elapsed = block.absolute_timestamp - current.timestamp;
                let would_overflow = current.size_bytes + block.payload.len() + 16
                    > MAX_CLUSTER_SIZE_BYTES;
                let too_old = elapsed >= MAX_CLUSTER_DURATION_MS;
                let video_keyframe_boundary =
                    track_kind == TrackKind::Video && is_video_keyframe;
                would_overflow || too_old || video_keyframe_boundary
            }
        };

        if starts_new_cluster {
            self.clusters.push(ClusterBuilder::new(block.absolute_timestamp));
        }

        let keyframe = track_kind == TrackKind::Video && is_video_keyframe;
        self.clusters.last_mut().unwrap().push(&block, keyframe);
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn into_clusters(self) -> Vec<ClusterBuilder> {
        self.clusters
    }
}
