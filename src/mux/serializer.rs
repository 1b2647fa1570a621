//! Assembles the fully-buffered Ebml/Segment element tree for a finished mux session and
//! encodes it to bytes, including computing `CueClusterPosition` offsets.

use crate::codec::{opus_id_header, CodecKind};
use crate::element::Element;
use crate::enums::{
    ChromaSitingHorz, ChromaSitingVert, CodecId, DisplayUnit, FlagInterlaced, TrackType,
};
use crate::functional::Encode;
use crate::leaf_elements::*;
use crate::master::{
    Audio, Cluster, CuePoint, CueTrackPositions, Cues, Info, Seek, SeekHead, Tags, Tracks,
    TrackEntry, Video,
};
use crate::mux::cluster_engine::ClusterBuilder;
use crate::mux::track::{Track, TrackKind};

fn encoded_len<T: Encode>(value: &T) -> crate::Result<usize> {
    let mut buf = Vec::new();
    value.encode(&mut buf)?;
    Ok(buf.len())
}

fn build_track_entry(track: &Track) -> crate::Result<TrackEntry> {
    let codec_id = match track.config.codec {
        CodecKind::Opus => CodecId::Opus,
        CodecKind::Vp8 => CodecId::Vp8,
        CodecKind::Vp9 => CodecId::Vp9,
    };
    let codec_private = if track.config.codec == CodecKind::Opus {
        let channels = track.config.channels.unwrap_or(2);
        let sample_rate = track.config.sample_rate.unwrap_or(48_000);
        Some(CodecPrivate(opus_id_header(channels, sample_rate)?))
    } else {
        None
    };
    let video = if track.kind() == TrackKind::Video {
        Some(Video {
            pixel_width: PixelWidth(track.config.pixel_width.unwrap_or(0) as u64),
            pixel_height: PixelHeight(track.config.pixel_height.unwrap_or(0) as u64),
            display_width: None,
            display_height: None,
            display_unit: DisplayUnit::Pixels,
            flag_interlaced: FlagInterlaced::Progressive,
            chroma_siting_horz: ChromaSitingHorz::default(),
            chroma_siting_vert: ChromaSitingVert::default(),
            ..Default::default()
        })
    } else {
        None
    };
    let audio = if track.kind() == TrackKind::Audio {
        Some(Audio {
            sampling_frequency: SamplingFrequency(track.config.sample_rate.unwrap_or(48_000) as f64),
            channels: Channels(track.config.channels.unwrap_or(2) as u64),
            bit_depth: None,
            ..Default::default()
        })
    } else {
        None
    };

    Ok(TrackEntry {
        crc32: None,
        void: None,
        track_number: TrackNumber(track.track_number),
        track_uid: TrackUid(track.track_number),
        track_type: match track.kind() {
            TrackKind::Video => TrackType::Video,
            TrackKind::Audio => TrackType::Audio,
        },
        flag_lacing: FlagLacing(0),
        name: None,
        language: Language::default(),
        codec_id,
        codec_private,
        codec_name: None,
        default_duration: None,
        video,
        audio,
    })
}

fn build_tracks_element(tracks: &[Track]) -> crate::Result<Tracks> {
    let mut track_entry = Vec::with_capacity(tracks.len());
    for track in tracks {
        track_entry.push(build_track_entry(track)?);
    }
    Ok(Tracks {
        crc32: None,
        void: None,
        track_entry,
    })
}

fn build_cluster_element(builder: &ClusterBuilder) -> Cluster {
    Cluster {
        crc32: None,
        void: None,
        timestamp: Timestamp(builder.timestamp.max(0) as u64),
        position: None,
        prev_size: None,
        simple_block: builder.blocks.iter().map(|(_, b)| b.clone()).collect(),
    }
}

fn seek_id_bytes<T: Element>() -> crate::Result<Vec<u8>> {
    let mut out = Vec::new();
    T::ID.encode(&mut out)?;
    Ok(out)
}

fn build_seek_head(info_offset: u64, tracks_offset: u64, cues_offset: u64) -> crate::Result<SeekHead> {
    let seek = vec![
        Seek {
            crc32: None,
            void: None,
            seek_id: SeekId(seek_id_bytes::<Info>()?),
            seek_position: SeekPosition(info_offset),
        },
        Seek {
            crc32: None,
            void: None,
            seek_id: SeekId(seek_id_bytes::<Tracks>()?),
            seek_position: SeekPosition(tracks_offset),
        },
        Seek {
            crc32: None,
            void: None,
            seek_id: SeekId(seek_id_bytes::<Cues>()?),
            seek_position: SeekPosition(cues_offset),
        },
    ];
    Ok(SeekHead {
        crc32: None,
        void: None,
        seek,
    })
}

fn build_cues(clusters: &[ClusterBuilder], positions: &[u64]) -> Cues {
    let mut cue_point = Vec::with_capacity(clusters.len());
    for (cluster, &position) in clusters.iter().zip(positions) {
        let Some(track_number) = cluster.leading_video_track() else {
            continue;
        };
        cue_point.push(CuePoint {
            crc32: None,
            void: None,
            cue_time: CueTime(cluster.timestamp.max(0) as u64),
            cue_track_positions: vec![CueTrackPositions {
                crc32: None,
                void: None,
                cue_track: CueTrack(track_number),
                cue_cluster_position: CueClusterPosition(position),
            }],
        });
    }
    Cues {
        crc32: None,
        void: None,
        cue_point,
    }
}

/// Assemble and encode the EBML header followed by the Segment for a finished mux session.
pub(crate) fn serialize(
    tracks: &[Track],
    clusters: Vec<ClusterBuilder>,
    timestamp_scale: u64,
) -> crate::Result<Vec<u8>> {
    let ebml = crate::master::Ebml {
        crc32: None,
        void: None,
        ebml_version: Some(EbmlVersion(1)),
        ebml_read_version: Some(EbmlReadVersion(1)),
        ebml_max_id_length: EbmlMaxIdLength(4),
        ebml_max_size_length: EbmlMaxSizeLength(8),
        doc_type: Some(DocType("webm".to_string())),
        doc_type_version: Some(DocTypeVersion(4)),
        doc_type_read_version: Some(DocTypeReadVersion(2)),
    };

    let info = Info {
        crc32: None,
        void: None,
        segment_uuid: None,
        timestamp_scale: TimestampScale(timestamp_scale),
        duration: None,
        date_utc: None,
        title: None,
        muxing_app: MuxingApp("webm-stream".to_string()),
        writing_app: WritingApp("webm-stream".to_string()),
    };

    let tracks_element = build_tracks_element(tracks)?;
    let cluster_elements: Vec<Cluster> = clusters.iter().map(build_cluster_element).collect();

    let info_len = encoded_len(&info)?;
    let tracks_len = encoded_len(&tracks_element)?;
    let tags: Vec<Tags> = Vec::new();
    let tags_len =
        tags.iter().try_fold(0usize, |acc, t| Ok::<_, crate::Error>(acc + encoded_len(t)?))?;

    // Segment writes its children as SeekHead, Info, Tracks, Tags, Cluster*, Cues (see
    // Segment::encode_body). SeekHead positions are Segment-relative, so we need the
    // header's own encoded length before we can compute them. Measure a zeroed placeholder
    // first; its width is stable for any mux of reasonable length, so the final SeekHead
    // built from real offsets below ends up the same size.
    let seek_head_placeholder = build_seek_head(0, 0, 0)?;
    let seek_head_len = encoded_len(&seek_head_placeholder)?;

    let info_offset = seek_head_len as u64;
    let tracks_offset = info_offset + info_len as u64;
    let tags_offset = tracks_offset + tracks_len as u64;
    let clusters_start = tags_offset + tags_len as u64;

    let mut cluster_offsets = Vec::with_capacity(cluster_elements.len());
    let mut running = clusters_start;
    for cluster in &cluster_elements {
        cluster_offsets.push(running);
        running += encoded_len(cluster)? as u64;
    }
    // Cues is written immediately after the last Cluster.
    let cues_offset = running;

    let seek_head = build_seek_head(info_offset, tracks_offset, cues_offset)?;
    let cues = build_cues(&clusters, &cluster_offsets);

    let segment = crate::master::Segment {
        crc32: None,
        void: None,
        info,
        seek_head: vec![seek_head],
        tracks: vec![tracks_element],
        cues: vec![cues],
        tags,
        cluster: cluster_elements,
    };

    let mut out = Vec::new();
    ebml.encode(&mut out)?;
    segment.encode(&mut out)?;
    Ok(out)
}
