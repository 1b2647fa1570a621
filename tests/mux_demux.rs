use webm_stream::prelude::*;

fn vp8_track() -> TrackConfig {
    TrackConfig {
        codec: CodecKind::Vp8,
        kind: TrackKind::Video,
        pixel_width: Some(320),
        pixel_height: Some(240),
        sample_rate: None,
        channels: None,
    }
}

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

fn vp8_frame(keyframe: bool) -> Vec<u8> {
    let tag = if keyframe { 0x00 } else { 0x01 };
    vec![tag, 0, 0, 9, 9]
}

/// The byte offset of the Segment's own body, i.e. where `SeekPosition` values (which are
/// Segment-relative) are measured from.
fn segment_body_offset(bytes: &[u8]) -> usize {
    let (ebml_header, ebml_consumed) = Header::try_decode(bytes).unwrap().unwrap();
    let after_ebml = ebml_consumed + *ebml_header.size as usize;
    let (_, segment_header_consumed) = Header::try_decode(&bytes[after_ebml..]).unwrap().unwrap();
    after_ebml + segment_header_consumed
}

/// Mux two tracks, then feed the resulting bytes back through the incremental demuxer and
/// check that every top-level element round-trips with the data the muxer was given.
#[test]
fn mux_then_demux_round_trip() {
    let mut muxer = Muxer::new(
        vec![vp8_track(), opus_track()],
        MuxerConfig::default(),
    );
    for i in 0..3i64 {
        muxer
            .push_buffer(0, Some(i * 40), None, vp8_frame(i == 0))
            .unwrap();
        muxer
            .push_buffer(1, Some(i * 40), None, vec![0xAA, i as u8])
            .unwrap();
    }
    muxer.end_track(0).unwrap();
    muxer.end_track(1).unwrap();
    let bytes = muxer.finish().unwrap();

    let mut demuxer = Demuxer::new();
    demuxer.push(&bytes);

    let mut elements = Vec::new();
    while let Some(e) = demuxer.next().unwrap() {
        elements.push(e);
    }

    assert!(matches!(elements[0], TopLevelElement::Ebml(_)));
    let seek_head = elements
        .iter()
        .find_map(|e| match e {
            TopLevelElement::SeekHead(s) => Some(s),
            _ => None,
        })
        .expect("SeekHead present");
    assert_eq!(seek_head.seek.len(), 3);

    // Every SeekPosition must actually point at the start of an element whose encoded ID
    // matches the Seek entry's SeekID: the bytes at that Segment-relative offset must begin
    // with the element's own EBML ID.
    let body_offset = segment_body_offset(&bytes);
    for seek in &seek_head.seek {
        let target = body_offset + *seek.seek_position as usize;
        assert!(
            bytes[target..].starts_with(&seek.seek_id.0),
            "SeekPosition {} for ID {:?} doesn't land on that element",
            *seek.seek_position,
            seek.seek_id.0,
        );
    }

    let info = elements
        .iter()
        .find_map(|e| match e {
            TopLevelElement::Info(i) => Some(i),
            _ => None,
        })
        .expect("Info present");
    assert_eq!(*info.timestamp_scale, 1_000_000);

    let tracks = elements
        .iter()
        .find_map(|e| match e {
            TopLevelElement::Tracks(t) => Some(t),
            _ => None,
        })
        .expect("Tracks present");
    assert_eq!(tracks.track_entry.len(), 2);
    let video = tracks
        .track_entry
        .iter()
        .find(|t| matches!(t.track_type, TrackType::Video))
        .expect("video track entry");
    assert_eq!(video.video.as_ref().map(|v| *v.pixel_width), Some(320));
    let audio = tracks
        .track_entry
        .iter()
        .find(|t| matches!(t.track_type, TrackType::Audio))
        .expect("audio track entry");
    assert_eq!(audio.audio.as_ref().map(|a| *a.channels), Some(2));
    assert!(audio.codec_private.is_some());

    let clusters: Vec<_> = elements
        .iter()
        .filter_map(|e| match e {
            TopLevelElement::Cluster(c) => Some(c),
            _ => None,
        })
        .collect();
    assert!(!clusters.is_empty());
    let total_blocks: usize = clusters.iter().map(|c| c.simple_block.len()).sum();
    assert_eq!(total_blocks, 6);
    assert!(clusters[0].simple_block[0].keyframe);

    let cues = elements
        .iter()
        .find_map(|e| match e {
            TopLevelElement::Cues(c) => Some(c),
            _ => None,
        })
        .expect("Cues present");
    assert_eq!(cues.cue_point.len(), clusters.len());
}

#[test]
fn mux_then_demux_one_byte_at_a_time() {
    let mut muxer = Muxer::new(vec![vp8_track()], MuxerConfig::default());
    for i in 0..2i64 {
        muxer
            .push_buffer(0, Some(i * 33), None, vp8_frame(i == 0))
            .unwrap();
    }
    let bytes = muxer.finish().unwrap();

    let mut demuxer = Demuxer::new();
    let mut elements = Vec::new();
    for byte in bytes {
        demuxer.push(&[byte]);
        while let Some(e) = demuxer.next().unwrap() {
            elements.push(e);
        }
    }
    assert!(matches!(elements[0], TopLevelElement::Ebml(_)));
    assert!(elements
        .iter()
        .any(|e| matches!(e, TopLevelElement::Cluster(_))));
}
