use crate::Error;
use crate::base::*;
use crate::block::SimpleBlock;
use crate::element::*;
use crate::enums::*;
use crate::functional::*;
use crate::leaf_elements::*;
use crate::supplement::*;

// A helper for generating nested elements.
/* example:
nested! {
    required: [ EbmlMaxIdLength, EbmlMaxSizeLength ],
    optional: [ EbmlVersion, EbmlReadVersion, DocType, DocTypeVersion, DocTypeReadVersion ],
    multiple: [ ],
};
*/
macro_rules! nested {
    (required: [$($required:ident),*$(,)?], optional: [$($optional:ident),*$(,)?], multiple: [$($multiple:ident),*$(,)?],) => {
        paste::paste! {
            fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
                let crc32 = Option::<Crc32>::decode(buf).ok().flatten();
                $( let mut [<$required:snake>] = None;)*
                $( let mut [<$optional:snake>] = None;)*
                $( let mut [<$multiple:snake>] = Vec::new();)*
                let mut void: Option<Void> = None;

                while let Ok(Some(header)) = Option::<Header>::decode(buf) {
                    match header.id {
                        $( $required::ID => {
                            if [<$required:snake>].is_some() {
                                return Err(Error::DuplicateElement { id: header.id, parent: Self::ID });
                            } else {
                                [<$required:snake>] = Some($required::decode_element(&header, buf)?)
                            }
                        } )*
                        $( $optional::ID => {
                            if [<$optional:snake>].is_some() {
                                return Err(Error::DuplicateElement { id: header.id, parent: Self::ID });
                            } else {
                                [<$optional:snake>] = Some($optional::decode_element(&header, buf)?)
                            }
                        } )*
                        $( $multiple::ID => {
                            [<$multiple:snake>].push($multiple::decode_element(&header, buf)?);
                        } )*
                        Void::ID => {
                            let v = Void::decode_element(&header, buf)?;
                            if let Some(previous) = void {
                                void = Some(Void { size: previous.size + v.size });
                            } else {
                                void = Some(v);
                            }
                            log::info!("Skipping Void element in Element {}, size: {}B", Self::ID, *header.size);
                        }
                        _ => {
                            buf.advance(*header.size as usize);
                            log::warn!("Unknown element {}({}b) in Element({})", header.id, *header.size, Self::ID);
                        }
                    }
                }

                if buf.has_remaining() {
                    return Err(Error::ShortRead);
                }

                Ok(Self {
                    crc32,
                    $( [<$required:snake>]: [<$required:snake>].or(if $required::HAS_DEFAULT_VALUE { Some($required::default()) } else { None }).ok_or(Error::MissingElement($required::ID))?, )*
                    $( [<$optional:snake>], )*
                    $( [<$multiple:snake>], )*
                    void,
                })
            }
            fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
                self.crc32.encode(buf)?;

                $( self.[<$required:snake>].encode(buf)?; )*
                $( self.[<$optional:snake>].encode(buf)?; )*
                $( self.[<$multiple:snake>].encode(buf)?; )*

                self.void.encode(buf)?;

                Ok(())
            }
        }
    };
}

/// EBML element, the first top-level element in a Matroska file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ebml {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// EBMLVersion element, indicates the version of EBML used.
    pub ebml_version: Option<EbmlVersion>,
    /// EBMLReadVersion element, indicates the minimum version of EBML required to read the file.
    pub ebml_read_version: Option<EbmlReadVersion>,
    /// EBMLMaxIDLength element, indicates the maximum length of an EBML ID in bytes.
    pub ebml_max_id_length: EbmlMaxIdLength,
    /// EBMLMaxSizeLength element, indicates the maximum length of an EBML size in bytes.
    pub ebml_max_size_length: EbmlMaxSizeLength,
    /// DocType element, indicates the type of document. For WebM files, this is "webm".
    pub doc_type: Option<DocType>,
    /// DocTypeVersion element, indicates the version of the document type.
    pub doc_type_version: Option<DocTypeVersion>,
    /// DocTypeReadVersion element, indicates the minimum version of the document type required to read the file.
    pub doc_type_read_version: Option<DocTypeReadVersion>,
}

impl Element for Ebml {
    const ID: VInt64 = VInt64::from_encoded(0x1A45_DFA3);
    nested! {
        required: [ EbmlMaxIdLength, EbmlMaxSizeLength ],
        optional: [ EbmlVersion, EbmlReadVersion, DocType, DocTypeVersion, DocTypeReadVersion ],
        multiple: [ ],
    }
}

/// The Root Element that contains all other Top-Level Elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Contains general information about the Segment.
    pub info: Info,
    /// Contains seeking information of Top-Level Elements.
    pub seek_head: Vec<SeekHead>,
    /// A Top-Level Element describing the Segment's tracks.
    pub tracks: Vec<Tracks>,
    /// A Top-Level Element to speed seeking access.
    pub cues: Vec<Cues>,
    /// Element containing metadata describing Tracks, Editions, Chapters, Attachments, or the Segment as a whole.
    pub tags: Vec<Tags>,
    /// The Top-Level Element containing the (monolithic) Block structure.
    pub cluster: Vec<Cluster>,
}

impl Element for Segment {
    const ID: VInt64 = VInt64::from_encoded(0x18538067);

    // Segment can't use the `nested!` macro: the macro always encodes `required` fields
    // before `multiple` fields, but the wire order here (SeekHead, Info, Tracks, Tags,
    // Cluster*, Cues) puts a `multiple` element (SeekHead) ahead of the `required` one
    // (Info). Decode order doesn't matter (children are dispatched by ID as they're seen),
    // so only `encode_body` needs to differ from what the macro would generate.
    fn decode_body(buf: &mut &[u8]) -> crate::Result<Self> {
        let crc32 = Option::<Crc32>::decode(buf).ok().flatten();
        let mut info = None;
        let mut seek_head = Vec::new();
        let mut tracks = Vec::new();
        let mut cues = Vec::new();
        let mut tags = Vec::new();
        let mut cluster = Vec::new();
        let mut void: Option<Void> = None;

        while let Ok(Some(header)) = Option::<Header>::decode(buf) {
            match header.id {
                Info::ID => {
                    if info.is_some() {
                        return Err(Error::DuplicateElement {
                            id: header.id,
                            parent: Self::ID,
                        });
                    } else {
                        info = Some(Info::decode_element(&header, buf)?)
                    }
                }
                SeekHead::ID => {
                    seek_head.push(SeekHead::decode_element(&header, buf)?);
                }
                Tracks::ID => {
                    tracks.push(Tracks::decode_element(&header, buf)?);
                }
                Cues::ID => {
                    cues.push(Cues::decode_element(&header, buf)?);
                }
                Tags::ID => {
                    tags.push(Tags::decode_element(&header, buf)?);
                }
                Cluster::ID => {
                    cluster.push(Cluster::decode_element(&header, buf)?);
                }
                Void::ID => {
                    let v = Void::decode_element(&header, buf)?;
                    if let Some(previous) = void {
                        void = Some(Void {
                            size: previous.size + v.size,
                        });
                    } else {
                        void = Some(v);
                    }
                    log::info!(
                        "Skipping Void element in Element {}, size: {}B",
                        Self::ID,
                        *header.size
                    );
                }
                _ => {
                    buf.advance(*header.size as usize);
                    log::warn!(
                        "Unknown element {}({}b) in Element({})",
                        header.id,
                        *header.size,
                        Self::ID
                    );
                }
            }
        }

        if buf.has_remaining() {
            return Err(Error::ShortRead);
        }

        Ok(Self {
            crc32,
            void,
            info: info.ok_or(Error::MissingElement(Info::ID))?,
            seek_head,
            tracks,
            cues,
            tags,
            cluster,
        })
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> crate::Result<()> {
        self.crc32.encode(buf)?;
        self.seek_head.encode(buf)?;
        self.info.encode(buf)?;
        self.tracks.encode(buf)?;
        self.tags.encode(buf)?;
        self.cluster.encode(buf)?;
        self.cues.encode(buf)?;
        self.void.encode(buf)?;
        Ok(())
    }
}

/// Contains seeking information of Top-Level Elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeekHead {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Contains a single seek entry to an EBML Element.
    pub seek: Vec<Seek>,
}

impl Element for SeekHead {
    const ID: VInt64 = VInt64::from_encoded(0x114D9B74);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ Seek ],
    }
}

/// Contains a single seek entry to an EBML Element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seek {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// The binary EBML ID of a Top-Level Element.
    pub seek_id: SeekId,
    /// The Segment Position of a Top-Level Element.
    pub seek_position: SeekPosition,
}

impl Element for Seek {
    const ID: VInt64 = VInt64::from_encoded(0x4DBB);
    nested! {
      required: [ SeekId, SeekPosition ],
      optional: [ ],
      multiple: [ ],
    }
}

/// Contains general information about the Segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// A randomly generated unique ID to identify the Segment amongst many others (128 bits).
    pub segment_uuid: Option<SegmentUuid>,
    /// Base unit for Segment Ticks and Track Ticks, in nanoseconds.
    pub timestamp_scale: TimestampScale,
    /// Duration of the Segment, expressed in Segment Ticks which is based on TimestampScale.
    pub duration: Option<Duration>,
    /// The date and time that the Segment was created by the muxing application or library.
    pub date_utc: Option<DateUtc>,
    /// General name of the Segment.
    pub title: Option<Title>,
    /// Muxing application or library (example: "libmatroska-0.4.3").
    pub muxing_app: MuxingApp,
    /// Writing application (example: "mkvmerge-0.3.3").
    pub writing_app: WritingApp,
}

impl Element for Info {
    const ID: VInt64 = VInt64::from_encoded(0x1549A966);
    nested! {
      required: [ TimestampScale, MuxingApp, WritingApp ],
      optional: [ SegmentUuid, Duration, DateUtc, Title ],
      multiple: [ ],
    }
}

/// A Top-Level Element of information describing every track in the Segment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracks {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Describes a track with all elements.
    pub track_entry: Vec<TrackEntry>,
}

impl Element for Tracks {
    const ID: VInt64 = VInt64::from_encoded(0x1654AE6B);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ TrackEntry ],
    }
}

/// Describes a single track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEntry {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// The track number as used in the Block Header.
    pub track_number: TrackNumber,
    /// A unique ID to identify this track.
    pub track_uid: TrackUid,
    /// A set of track types coded on 8 bits.
    pub track_type: TrackType,
    /// Set to 1 if the lacing is used.
    pub flag_lacing: FlagLacing,
    /// Human-readable track name.
    pub name: Option<Name>,
    /// Specifies the language of the track.
    pub language: Language,
    /// An ID corresponding to the codec.
    pub codec_id: CodecId,
    /// Private data only known to the codec.
    pub codec_private: Option<CodecPrivate>,
    /// Human-readable string specifying the codec.
    pub codec_name: Option<CodecName>,
    /// Number of nanoseconds per frame.
    pub default_duration: Option<DefaultDuration>,
    /// Video settings, present for video tracks.
    pub video: Option<Video>,
    /// Audio settings, present for audio tracks.
    pub audio: Option<Audio>,
}

impl Element for TrackEntry {
    const ID: VInt64 = VInt64::from_encoded(0xAE);
    nested! {
      required: [ TrackNumber, TrackUid, TrackType, FlagLacing, Language, CodecId ],
      optional: [ Name, CodecPrivate, CodecName, DefaultDuration, Video, Audio ],
      multiple: [ ],
    }
}

/// Video settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Video {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Width of the encoded video frames in pixels.
    pub pixel_width: PixelWidth,
    /// Height of the encoded video frames in pixels.
    pub pixel_height: PixelHeight,
    /// Width of the video frames to display.
    pub display_width: Option<DisplayWidth>,
    /// Height of the video frames to display.
    pub display_height: Option<DisplayHeight>,
    /// How DisplayWidth/DisplayHeight are interpreted.
    pub display_unit: DisplayUnit,
    /// Whether the video is interlaced.
    pub flag_interlaced: FlagInterlaced,
    /// How chroma is subsampled horizontally.
    pub chroma_siting_horz: ChromaSitingHorz,
    /// How chroma is subsampled vertically.
    pub chroma_siting_vert: ChromaSitingVert,
}

impl Element for Video {
    const ID: VInt64 = VInt64::from_encoded(0xE0);
    nested! {
      required: [ PixelWidth, PixelHeight, DisplayUnit, FlagInterlaced, ChromaSitingHorz, ChromaSitingVert ],
      optional: [ DisplayWidth, DisplayHeight ],
      multiple: [ ],
    }
}

/// Audio settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Audio {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Sampling frequency in Hz.
    pub sampling_frequency: SamplingFrequency,
    /// Numbers of channels in the track.
    pub channels: Channels,
    /// Bits per sample, mostly used for PCM.
    pub bit_depth: Option<BitDepth>,
}

impl Element for Audio {
    const ID: VInt64 = VInt64::from_encoded(0xE1);
    nested! {
      required: [ SamplingFrequency, Channels ],
      optional: [ BitDepth ],
      multiple: [ ],
    }
}

/// The Top-Level Element containing the (monolithic) Block structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cluster {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Absolute timestamp of the cluster, expressed in Segment Ticks which is based on TimestampScale.
    pub timestamp: Timestamp,
    /// The Segment Position of the Cluster in the Segment (0 in live streams).
    pub position: Option<Position>,
    /// Size of the previous Cluster, in octets.
    pub prev_size: Option<PrevSize>,
    /// The Blocks in this Cluster, in file order.
    pub simple_block: Vec<SimpleBlock>,
}

impl Element for Cluster {
    const ID: VInt64 = VInt64::from_encoded(0x1F43B675);
    nested! {
      required: [ Timestamp ],
      optional: [ Position, PrevSize ],
      multiple: [ SimpleBlock ],
    }
}

/// A Top-Level Element to speed seeking access.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cues {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// A single Cue entry.
    pub cue_point: Vec<CuePoint>,
}

impl Element for Cues {
    const ID: VInt64 = VInt64::from_encoded(0x1C53BB6B);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ CuePoint ],
    }
}

/// Contains all information relative to a seek point in the Segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuePoint {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Absolute timestamp according to the Segment time base.
    pub cue_time: CueTime,
    /// The track/position combinations for this seek point.
    pub cue_track_positions: Vec<CueTrackPositions>,
}

impl Element for CuePoint {
    const ID: VInt64 = VInt64::from_encoded(0xBB);
    nested! {
      required: [ CueTime ],
      optional: [ ],
      multiple: [ CueTrackPositions ],
    }
}

/// Contains positioning information for one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrackPositions {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// The track for which a position is given.
    pub cue_track: CueTrack,
    /// The Segment Position of the Cluster containing the associated Block.
    pub cue_cluster_position: CueClusterPosition,
}

impl Element for CueTrackPositions {
    const ID: VInt64 = VInt64::from_encoded(0xB7);
    nested! {
      required: [ CueTrack, CueClusterPosition ],
      optional: [ ],
      multiple: [ ],
    }
}

/// Element containing metadata describing Tracks, Editions, Chapters, Attachments, or the Segment as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// A single metadata descriptor.
    pub tag: Vec<Tag>,
}

impl Element for Tags {
    const ID: VInt64 = VInt64::from_encoded(0x1254C367);
    nested! {
      required: [ ],
      optional: [ ],
      multiple: [ Tag ],
    }
}

/// A single metadata descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// Specifies which other elements the metadata represented by the Tag applies to.
    pub targets: Targets,
    /// Contains general information about the target.
    pub simple_tag: Vec<SimpleTag>,
}

impl Element for Tag {
    const ID: VInt64 = VInt64::from_encoded(0x7373);
    nested! {
      required: [ Targets ],
      optional: [ ],
      multiple: [ SimpleTag ],
    }
}

/// Specifies which other elements the metadata represented by a Tag applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Targets {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// A number to indicate the logical level of the target.
    pub target_type_value: TargetTypeValue,
}

impl Element for Targets {
    const ID: VInt64 = VInt64::from_encoded(0x63C0);
    nested! {
      required: [ TargetTypeValue ],
      optional: [ ],
      multiple: [ ],
    }
}

/// Contains general information about the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleTag {
    /// Optional CRC-32 element for integrity checking.
    pub crc32: Option<Crc32>,
    /// void element, useful for reserving space during writing.
    pub void: Option<Void>,

    /// The name of the Tag.
    pub tag_name: TagName,
    /// Specifies the language of the tag.
    pub tag_language: TagLanguage,
    /// The value of the Tag.
    pub tag_string: Option<TagString>,
}

impl Element for SimpleTag {
    const ID: VInt64 = VInt64::from_encoded(0x67C8);
    nested! {
      required: [ TagName, TagLanguage ],
      optional: [ TagString ],
      multiple: [ ],
    }
}
