//! The compile-time EBML/Matroska schema: a closed, static table mapping raw Element IDs to a
//! name and wire [`Kind`]. Unknown IDs are not fatal; callers skip them by declared length.

/// The wire representation of an EBML element body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A container of other elements.
    Master,
    /// A big-endian unsigned integer, 0 to 8 bytes.
    UInt,
    /// A big-endian signed integer, 0 to 8 bytes.
    Int,
    /// An IEEE 754 float, 4 or 8 bytes.
    Float,
    /// A printable ASCII string, zero-padded.
    String,
    /// A UTF-8 string, zero-padded.
    Utf8,
    /// Nanoseconds since 2001-01-01T00:00:00.000000000 UTC, 8 bytes.
    Date,
    /// Opaque binary data.
    Binary,
    /// A padding element whose content is ignored.
    Void,
    /// A CRC-32 checksum of sibling elements.
    Crc32,
    /// An ID this crate's schema does not recognize.
    Unknown,
}

/// A single schema entry: `(raw element ID, name, kind)`.
pub type SchemaEntry = (u64, &'static str, Kind);

/// The static schema table, covering every element this crate decodes or encodes.
pub const SCHEMA: &[SchemaEntry] = &[
    (0x1A45DFA3, "EBML", Kind::Master),
    (0x4286, "EBMLVersion", Kind::UInt),
    (0x42F7, "EBMLReadVersion", Kind::UInt),
    (0x42F2, "EBMLMaxIDLength", Kind::UInt),
    (0x42F3, "EBMLMaxSizeLength", Kind::UInt),
    (0x4282, "DocType", Kind::String),
    (0x4287, "DocTypeVersion", Kind::UInt),
    (0x4285, "DocTypeReadVersion", Kind::UInt),
    (0x18538067, "Segment", Kind::Master),
    (0x114D9B74, "SeekHead", Kind::Master),
    (0x4DBB, "Seek", Kind::Master),
    (0x53AB, "SeekID", Kind::Binary),
    (0x53AC, "SeekPosition", Kind::UInt),
    (0x1549A966, "Info", Kind::Master),
    (0x73A4, "SegmentUUID", Kind::Binary),
    (0x7384, "SegmentFilename", Kind::String),
    (0x2AD7B1, "TimestampScale", Kind::UInt),
    (0x4489, "Duration", Kind::Float),
    (0x4461, "DateUTC", Kind::Date),
    (0x7BA9, "Title", Kind::Utf8),
    (0x4D80, "MuxingApp", Kind::Utf8),
    (0x5741, "WritingApp", Kind::Utf8),
    (0x1654AE6B, "Tracks", Kind::Master),
    (0xAE, "TrackEntry", Kind::Master),
    (0xD7, "TrackNumber", Kind::UInt),
    (0x73C5, "TrackUID", Kind::UInt),
    (0x83, "TrackType", Kind::UInt),
    (0x9C, "FlagLacing", Kind::UInt),
    (0x536E, "Name", Kind::Utf8),
    (0x22B59C, "Language", Kind::String),
    (0x86, "CodecID", Kind::String),
    (0x63A2, "CodecPrivate", Kind::Binary),
    (0x258688, "CodecName", Kind::Utf8),
    (0x23E383, "DefaultDuration", Kind::UInt),
    (0xE0, "Video", Kind::Master),
    (0xB0, "PixelWidth", Kind::UInt),
    (0xBA, "PixelHeight", Kind::UInt),
    (0x54B0, "DisplayWidth", Kind::UInt),
    (0x54BA, "DisplayHeight", Kind::UInt),
    (0x54B2, "DisplayUnit", Kind::UInt),
    (0x9A, "FlagInterlaced", Kind::UInt),
    (0x53B8, "ChromaSitingHorz", Kind::UInt),
    (0x53B9, "ChromaSitingVert", Kind::UInt),
    (0xE1, "Audio", Kind::Master),
    (0xB5, "SamplingFrequency", Kind::Float),
    (0x9F, "Channels", Kind::UInt),
    (0x6264, "BitDepth", Kind::UInt),
    (0x1F43B675, "Cluster", Kind::Master),
    (0xE7, "Timestamp", Kind::UInt),
    (0xA7, "Position", Kind::UInt),
    (0xAB, "PrevSize", Kind::UInt),
    (0xA3, "SimpleBlock", Kind::Binary),
    (0x1C53BB6B, "Cues", Kind::Master),
    (0xBB, "CuePoint", Kind::Master),
    (0xB3, "CueTime", Kind::UInt),
    (0xB7, "CueTrackPositions", Kind::Master),
    (0xF7, "CueTrack", Kind::UInt),
    (0xF1, "CueClusterPosition", Kind::UInt),
    (0x1254C367, "Tags", Kind::Master),
    (0x7373, "Tag", Kind::Master),
    (0x63C0, "Targets", Kind::Master),
    (0x68CA, "TargetTypeValue", Kind::UInt),
    (0x67C8, "SimpleTag", Kind::Master),
    (0x45A3, "TagName", Kind::Utf8),
    (0x447A, "TagLanguage", Kind::String),
    (0x4487, "TagString", Kind::Utf8),
    (0xEC, "Void", Kind::Void),
    (0xBF, "CRC-32", Kind::Crc32),
];

/// Look up an element's schema entry by its raw ID.
pub fn lookup(id: u64) -> Option<&'static SchemaEntry> {
    SCHEMA.iter().find(|(schema_id, _, _)| *schema_id == id)
}

/// The raw IDs of `Ebml` and `Segment`, the two outermost elements of a WebM byte stream.
pub fn is_outermost(id: u64) -> bool {
    id == 0x1A45DFA3 || id == 0x18538067
}

/// Whether `id` is one of the six elements this crate understands as a direct child of `Segment`.
pub fn is_top_level_of_segment(id: u64) -> bool {
    matches!(
        id,
        0x114D9B74 | 0x1549A966 | 0x1654AE6B | 0x1C53BB6B | 0x1254C367 | 0x1F43B675
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        let (_, name, kind) = lookup(0x1F43B675).unwrap();
        assert_eq!(*name, "Cluster");
        assert_eq!(*kind, Kind::Master);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup(0x7F7F7F7F).is_none());
    }

    #[test]
    fn test_is_top_level_of_segment() {
        assert!(is_top_level_of_segment(0x1F43B675));
        assert!(!is_top_level_of_segment(0xAE));
        assert!(!is_top_level_of_segment(0x18538067));
    }
}
