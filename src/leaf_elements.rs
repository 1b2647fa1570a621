//! Concrete leaf elements, declared via [`crate::leaf::leaf_element`].

use crate::leaf::leaf_element;

// EBML header.
leaf_element!(uint, EbmlVersion, 0x4286, default = 1);
leaf_element!(uint, EbmlReadVersion, 0x42F7, default = 1);
leaf_element!(uint, EbmlMaxIdLength, 0x42F2, default = 4);
leaf_element!(uint, EbmlMaxSizeLength, 0x42F3, default = 8);
leaf_element!(string, DocType, 0x4282);
leaf_element!(uint, DocTypeVersion, 0x4287, default = 1);
leaf_element!(uint, DocTypeReadVersion, 0x4285, default = 1);

// SeekHead / Seek.
leaf_element!(binary, SeekId, 0x53AB);
leaf_element!(uint, SeekPosition, 0x53AC);

// Info.
leaf_element!(binary, SegmentUuid, 0x73A4);
leaf_element!(float, Duration, 0x4489);
leaf_element!(date, DateUtc, 0x4461);
leaf_element!(string, Title, 0x7BA9);
leaf_element!(string, MuxingApp, 0x4D80);
leaf_element!(string, WritingApp, 0x5741);
leaf_element!(uint, TimestampScale, 0x2AD7B1, default = 1_000_000);

// Cluster.
leaf_element!(uint, Timestamp, 0xE7);
leaf_element!(uint, Position, 0xA7);
leaf_element!(uint, PrevSize, 0xAB);

// Tracks / TrackEntry.
leaf_element!(uint, TrackNumber, 0xD7);
leaf_element!(uint, TrackUid, 0x73C5);
leaf_element!(uint, FlagLacing, 0x9C, default = 1);
leaf_element!(uint, DefaultDuration, 0x23E383);
leaf_element!(string, Name, 0x536E);
leaf_element!(string, Language, 0x22B59C, default = "und".to_string());
leaf_element!(binary, CodecPrivate, 0x63A2);
leaf_element!(string, CodecName, 0x258688);

// Video.
leaf_element!(uint, PixelWidth, 0xB0);
leaf_element!(uint, PixelHeight, 0xBA);
leaf_element!(uint, DisplayWidth, 0x54B0);
leaf_element!(uint, DisplayHeight, 0x54BA);

// Audio.
leaf_element!(float, SamplingFrequency, 0xB5, default = 8000.0);
leaf_element!(uint, Channels, 0x9F, default = 1);
leaf_element!(uint, BitDepth, 0x6264);

// Cues.
leaf_element!(uint, CueTime, 0xB3);
leaf_element!(uint, CueTrack, 0xF7);
leaf_element!(uint, CueClusterPosition, 0xF1);

// Tags.
leaf_element!(string, TagName, 0x45A3);
leaf_element!(string, TagString, 0x4487);
leaf_element!(string, TagLanguage, 0x447A, default = "und".to_string());
leaf_element!(uint, TargetTypeValue, 0x68CA, default = 50);
