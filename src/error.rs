use crate::base::VInt64;

/// Error types for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error, from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid variable-length integer encoding, indicates a vint longer than 8 bytes.
    #[error("Invalid variable-length integer encoding, 8 leading zeros found...")]
    InvalidVInt,

    /// Attempted to read past the end of the buffer.
    #[error("Attempted to read past the end of the buffer")]
    OutOfBounds,

    /// Attempted to read past the end of the buffer during element body decoding.
    #[error("Element body over decode, ID: {0}")]
    OverDecode(VInt64),

    /// Not all bytes were consumed in an element body.
    #[error("Short read: not all bytes were consumed")]
    ShortRead,

    /// Not all bytes were consumed in an element body during element body decoding.
    #[error("Element body under decode, ID: {0}")]
    UnderDecode(VInt64),

    /// Missing element.
    #[error("Missing element, ID: {0}")]
    MissingElement(VInt64),

    /// Duplicate element in a master element.
    #[error("Duplicate element {id} in master element {parent}")]
    DuplicateElement {
        /// The duplicate element ID.
        id: VInt64,
        /// The parent master element ID.
        parent: VInt64,
    },

    /// Element body size is unknown; unknown-size elements are not supported.
    #[error("Element body size is unknown, ID: {0}")]
    ElementBodySizeUnknown(VInt64),

    /// The muxer was asked to emit a SimpleBlock with lacing other than `no_lacing`.
    #[error("Only no_lacing SimpleBlocks can be emitted")]
    UnsupportedLacing,

    /// A track's codec cannot be muxed into WebM (e.g. Vorbis or any non-Opus/VP8/VP9 codec).
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// An Opus track was declared with more than 2 channels.
    #[error("Opus tracks support at most 2 channels, got {0}")]
    TooManyChannels(u8),

    /// A buffer carried neither a presentation nor a decode timestamp.
    #[error("Buffer for track {0} has neither pts nor dts")]
    MissingTimestamp(u64),

    /// A later buffer's absolute timestamp regressed relative to an earlier one on the same track.
    #[error("Non-monotonic timestamp on track {track}: {previous} then {next}")]
    NonMonotonicTimestamp {
        /// The track number.
        track: u64,
        /// The previously emitted absolute timestamp.
        previous: i64,
        /// The offending, smaller timestamp.
        next: i64,
    },

    /// `push_buffer` was called for a track that is not known to the muxer.
    #[error("Unknown track id: {0}")]
    UnknownTrack(u64),

    /// `push_buffer` was called for a track that already reported end-of-stream.
    #[error("Track {0} already ended")]
    TrackEnded(u64),
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
