/// Reasons a buffer was not decoded into a bitmap
///
/// [`deserialize`](crate::deserialize) collapses all of these into `None`.
/// [`try_deserialize`](crate::try_deserialize) reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer has no marker byte
    #[error("empty input")]
    EmptyInput,

    /// The marker byte names no known format. Contains the found value
    #[error("unrecognized format marker: {0}")]
    UnknownMarker(u8),

    /// A raw array buffer too short to hold its cardinality. Contains the buffer length
    #[error("raw array header truncated: {0} bytes")]
    TruncatedHeader(usize),

    /// A raw array buffer describing the empty set.
    ///
    /// Empty sets decode to no bitmap at all rather than an empty one.
    #[error("raw array holds the empty set")]
    EmptySet,

    /// A raw array body shorter than its declared cardinality requires
    #[error("raw array body truncated: expected {expected} bytes, found {actual}")]
    TruncatedBody {
        /// Bytes required by the declared cardinality
        expected: usize,
        /// Bytes present after the header
        actual: usize,
    },

    /// Bytes left over after the declared raw array members. Contains the excess
    #[error("{0} trailing bytes after raw array")]
    TrailingBytes(usize),

    /// Raw array members that repeat or descend, so the set would not hold its declared
    /// cardinality
    #[error("raw array members are not strictly ascending")]
    Unsorted,

    /// The container payload was rejected by the bitmap library
    #[error("invalid container payload")]
    InvalidContainer,
}

/// Reasons a bitmap could not be written into a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The output buffer is smaller than the serialized size
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the encoding requires
        needed: usize,
        /// Bytes available in the output buffer
        available: usize,
    },
}
