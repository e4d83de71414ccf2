//! Wire encoding for roaring bitmaps
//!
//! Every serialized buffer starts with a one byte marker naming the format of the rest:
//!
//! | Marker | Format      | Body                                                        |
//! |--------|-------------|-------------------------------------------------------------|
//! | 1      | Raw array   | `u32` cardinality, then every member ascending, as `u32`    |
//! | 2      | Container   | The bitmap library's portable container encoding            |
//!
//! All raw array integers are little endian. The serializer picks whichever format is smaller,
//! with raw arrays capped at [`MAX_RAW_ARRAY_BYTES`].
//!
//! # Portable mode
//! The `*_portable` functions skip the marker and always use the library's portable container
//! encoding, for peers that read that encoding directly. An empty bitmap is a valid portable
//! payload, so portable mode has no empty set rule.
//!
//! # Empty sets
//! A raw array with no members decodes to `None`, not to an empty bitmap. Serializing an
//! empty bitmap and deserializing the result therefore yields no bitmap at all.

use crate::backend::{BitmapBackend, FrozenBitmap};
use crate::error::{DecodeError, EncodeError};
use crate::utils::{is_strictly_ascending, read_u32_le};

/// Raw array payloads at or above this many bytes are always written as containers
pub const MAX_RAW_ARRAY_BYTES: u64 = 0x00FF_FFFF;

const MARKER_SIZE: usize = 1;
const CARDINALITY_SIZE: usize = 4;
const VALUE_SIZE: usize = 4;

/// A wire format, identified by the first byte of a serialized buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Format {
    /// Cardinality followed by the sorted members
    RawArray = 1,

    /// The portable container encoding
    Container = 2,
}

impl Format {
    /// The marker byte of this format
    #[inline]
    pub fn marker(self) -> u8 {
        self as u8
    }

    /// Find the format for a marker byte
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            1 => Some(Format::RawArray),
            2 => Some(Format::Container),
            _ => None,
        }
    }

    /// Find the format of a serialized buffer without decoding it
    #[inline]
    pub fn peek(buf: &[u8]) -> Option<Self> {
        buf.first().copied().and_then(Self::from_marker)
    }
}

/// Select the wire format for a bitmap
///
/// # Returns
/// The format and the size of its payload, excluding the marker byte
pub fn choose_format<B: BitmapBackend>(bitmap: &B) -> (Format, usize) {
    let raw = bitmap.cardinality() * VALUE_SIZE as u64 + CARDINALITY_SIZE as u64;
    let portable = bitmap.portable_size();

    let choice = if raw < portable as u64 && raw < MAX_RAW_ARRAY_BYTES {
        (Format::RawArray, raw as usize)
    } else {
        (Format::Container, portable)
    };

    tracing::trace!(format = ?choice.0, raw, portable, "selected wire format");

    choice
}

/// Get the number of bytes [`serialize_into`] will write for `bitmap`, marker included.
///
/// A missing bitmap has a size of 0
pub fn serialized_size<B: BitmapBackend>(bitmap: Option<&B>) -> usize {
    match bitmap {
        Some(bitmap) => choose_format(bitmap).1 + MARKER_SIZE,
        None => 0,
    }
}

/// Serialize a bitmap into `out` using the smaller wire format.
///
/// `out` should be sized with [`serialized_size`]. A missing bitmap writes nothing.
///
/// # Returns
/// The number of bytes written to `out`
pub fn serialize_into<B: BitmapBackend>(
    bitmap: Option<&B>,
    out: &mut [u8],
) -> Result<usize, EncodeError> {
    let bitmap = match bitmap {
        Some(bitmap) => bitmap,
        None => return Ok(0),
    };

    let (format, payload) = choose_format(bitmap);
    let needed = payload + MARKER_SIZE;
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    Ok(write_format(bitmap, format, &mut out[..needed]))
}

/// Serialize a bitmap into a new buffer using the smaller wire format
pub fn serialize<B: BitmapBackend>(bitmap: &B) -> Vec<u8> {
    let (format, payload) = choose_format(bitmap);

    let mut out = vec![0; payload + MARKER_SIZE];
    write_format(bitmap, format, &mut out);

    out
}

/// Write the marker and payload. `out` is exactly the size of both
fn write_format<B: BitmapBackend>(bitmap: &B, format: Format, out: &mut [u8]) -> usize {
    out[0] = format.marker();

    let written = match format {
        Format::RawArray => {
            let values = bitmap.to_vec();
            debug_check!(
                values.len() as u64 == bitmap.cardinality(),
                "Member count {} disagrees with cardinality {}",
                values.len(),
                bitmap.cardinality()
            );

            let (header, body) = out[MARKER_SIZE..].split_at_mut(CARDINALITY_SIZE);
            header.copy_from_slice(&(values.len() as u32).to_le_bytes());

            for (slot, value) in body.chunks_exact_mut(VALUE_SIZE).zip(values.iter()) {
                slot.copy_from_slice(&value.to_le_bytes());
            }

            MARKER_SIZE + CARDINALITY_SIZE + values.len() * VALUE_SIZE
        }
        Format::Container => MARKER_SIZE + bitmap.portable_serialize(&mut out[MARKER_SIZE..]),
    };

    debug_check!(
        written == out.len(),
        "Wrote {} bytes, estimated {}",
        written,
        out.len()
    );

    written
}

/// Deserialize a bitmap, reporting why a buffer was rejected
///
/// # Remarks
/// Container payloads are validated only as far as the bitmap library validates them
pub fn try_deserialize<B: BitmapBackend>(buf: &[u8]) -> Result<B, DecodeError> {
    let (&marker, body) = buf.split_first().ok_or(DecodeError::EmptyInput)?;

    match Format::from_marker(marker) {
        Some(Format::RawArray) => decode_raw_array(buf),
        Some(Format::Container) => B::portable_deserialize(body).ok_or(DecodeError::InvalidContainer),
        None => Err(DecodeError::UnknownMarker(marker)),
    }
}

/// Deserialize a bitmap. Returns `None` for empty sets and for any rejected buffer
pub fn deserialize<B: BitmapBackend>(buf: &[u8]) -> Option<B> {
    match try_deserialize(buf) {
        Ok(bitmap) => Some(bitmap),
        Err(error) => {
            tracing::debug!(%error, len = buf.len(), "rejected serialized bitmap");
            None
        }
    }
}

/// Deserialize a bitmap, substituting an empty one wherever [`deserialize`] returns `None`
pub fn deserialize_or_default<B: BitmapBackend>(buf: &[u8]) -> B {
    deserialize(buf).unwrap_or_else(|| crate::create(0))
}

/// Deserialize a bitmap, borrowing container payloads instead of copying them
///
/// A container buffer (marker 2) becomes a view over the bytes after the marker. Any other
/// buffer is handed whole, marker included, to the library's generic deserializer, which
/// reads the same raw array layout. Unlike [`deserialize`] a raw array empty set yields an
/// empty bitmap here.
///
/// # Safety
/// Container payloads are not validated. The caller must pass a buffer produced by
/// [`serialize`] (or the library) and must not modify it while the result is alive.
pub unsafe fn deserialize_frozen<'a, B: BitmapBackend + 'a>(
    buf: &'a [u8],
) -> Option<FrozenBitmap<'a, B>> {
    let (&marker, body) = match buf.split_first() {
        Some(split) => split,
        None => {
            tracing::debug!("rejected empty frozen buffer");
            return None;
        }
    };

    if marker == Format::Container.marker() {
        return Some(FrozenBitmap::Borrowed(B::portable_view(body)));
    }

    let bitmap = B::native_deserialize(buf);
    if bitmap.is_none() {
        tracing::debug!(marker, len = buf.len(), "rejected frozen buffer");
    }

    bitmap.map(FrozenBitmap::Owned)
}

/// Get the size of the portable encoding of `bitmap`. A missing bitmap has a size of 0
pub fn portable_serialized_size<B: BitmapBackend>(bitmap: Option<&B>) -> usize {
    bitmap.map_or(0, B::portable_size)
}

/// Serialize a bitmap into `out` using the portable encoding, without a marker byte.
///
/// A missing bitmap writes nothing.
///
/// # Returns
/// The number of bytes written to `out`
pub fn serialize_portable_into<B: BitmapBackend>(
    bitmap: Option<&B>,
    out: &mut [u8],
) -> Result<usize, EncodeError> {
    let bitmap = match bitmap {
        Some(bitmap) => bitmap,
        None => return Ok(0),
    };

    let needed = bitmap.portable_size();
    if out.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    Ok(bitmap.portable_serialize(&mut out[..needed]))
}

/// Serialize a bitmap into a new buffer using the portable encoding, without a marker byte
pub fn serialize_portable<B: BitmapBackend>(bitmap: &B) -> Vec<u8> {
    let mut out = vec![0; bitmap.portable_size()];
    let written = bitmap.portable_serialize(&mut out);

    debug_check!(
        written == out.len(),
        "Wrote {} portable bytes, estimated {}",
        written,
        out.len()
    );

    out
}

/// Deserialize a portable encoding written by [`serialize_portable`] or the library.
///
/// Returns `None` for an empty buffer or a payload the library rejects. An encoded empty
/// bitmap yields an empty bitmap.
pub fn deserialize_portable<B: BitmapBackend>(buf: &[u8]) -> Option<B> {
    if buf.is_empty() {
        tracing::debug!("rejected empty portable buffer");
        return None;
    }

    let bitmap = B::portable_deserialize(buf);
    if bitmap.is_none() {
        tracing::debug!(error = %DecodeError::InvalidContainer, len = buf.len(), "rejected portable bitmap");
    }

    bitmap
}

/// Borrow a portable encoding in place. Returns `None` for an empty buffer
///
/// # Safety
/// The payload is not validated. The caller must pass a buffer produced by
/// [`serialize_portable`] (or the library) and must not modify it while the result is alive.
pub unsafe fn deserialize_portable_frozen<'a, B: BitmapBackend + 'a>(
    buf: &'a [u8],
) -> Option<FrozenBitmap<'a, B>> {
    if buf.is_empty() {
        tracing::debug!("rejected empty frozen portable buffer");
        return None;
    }

    Some(FrozenBitmap::Borrowed(B::portable_view(buf)))
}

/// Decode a raw array buffer, marker included
fn decode_raw_array<B: BitmapBackend>(buf: &[u8]) -> Result<B, DecodeError> {
    const HEADER: usize = MARKER_SIZE + CARDINALITY_SIZE;

    if buf.len() == MARKER_SIZE {
        return Err(DecodeError::EmptySet);
    }

    if buf.len() < HEADER {
        return Err(DecodeError::TruncatedHeader(buf.len()));
    }

    let cardinality = read_u32_le(buf, MARKER_SIZE);
    if cardinality == 0 {
        return Err(DecodeError::EmptySet);
    }

    let body = &buf[HEADER..];
    let expected = (cardinality as usize)
        .checked_mul(VALUE_SIZE)
        .ok_or(DecodeError::TruncatedBody {
            expected: usize::MAX,
            actual: body.len(),
        })?;

    if body.len() < expected {
        return Err(DecodeError::TruncatedBody {
            expected,
            actual: body.len(),
        });
    }

    if body.len() > expected {
        return Err(DecodeError::TrailingBytes(body.len() - expected));
    }

    let values: Vec<u32> = body
        .chunks_exact(VALUE_SIZE)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    // Repeats would collapse, leaving fewer members than declared
    if !is_strictly_ascending(&values) {
        return Err(DecodeError::Unsorted);
    }

    Ok(B::of(&values))
}
