#![deny(bare_trait_objects)]
#![deny(missing_docs)]

//! Roaring Wire is a compact marshaling layer for 32 bit roaring bitmaps
//!
//! - Picks the smaller of two wire encodings (a raw `u32` array or the portable container format)
//! - Serializes into caller provided buffers and deserializes back into live bitmaps
//! - Checked add/remove, bounded optimization and a NaN sentinel select for host boundaries
//!
//! The bitmap itself is supplied by a [`BitmapBackend`], with CRoaring as the default.

#[macro_use]
mod utils;

mod backend;
mod codec;
mod error;
mod mutate;
mod optimize;
mod select;

#[cfg(test)]
mod test;

pub use backend::{BitmapBackend, FrozenBitmap};
pub use codec::{
    choose_format, deserialize, deserialize_frozen, deserialize_or_default, deserialize_portable,
    deserialize_portable_frozen, portable_serialized_size, serialize, serialize_into,
    serialize_portable, serialize_portable_into, serialized_size, try_deserialize, Format,
    MAX_RAW_ARRAY_BYTES,
};
pub use error::{DecodeError, EncodeError};
pub use mutate::{add_checked, remove_checked};
pub use optimize::{optimize, optimize_rounds, MAX_OPTIMIZE_ROUNDS};
pub use select::{create, select, MIN_CAPACITY};
