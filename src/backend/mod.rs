use std::fmt;
use std::ops::Deref;

mod croaring_backend;

/// The capabilities the codec and bitmap helpers require from a compressed `u32` set
///
/// Any roaring implementation can satisfy this. The representation is never inspected
/// directly, only through these entry points. [`croaring::Bitmap`] is provided out of the box.
///
/// # Remarks
/// `run_optimize` and `shrink_to_fit` report whether the in memory representation changed.
/// Implementations wrapping a library whose own status flags mean something else must
/// translate them.
pub trait BitmapBackend: Sized {
    /// A bitmap borrowing its containers from a serialized buffer
    type View<'a>: Deref<Target = Self>
    where
        Self: 'a;

    /// Create an empty bitmap with room for `capacity` containers
    fn with_capacity(capacity: u32) -> Self;

    /// Create a bitmap holding the given values, in any order
    fn of(values: &[u32]) -> Self;

    /// Add a value to the set
    fn add(&mut self, value: u32);

    /// Remove a value from the set
    fn remove(&mut self, value: u32);

    /// Number of members
    fn cardinality(&self) -> u64;

    /// Convert containers to run length encoding where it is smaller.
    /// Returns true if any container changed representation
    fn run_optimize(&mut self) -> bool;

    /// Release excess storage. Returns true if any memory was reclaimed
    fn shrink_to_fit(&mut self) -> bool;

    /// The member of the given 0-indexed rank, if `rank < cardinality`
    fn select(&self, rank: u32) -> Option<u32>;

    /// All members in ascending order
    fn to_vec(&self) -> Vec<u32>;

    /// Exact size of the portable container encoding
    fn portable_size(&self) -> usize;

    /// Write the portable container encoding into `out` and return the number of bytes written.
    ///
    /// `out` is at least [`portable_size`](BitmapBackend::portable_size) bytes long
    fn portable_serialize(&self, out: &mut [u8]) -> usize;

    /// Decode the portable container encoding
    fn portable_deserialize(buf: &[u8]) -> Option<Self>;

    /// Decode the library's own non-portable encoding, including its leading marker byte
    fn native_deserialize(buf: &[u8]) -> Option<Self>;

    /// Decode the portable container encoding without copying
    ///
    /// # Safety
    /// `buf` must hold a valid portable encoding. No validation is performed.
    unsafe fn portable_view<'a>(buf: &'a [u8]) -> Self::View<'a>
    where
        Self: 'a;
}

/// A bitmap produced by [`deserialize_frozen`](crate::deserialize_frozen)
///
/// Either borrows its contents from the source buffer or owns a decoded copy.
/// Both variants dereference to the backend bitmap for read access.
pub enum FrozenBitmap<'a, B: BitmapBackend + 'a> {
    /// Zero copy view into the source buffer
    Borrowed(B::View<'a>),

    /// Decoded by the generic deserializer
    Owned(B),
}

impl<'a, B: BitmapBackend + 'a> FrozenBitmap<'a, B> {
    /// Check if the bitmap borrows from its source buffer
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, FrozenBitmap::Borrowed(_))
    }
}

impl<'a, B: BitmapBackend + 'a> Deref for FrozenBitmap<'a, B> {
    type Target = B;

    fn deref(&self) -> &B {
        match self {
            FrozenBitmap::Borrowed(view) => &**view,
            FrozenBitmap::Owned(bitmap) => bitmap,
        }
    }
}

impl<'a, B: BitmapBackend + 'a> fmt::Debug for FrozenBitmap<'a, B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = if self.is_borrowed() { "Borrowed" } else { "Owned" };

        f.debug_struct("FrozenBitmap")
            .field("kind", &kind)
            .field("cardinality", &self.cardinality())
            .finish()
    }
}
