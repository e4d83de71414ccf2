use croaring::{Bitmap, BitmapView, Native, Portable};

use super::BitmapBackend;

/// Summary of the stored representation: (array, run, bitset) container counts and portable size
///
/// CRoaring's `run_optimize` reports whether any run container exists afterwards, not whether
/// anything was converted, so change is detected by comparing the shape before and after.
/// Opposite conversions can leave the counts alone, the portable size catches those.
fn representation(bitmap: &Bitmap) -> ([u32; 3], usize) {
    let stats = bitmap.statistics();

    (
        [
            stats.n_array_containers,
            stats.n_run_containers,
            stats.n_bitset_containers,
        ],
        bitmap.get_serialized_size_in_bytes::<Portable>(),
    )
}

impl BitmapBackend for Bitmap {
    type View<'a> = BitmapView<'a>;

    #[inline]
    fn with_capacity(capacity: u32) -> Self {
        Bitmap::with_container_capacity(capacity)
    }

    #[inline]
    fn of(values: &[u32]) -> Self {
        Bitmap::of(values)
    }

    #[inline]
    fn add(&mut self, value: u32) {
        Bitmap::add(self, value)
    }

    #[inline]
    fn remove(&mut self, value: u32) {
        Bitmap::remove(self, value)
    }

    #[inline]
    fn cardinality(&self) -> u64 {
        Bitmap::cardinality(self)
    }

    fn run_optimize(&mut self) -> bool {
        let before = representation(self);
        Bitmap::run_optimize(self);

        before != representation(self)
    }

    fn shrink_to_fit(&mut self) -> bool {
        // An empty bitmap only releases its reserved container slots, nothing it stores changes
        let empty = Bitmap::is_empty(self);

        Bitmap::shrink_to_fit(self) > 0 && !empty
    }

    #[inline]
    fn select(&self, rank: u32) -> Option<u32> {
        Bitmap::select(self, rank)
    }

    #[inline]
    fn to_vec(&self) -> Vec<u32> {
        Bitmap::to_vec(self)
    }

    #[inline]
    fn portable_size(&self) -> usize {
        self.get_serialized_size_in_bytes::<Portable>()
    }

    fn portable_serialize(&self, out: &mut [u8]) -> usize {
        // croaring only serializes into a Vec, so the encoding is staged and copied into `out`
        let mut encoded = Vec::with_capacity(out.len());
        let bytes = self.serialize_into::<Portable>(&mut encoded);
        out[..bytes.len()].copy_from_slice(bytes);

        bytes.len()
    }

    #[inline]
    fn portable_deserialize(buf: &[u8]) -> Option<Self> {
        Bitmap::try_deserialize::<Portable>(buf)
    }

    #[inline]
    fn native_deserialize(buf: &[u8]) -> Option<Self> {
        Bitmap::try_deserialize::<Native>(buf)
    }

    #[inline]
    unsafe fn portable_view<'a>(buf: &'a [u8]) -> BitmapView<'a>
    where
        Self: 'a,
    {
        BitmapView::deserialize::<Portable>(buf)
    }
}
