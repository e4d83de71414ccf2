use crate::backend::BitmapBackend;

/// Smallest container capacity [`create`] will request
pub const MIN_CAPACITY: u32 = 4;

/// Create an empty bitmap. Capacity hints below [`MIN_CAPACITY`] are raised to it
#[inline]
pub fn create<B: BitmapBackend>(capacity: u32) -> B {
    B::with_capacity(capacity.max(MIN_CAPACITY))
}

/// Find the member of a given 0-indexed rank.
///
/// Returns `NaN` if the bitmap has `rank` or fewer members. Every `u32` is exactly
/// representable as an `f64`, so the sentinel never collides with a member.
pub fn select<B: BitmapBackend>(bitmap: &B, rank: u32) -> f64 {
    bitmap.select(rank).map_or(f64::NAN, f64::from)
}
