use crate::backend::BitmapBackend;

/// Add a value to the bitmap.
///
/// Returns true if the value was not already a member. Membership change is judged by
/// cardinality before and after, not by any status the backend reports.
pub fn add_checked<B: BitmapBackend>(bitmap: &mut B, value: u32) -> bool {
    let cardinality = bitmap.cardinality();
    bitmap.add(value);

    cardinality != bitmap.cardinality()
}

/// Remove a value from the bitmap.
///
/// Returns true if the value was a member
pub fn remove_checked<B: BitmapBackend>(bitmap: &mut B, value: u32) -> bool {
    let cardinality = bitmap.cardinality();
    bitmap.remove(value);

    cardinality != bitmap.cardinality()
}
