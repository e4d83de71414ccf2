use crate::backend::BitmapBackend;

/// Upper bound on compression rounds performed by [`optimize`]
pub const MAX_OPTIMIZE_ROUNDS: u32 = 4;

/// Compress the bitmap until its representation stops changing.
///
/// Each round applies run length optimization then shrinks storage. Rounds stop at the first
/// one that changes nothing, or after [`MAX_OPTIMIZE_ROUNDS`].
///
/// Returns true if any round changed the bitmap
#[inline]
pub fn optimize<B: BitmapBackend>(bitmap: &mut B) -> bool {
    optimize_rounds(bitmap).0
}

/// Same as [`optimize`], additionally returning the number of rounds performed
pub fn optimize_rounds<B: BitmapBackend>(bitmap: &mut B) -> (bool, u32) {
    let mut changed = false;
    let mut rounds = 0;

    while rounds < MAX_OPTIMIZE_ROUNDS {
        rounds += 1;

        // Both steps run every round
        let ran = bitmap.run_optimize();
        let shrunk = bitmap.shrink_to_fit();

        if !(ran || shrunk) {
            break;
        }

        changed = true;
    }

    debug_check!(
        rounds <= MAX_OPTIMIZE_ROUNDS,
        "Optimized for {} rounds",
        rounds
    );
    tracing::trace!(rounds, changed, "optimized bitmap");

    (changed, rounds)
}
