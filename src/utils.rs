/// Assert an internal invariant when the `debug-checks` feature is enabled.
///
/// Compiles to nothing otherwise, the condition is not evaluated.
macro_rules! debug_check {
    ($cond:expr, $($arg:tt)+) => {
        #[cfg(feature = "debug-checks")] {
            assert!($cond, $($arg)+);
        }
    };
}

/// Read a little endian `u32` at `offset`. The caller guarantees the bytes are present
#[inline]
pub(crate) fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);

    u32::from_le_bytes(bytes)
}

/// Check that a slice is strictly ascending
pub(crate) fn is_strictly_ascending(values: &[u32]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_u32_le_at_offset() {
        let buf = [9, 0x78, 0x56, 0x34, 0x12];

        assert_eq!(read_u32_le(&buf, 1), 0x1234_5678);
    }

    #[test]
    fn ascending() {
        assert!(is_strictly_ascending(&[]));
        assert!(is_strictly_ascending(&[1]));
        assert!(is_strictly_ascending(&[1, 2, 1_000_000]));
        assert!(!is_strictly_ascending(&[1, 1]));
        assert!(!is_strictly_ascending(&[5, 3]));
    }
}
