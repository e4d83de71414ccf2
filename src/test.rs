#![cfg(test)]

use std::ops::Range;

use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::backend::BitmapBackend;

const SEED: u64 = 0x0306_0803_0906_0004;

/// Generates `count` random values in the range [min-max). Values are then deduplicated and sorted
pub(crate) fn generate_data(range: Range<u32>, count: usize) -> Vec<u32> {
    let mut rng = SmallRng::seed_from_u64(SEED);

    let mut result = Vec::with_capacity(count);
    while result.len() < count {
        result.push(rng.gen_range(range.clone()));
    }

    result.sort_unstable();
    result.dedup();

    result
}

/// A plain sorted vector standing in for a roaring bitmap
///
/// Optimization results and the portable size can be scripted, which makes round caps and
/// format thresholds testable without building bitmaps with particular container layouts.
///
/// The portable encoding is a `u32` count followed by the values, zero padded up to the
/// scripted size.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ScriptedBitmap {
    values: Vec<u32>,
    capacity: u32,
    portable_size: Option<usize>,
    run_changes: u32,
    shrink_changes: u32,
    run_calls: u32,
}

impl ScriptedBitmap {
    /// Create a bitmap reporting `portable_size` as the size of its container encoding
    pub fn with_portable_size(values: &[u32], portable_size: usize) -> Self {
        let mut bitmap = <Self as BitmapBackend>::of(values);
        bitmap.portable_size = Some(portable_size);

        bitmap
    }

    /// Make the next `run` calls to `run_optimize` and `shrink` calls to `shrink_to_fit` report a change
    pub fn script_changes(&mut self, run: u32, shrink: u32) {
        self.run_changes = run;
        self.shrink_changes = shrink;
    }

    pub fn run_calls(&self) -> u32 {
        self.run_calls
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn encoded_size(&self) -> usize {
        4 + 4 * self.values.len()
    }
}

impl BitmapBackend for ScriptedBitmap {
    type View<'a> = Box<Self>;

    fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn of(values: &[u32]) -> Self {
        let mut values = values.to_vec();
        values.sort_unstable();
        values.dedup();

        Self {
            values,
            ..Self::default()
        }
    }

    fn add(&mut self, value: u32) {
        if let Err(index) = self.values.binary_search(&value) {
            self.values.insert(index, value);
        }
    }

    fn remove(&mut self, value: u32) {
        if let Ok(index) = self.values.binary_search(&value) {
            self.values.remove(index);
        }
    }

    fn cardinality(&self) -> u64 {
        self.values.len() as u64
    }

    fn run_optimize(&mut self) -> bool {
        self.run_calls += 1;

        if self.run_changes > 0 {
            self.run_changes -= 1;
            return true;
        }

        false
    }

    fn shrink_to_fit(&mut self) -> bool {
        if self.shrink_changes > 0 {
            self.shrink_changes -= 1;
            return true;
        }

        false
    }

    fn select(&self, rank: u32) -> Option<u32> {
        self.values.get(rank as usize).copied()
    }

    fn to_vec(&self) -> Vec<u32> {
        self.values.clone()
    }

    fn portable_size(&self) -> usize {
        self.portable_size.unwrap_or_else(|| self.encoded_size())
    }

    fn portable_serialize(&self, out: &mut [u8]) -> usize {
        out[..4].copy_from_slice(&(self.values.len() as u32).to_le_bytes());
        for (slot, value) in out[4..].chunks_exact_mut(4).zip(self.values.iter()) {
            slot.copy_from_slice(&value.to_le_bytes());
        }

        // A scripted size below the encoded size truncates the members instead of padding
        let size = self.portable_size();
        if let Some(padding) = out.get_mut(self.encoded_size()..size) {
            padding.fill(0);
        }

        size
    }

    fn portable_deserialize(buf: &[u8]) -> Option<Self> {
        if buf.len() < 4 {
            return None;
        }

        let count = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        let body = buf.get(4..4 + 4 * count)?;
        let values: Vec<u32> = body
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Some(Self::of(&values))
    }

    fn native_deserialize(buf: &[u8]) -> Option<Self> {
        match buf.split_first() {
            Some((&1, body)) | Some((&2, body)) => Self::portable_deserialize(body),
            _ => None,
        }
    }

    unsafe fn portable_view<'a>(buf: &'a [u8]) -> Box<Self>
    where
        Self: 'a,
    {
        Box::new(Self::portable_deserialize(buf).unwrap_or_default())
    }
}

#[test]
fn generate_data_is_sorted_and_bounded() {
    let data = generate_data(100..5_000, 1_000);

    assert!(!data.is_empty());
    assert!(data.windows(2).all(|w| w[0] < w[1]));
    assert!(data.iter().all(|v| (100..5_000).contains(v)));
    assert_eq!(data, generate_data(100..5_000, 1_000));
}

#[test]
fn scripted_portable_round_trip() {
    let bitmap = ScriptedBitmap::with_portable_size(&[9, 3, 3, 7], 24);
    let mut out = vec![0xFF; 24];

    assert_eq!(bitmap.portable_serialize(&mut out), 24);
    assert_eq!(&out[..4], &3u32.to_le_bytes());
    assert!(out[16..].iter().all(|b| *b == 0));

    let decoded = ScriptedBitmap::portable_deserialize(&out).unwrap();
    assert_eq!(decoded.to_vec(), vec![3, 7, 9]);
}

#[test]
fn scripted_size_below_encoded_size() {
    let bitmap = ScriptedBitmap::with_portable_size(&[3, 7, 9], 8);
    let mut out = vec![0xEE; 8];

    assert_eq!(bitmap.portable_serialize(&mut out), 8);
    assert_eq!(&out[..4], &3u32.to_le_bytes());
    assert_eq!(&out[4..], &3u32.to_le_bytes());
}
