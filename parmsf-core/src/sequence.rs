//! Non-repeating pseudo-random sequences from maximum-length shift registers.
//!
//! A Galois linear-feedback shift register with primitive feedback taps
//! cycles through every non-zero state of its width exactly once. Sizing the
//! register to the smallest width that holds `range` and discarding states
//! beyond it yields a permutation of `[0, range)` that repeats after exactly
//! `range` draws.

use crate::error::SequenceError;

/// Feedback masks for maximal-length registers, indexed by `width - 1`.
///
/// Bit `t - 1` is set for every tap `t` of a primitive polynomial of degree
/// `width`.
const LFSR_TAPS: [u64; 64] = [
    /*  1 */ 0x1,
    /*  2 */ 0x3,
    /*  3 */ 0x6,
    /*  4 */ 0xC,
    /*  5 */ 0x14,
    /*  6 */ 0x30,
    /*  7 */ 0x60,
    /*  8 */ 0xB8,
    /*  9 */ 0x110,
    /* 10 */ 0x240,
    /* 11 */ 0x500,
    /* 12 */ 0x829,
    /* 13 */ 0x100D,
    /* 14 */ 0x2015,
    /* 15 */ 0x6000,
    /* 16 */ 0xD008,
    /* 17 */ 0x1_2000,
    /* 18 */ 0x2_0400,
    /* 19 */ 0x4_0023,
    /* 20 */ 0x9_0000,
    /* 21 */ 0x14_0000,
    /* 22 */ 0x30_0000,
    /* 23 */ 0x42_0000,
    /* 24 */ 0xE1_0000,
    /* 25 */ 0x120_0000,
    /* 26 */ 0x200_0023,
    /* 27 */ 0x400_0013,
    /* 28 */ 0x900_0000,
    /* 29 */ 0x1400_0000,
    /* 30 */ 0x2000_0029,
    /* 31 */ 0x4800_0000,
    /* 32 */ 0x8020_0003,
    /* 33 */ 0x1_0008_0000,
    /* 34 */ 0x2_0400_0003,
    /* 35 */ 0x5_0000_0000,
    /* 36 */ 0x8_0100_0000,
    /* 37 */ 0x10_0000_001F,
    /* 38 */ 0x20_0000_0031,
    /* 39 */ 0x44_0000_0000,
    /* 40 */ 0xA0_0014_0000,
    /* 41 */ 0x120_0000_0000,
    /* 42 */ 0x300_000C_0000,
    /* 43 */ 0x630_0000_0000,
    /* 44 */ 0xC00_0003_0000,
    /* 45 */ 0x1B00_0000_0000,
    /* 46 */ 0x3000_0300_0000,
    /* 47 */ 0x4200_0000_0000,
    /* 48 */ 0xC000_0018_0000,
    /* 49 */ 0x1_0080_0000_0000,
    /* 50 */ 0x3_0000_00C0_0000,
    /* 51 */ 0x6_000C_0000_0000,
    /* 52 */ 0x9_0000_0000_0000,
    /* 53 */ 0x18_0030_0000_0000,
    /* 54 */ 0x30_0000_0003_0000,
    /* 55 */ 0x40_0000_4000_0000,
    /* 56 */ 0xC0_0006_0000_0000,
    /* 57 */ 0x102_0000_0000_0000,
    /* 58 */ 0x200_0040_0000_0000,
    /* 59 */ 0x600_0030_0000_0000,
    /* 60 */ 0xC00_0000_0000_0000,
    /* 61 */ 0x1800_3000_0000_0000,
    /* 62 */ 0x3000_0000_0000_0030,
    /* 63 */ 0x6000_0000_0000_0000,
    /* 64 */ 0xD800_0000_0000_0000,
];

/// Full-period permutation of `[0, range)`.
///
/// # Examples
/// ```
/// use parmsf_core::MaxLenSequence;
///
/// let mut sequence = MaxLenSequence::new(0xDEAD_BEEF, 10).expect("valid range");
/// let mut drawn: Vec<u64> = sequence.by_ref().take(10).collect();
/// let first = drawn[0];
/// drawn.sort_unstable();
/// assert_eq!(drawn, (0..10).collect::<Vec<_>>());
/// assert_eq!(sequence.next(), Some(first));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaxLenSequence {
    /// Exclusive upper bound on register states that map to output.
    limit: u64,
    taps: u64,
    state: u64,
}

impl MaxLenSequence {
    /// Creates a sequence over `[0, range)` starting from `seed`.
    ///
    /// # Errors
    /// Returns [`SequenceError::EmptyRange`] when `range == 0` and
    /// [`SequenceError::RangeTooLarge`] when `range + 1` does not fit in the
    /// widest register of the tap table.
    pub fn new(seed: u64, range: u64) -> Result<Self, SequenceError> {
        if range == 0 {
            return Err(SequenceError::EmptyRange);
        }
        let limit = range
            .checked_add(1)
            .ok_or(SequenceError::RangeTooLarge { range })?;
        let width = register_width(limit);
        let taps = *LFSR_TAPS
            .get(width - 1)
            .ok_or(SequenceError::RangeTooLarge { range })?;
        let mask = if width == 64 {
            u64::MAX
        } else {
            (1_u64 << width) - 1
        };
        Ok(Self {
            limit,
            taps,
            state: (seed & mask) | 1,
        })
    }

    /// Returns the size of the permuted range.
    #[must_use]
    pub const fn range(&self) -> u64 {
        self.limit - 1
    }

    /// Draws the next value of the permutation.
    pub fn draw(&mut self) -> u64 {
        loop {
            let feedback = (self.state & 1).wrapping_neg() & self.taps;
            self.state = (self.state >> 1) ^ feedback;
            if self.state < self.limit {
                return self.state - 1;
            }
        }
    }
}

impl Iterator for MaxLenSequence {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.draw())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Smallest register width whose state space reaches `value`, at least 1.
fn register_width(value: u64) -> usize {
    let bits = u64::BITS - (value - 1).leading_zeros();
    bits.max(1) as usize
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::{LFSR_TAPS, MaxLenSequence, register_width};
    use crate::error::SequenceError;

    const SEED: u64 = 0xDEAD_BEEF_FACE_FEED;

    fn assert_permutation(range: u64) {
        let mut sequence = MaxLenSequence::new(SEED, range).expect("valid range");
        let mut seen = HashSet::new();
        let mut first = None;
        for draw in 0..range {
            let value = sequence.draw();
            first.get_or_insert(value);
            assert!(value < range, "value {value} beyond range {range}");
            assert!(seen.insert(value), "value {value} repeated after {draw} draws");
        }
        assert_eq!(Some(sequence.draw()), first, "sequence must wrap to its first value");
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(8)]
    #[case(100)]
    #[case(1_000)]
    #[case(65_535)]
    #[case(100_000)]
    fn visits_every_value_once_then_repeats(#[case] range: u64) {
        assert_permutation(range);
    }

    #[test]
    fn every_small_tap_mask_is_maximal() {
        for width in 1..=20_usize {
            let taps = LFSR_TAPS[width - 1];
            let mut state = 1_u64;
            let mut period = 0_u64;
            loop {
                let feedback = (state & 1).wrapping_neg() & taps;
                state = (state >> 1) ^ feedback;
                period += 1;
                if state == 1 {
                    break;
                }
            }
            assert_eq!(period, (1_u64 << width) - 1, "width {width} is not maximal");
        }
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 2)]
    #[case(5, 3)]
    #[case(1 << 40, 40)]
    #[case((1 << 40) + 1, 41)]
    #[case(u64::MAX, 64)]
    fn register_width_rounds_up(#[case] value: u64, #[case] expected: usize) {
        assert_eq!(register_width(value), expected);
    }

    #[test]
    fn rejects_empty_range() {
        assert_eq!(MaxLenSequence::new(SEED, 0), Err(SequenceError::EmptyRange));
    }

    #[test]
    fn rejects_ranges_without_a_register() {
        assert_eq!(
            MaxLenSequence::new(SEED, u64::MAX),
            Err(SequenceError::RangeTooLarge { range: u64::MAX })
        );
    }

    #[test]
    fn widest_supported_range_initialises() {
        let mut sequence = MaxLenSequence::new(SEED, u64::MAX - 1).expect("fits in 64 bits");
        assert!(sequence.draw() < u64::MAX - 1);
    }
}
