//! Internal testing utilities for the sten crates.

use std::fmt::Debug;
use std::ops::Range;
use std::panic::RefUnwindSafe;

/// Utility for creating table-driven tests.
///
/// Put the data for one case in a `Debug` struct, conventionally named
/// `Case`, build a collection of them and call `cases.test_each` with the
/// test body. Every case runs, panics are caught, and if any case failed the
/// call panics afterwards with the count and debug representations of the
/// failing cases.
///
/// ```
/// use sten_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     len: usize,
///     step: usize,
///     expected: usize,
/// }
///
/// let cases = [
///     Case { len: 16, step: 2, expected: 8 },
///     Case { len: 7, step: 2, expected: 4 },
/// ];
///
/// cases.test_each(|&Case { len, step, expected }| {
///     assert_eq!(len.div_ceil(step), expected);
/// });
/// ```
///
/// Cases, and anything the test closure captures, must be
/// [unwind safe](std::panic::UnwindSafe). Values containing interior
/// mutability should be created inside the closure instead.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case, catching panics.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            if std::panic::catch_unwind(|| test(&case)).is_err() {
                failures.push(case);
            }
        }
        assert_eq!(
            failures.len(),
            0,
            "{} test cases failed: {:?}",
            failures.len(),
            failures
        );
    }
}

/// Seeded xorshift generator for randomized tests.
///
/// Not cryptographically secure. See <https://en.wikipedia.org/wiki/Xorshift>.
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    /// Create a generator. `seed` must be non-zero.
    pub fn new(seed: u64) -> XorShiftRng {
        assert!(seed != 0, "xorshift seed must be non-zero");
        XorShiftRng { state: seed }
    }

    /// Return a random value in the range [0, 2^64).
    pub fn next_u64(&mut self) -> u64 {
        let mut tmp = self.state;
        tmp ^= tmp << 13;
        tmp ^= tmp >> 7;
        tmp ^= tmp << 17;
        self.state = tmp;
        tmp
    }

    /// Return a random value in `range`, which must be non-empty.
    pub fn range(&mut self, range: Range<isize>) -> isize {
        assert!(range.start < range.end, "empty range");
        let span = (range.end - range.start) as u64;
        range.start + (self.next_u64() % span) as isize
    }

    /// Return true with probability 1/2.
    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    /// Return `value` or `None`, each with probability 1/2.
    pub fn maybe<T>(&mut self, value: T) -> Option<T> {
        self.coin().then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{TestCases, XorShiftRng};

    #[test]
    fn test_test_cases_success() {
        #[derive(Debug)]
        struct Case {
            x: i32,
        }

        let cases = [Case { x: 1 }, Case { x: 2 }];
        cases.test_each(|case| _ = case.x);
    }

    #[test]
    #[should_panic(expected = "2 test cases failed")]
    fn test_test_each_failure() {
        #[derive(Debug)]
        struct Case {
            x: i32,
        }

        let cases = [Case { x: 1 }, Case { x: 2 }];
        cases.test_each(|case| {
            _ = case.x;
            panic!("oh no");
        })
    }

    #[test]
    fn test_rng_range() {
        let mut rng = XorShiftRng::new(1234);
        for _ in 0..1000 {
            let x = rng.range(-3..5);
            assert!((-3..5).contains(&x));
        }
    }

    #[test]
    fn test_rng_is_deterministic() {
        let mut a = XorShiftRng::new(42);
        let mut b = XorShiftRng::new(42);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
    }
}
