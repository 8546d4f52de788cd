//! Test RNG — scripted `RandomSource` implementations for tests.

use taleboard_core::rng::RandomSource;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. With it the generator picks the smallest path counts and
/// lengths and every drawn space is `normal`.
#[derive(Debug, Default)]
pub struct MockRng;

impl RandomSource for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that replays predetermined values.
///
/// Integers are returned verbatim from `values` (the requested range is
/// ignored) and the RNG panics once they run out, so a test notices when the
/// code under test draws more often than scripted. Floats come from an
/// optional second script and fall back to `0.0` when it is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    floats: Vec<f64>,
    float_index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given integer values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            index: 0,
            floats: Vec::new(),
            float_index: 0,
        }
    }

    /// Adds a script of float values returned by `next_f64`.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats;
        self.float_index = 0;
        self
    }

    /// Number of integer values drawn so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl RandomSource for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        let val = self.floats.get(self.float_index).copied().unwrap_or(0.0);
        self.float_index += 1;
        val
    }
}
