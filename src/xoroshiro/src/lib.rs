use rand::{rngs::OsRng, RngCore};

/// Multiplier used to spread a raw seed across the two state words.
/// Same constant as the reference xoroshiro128+ seeding routine.
const SEED_MIX: u64 = 1_181_783_497_276_652_981;

/// Scale factor mapping a raw `u64` onto [0, 1). (2^-64)
const UNIFORM_SCALE: f64 = 1.0 / 18_446_744_073_709_551_616.0;

/// xoroshiro128+ pseudo-random number generator (Blackman & Vigna).
///
/// Every consumer owns its generator: concurrent callers are expected to
/// `fork()` one child stream per worker rather than share a single state.
///
/// # Invariants
/// The two state words are never both zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoroshiro128 {
    s: [u64; 2],
}

impl Xoroshiro128 {
    /// Instantiate a generator from 128 bits of OS entropy.
    pub fn new() -> Self {
        let mut entropy = OsRng;
        Self::from_words(entropy.next_u64(), entropy.next_u64())
    }

    /// Instantiate a generator from a fixed seed. Identical seeds yield
    /// identical streams (reproducible runs).
    pub fn with_seed(seed: u64) -> Self {
        Self::from_words(seed, 0)
    }

    fn from_words(a: u64, b: u64) -> Self {
        let s0 = SEED_MIX.wrapping_mul(a);
        let s1 = SEED_MIX.wrapping_mul(s0 ^ b);
        let mut rng = Self { s: [s0, s1] };
        if rng.s == [0, 0] {
            // All-zero state would lock the generator on zero forever.
            rng.s = [SEED_MIX, SEED_MIX.wrapping_mul(SEED_MIX)];
        }
        rng
    }

    /// Derive an independent child stream, advancing `self`.
    ///
    /// The child is re-mixed from a fresh output word, so parent and child
    /// do not overlap for any realistic draw count.
    pub fn fork(&mut self) -> Self {
        Self::with_seed(self.next_u64())
    }

    /// Next raw 64-bit output word.
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.s[0];
        let mut s1 = self.s[1];
        let result = s0.wrapping_add(s1);
        s1 ^= s0;
        self.s[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.s[1] = s1.rotate_left(36);
        result
    }

    /// Uniform draw in [0, 1). Strictly less than 1.0.
    pub fn uniform(&mut self) -> f64 {
        self.next_u64() as f64 * UNIFORM_SCALE
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn index(&mut self, bound: usize) -> usize {
        (self.uniform() * bound as f64) as usize
    }
}

impl Default for Xoroshiro128 {
    fn default() -> Self {
        Self::new()
    }
}
