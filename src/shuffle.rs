//! Seed hashing and the reproducible shuffle behind every deal.
//!
//! Both the hash and the generator are fixed bit-for-bit so that any
//! implementation given the same seed string produces the same permutation.

use rand::RngCore;

/// Hash a seed string to the 32-bit generator seed.
///
/// Java-style `31 * h + c` over UTF-16 code units with 32-bit wrap-around,
/// then the absolute value; a zero hash becomes `1`.
///
/// ```
/// use tabletop_engine::shuffle::hash_seed;
///
/// assert_eq!(hash_seed("abc"), 96354);
/// assert_eq!(hash_seed(""), 1);
/// ```
pub fn hash_seed(seed: &str) -> u32 {
    let h = seed
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    match h.unsigned_abs() {
        0 => 1,
        v => v,
    }
}

/// Mulberry32: a tiny 32-bit generator with a single word of state.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Index in `0..bound` from one generator step: `floor(u / 2^32 * bound)`.
fn scaled_index<R: RngCore + ?Sized>(rng: &mut R, bound: usize) -> usize {
    ((u64::from(rng.next_u32()) * bound as u64) >> 32) as usize
}

/// Fisher–Yates over a copy of `items`, walking from the last index down.
///
/// ```
/// use tabletop_engine::shuffle::seeded_shuffle;
///
/// let once = seeded_shuffle(&[1, 2, 3, 4, 5], 42);
/// let twice = seeded_shuffle(&[1, 2, 3, 4, 5], 42);
/// assert_eq!(once, twice);
/// ```
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: u32) -> Vec<T> {
    let mut rng = Mulberry32::new(seed);
    shuffle_with(items, &mut rng)
}

/// Same walk as [`seeded_shuffle`] with a caller-supplied generator.
pub fn shuffle_with<T: Clone, R: RngCore + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = scaled_index(rng, i + 1);
        out.swap(i, j);
    }
    out
}
