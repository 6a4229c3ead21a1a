//! Seeded random stream used by the generator.
//!
//! Mulberry32: 32 bits of state, one add and two multiply-xorshift rounds per
//! draw. Floats are the raw 32 bit output divided by 2^32, so the same seed
//! yields the same floats on every platform.

use rand::{Error as RandError, RngCore, SeedableRng};

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// A mulberry32 generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_float(&mut self) -> f64 {
        unit_float(self)
    }
}

impl RngCore for Mulberry32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    /// Keeps the low 32 bits, so `seed_from_u64(s)` and `new(s)` agree for
    /// every 32 bit seed.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}

/// Draw a float in [0, 1) from any generator, using exactly one `next_u32`
#[inline]
pub fn unit_float<R>(rng: &mut R) -> f64
where
    R: RngCore + ?Sized,
{
    rng.next_u32() as f64 / TWO_POW_32
}

/// Draw an index in `0..len` as `floor(f * len)`
#[inline]
pub(crate) fn unit_index<R>(rng: &mut R, len: usize) -> usize
where
    R: RngCore + ?Sized,
{
    debug_assert!(len > 0);
    // f < 1 keeps the product strictly below len
    (unit_float(rng) * len as f64) as usize
}

/// Fisher-Yates shuffle driven by `unit_index`
pub(crate) fn shuffle<R, T>(rng: &mut R, items: &mut [T])
where
    R: RngCore + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = unit_index(rng, i + 1);
        items.swap(i, j);
    }
}
