//! Stateful generators layered over a strong source.
//!
//! [`StrongRand`] turns any uniform generator into the familiar set of
//! variates. [`chacha_from_source`] keys a ChaCha20 stream from fresh draws
//! for callers who need throughput more than per-call entropy.
//!
//! Both take `&mut self` to generate. Give each thread or task its own
//! instance; they can all share a single [`StrongSource`].

use log::debug;
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use zeroize::Zeroize;

use crate::error::VariateError;
use crate::source::{Source64, StrongSource, mask_int63};
use crate::variates;

const CHACHA_SEED_BYTES: usize = 32;

/// A generator driving distribution helpers from an underlying [`RngCore`].
///
/// With the default parameter every value comes straight from operating
/// system entropy.
#[derive(Clone, Debug)]
pub struct StrongRand<R = StrongSource> {
    rng: R,
}

impl StrongRand {
    /// A generator drawing every value from operating-system entropy.
    pub const fn from_source() -> Self {
        Self {
            rng: StrongSource::new(),
        }
    }
}

impl Default for StrongRand {
    fn default() -> Self {
        Self::from_source()
    }
}

impl<R: RngCore> StrongRand<R> {
    /// Wraps `rng`; pass `&source` to share one stateless source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// The wrapped generator.
    pub fn get_ref(&self) -> &R {
        &self.rng
    }

    /// Mutable access to the wrapped generator.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Unwraps the generator.
    pub fn into_inner(self) -> R {
        self.rng
    }

    pub fn uint64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    pub fn uint32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    pub fn int63(&mut self) -> i64 {
        mask_int63(self.rng.next_u64())
    }

    /// Non-negative 31-bit value: the top bits of a 63-bit draw.
    pub fn int31(&mut self) -> i32 {
        (self.int63() >> 32) as i32
    }

    pub fn intn(&mut self, n: u64) -> Result<u64, VariateError> {
        variates::intn(&mut self.rng, n)
    }

    pub fn int63n(&mut self, n: i64) -> Result<i64, VariateError> {
        variates::int63n(&mut self.rng, n)
    }

    pub fn float64(&mut self) -> f64 {
        variates::float64(&mut self.rng)
    }

    pub fn exp_float64(&mut self) -> f64 {
        variates::exp_float64(&mut self.rng)
    }

    pub fn norm_float64(&mut self) -> f64 {
        variates::norm_float64(&mut self.rng)
    }

    pub fn bernoulli(&mut self, p: f64) -> bool {
        variates::bernoulli(&mut self.rng, p)
    }

    pub fn perm(&mut self, n: usize) -> Vec<usize> {
        variates::perm(&mut self.rng, n)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        variates::shuffle(&mut self.rng, items)
    }
}

impl<R: RngCore> RngCore for StrongRand<R> {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore + CryptoRng> CryptoRng for StrongRand<R> {}

/// Keys a ChaCha20 generator from four fresh draws of `source`.
///
/// # Panics
/// Panics if `source` cannot draw entropy.
pub fn chacha_from_source<S: Source64 + ?Sized>(source: &S) -> ChaCha20Rng {
    let mut seed = [0u8; CHACHA_SEED_BYTES];
    for chunk in seed.chunks_exact_mut(8) {
        chunk.copy_from_slice(&source.uint64().to_le_bytes());
    }
    let rng = ChaCha20Rng::from_seed(seed);
    seed.zeroize();
    debug!("keyed ChaCha20 generator from {CHACHA_SEED_BYTES} bytes of source output");
    rng
}
