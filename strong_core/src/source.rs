//! The stateless strong source and the capability contract it fulfils.
//!
//! Every draw reads 8 fresh bytes from the entropy backend and decodes them
//! as a little-endian `u64`. The 63-bit variant clears the sign bit of the
//! same draw. Nothing is buffered between calls.

use std::sync::Arc;

use log::{debug, error, trace};
use rand_core::{CryptoRng, RngCore, SeedableRng};
use zeroize::Zeroize;

use crate::entropy::{EntropySource, OsEntropy};
use crate::error::EntropyError;

/// Keeps the low 63 bits of a draw.
pub const INT63_MASK: u64 = (1 << 63) - 1;

const DRAW_BYTES: usize = 8;

/// Clears bit 63 and reinterprets the rest as a non-negative `i64`.
#[inline]
pub const fn mask_int63(value: u64) -> i64 {
    (value & INT63_MASK) as i64
}

/// A generator primitive producing uniform non-negative 63-bit integers.
///
/// `seed` exists for generic code that seeds every generator it is handed.
/// Sources that cannot be seeded implement it as a no-op rather than an
/// error.
pub trait Source {
    fn int63(&self) -> i64;
    fn seed(&self, seed: i64);
}

/// A [`Source`] that can also produce full-width uniform `u64` values.
pub trait Source64: Source {
    fn uint64(&self) -> u64;
}

impl<S: Source + ?Sized> Source for &S {
    fn int63(&self) -> i64 {
        (**self).int63()
    }

    fn seed(&self, seed: i64) {
        (**self).seed(seed)
    }
}

impl<S: Source64 + ?Sized> Source64 for &S {
    fn uint64(&self) -> u64 {
        (**self).uint64()
    }
}

impl<S: Source + ?Sized> Source for Arc<S> {
    fn int63(&self) -> i64 {
        (**self).int63()
    }

    fn seed(&self, seed: i64) {
        (**self).seed(seed)
    }
}

impl<S: Source64 + ?Sized> Source64 for Arc<S> {
    fn uint64(&self) -> u64 {
        (**self).uint64()
    }
}

/// Uniform integers drawn straight from a secure entropy backend.
///
/// The source holds no state besides its backend and is safe to share
/// between threads. Generators layered on top of it (see
/// [`StrongRand`](crate::generator::StrongRand)) are not.
///
/// The infallible draws panic if the backend fails: a silently weaker
/// stream is worse than a crash. Use [`try_uint64`](Self::try_uint64) and
/// [`try_int63`](Self::try_int63) to handle the failure instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrongSource<E = OsEntropy> {
    entropy: E,
}

/// Returns a source backed by operating-system entropy.
pub const fn new_source() -> StrongSource {
    StrongSource::new()
}

impl StrongSource {
    /// A source reading operating-system entropy.
    pub const fn new() -> Self {
        Self {
            entropy: OsEntropy,
        }
    }
}

impl<E> StrongSource<E> {
    /// A source reading from `entropy` instead of the operating system.
    pub const fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// The backend every draw reads from.
    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Gives the backend back.
    pub fn into_entropy(self) -> E {
        self.entropy
    }
}

impl<E: EntropySource> StrongSource<E> {
    /// Draws 8 bytes and decodes them as a little-endian `u64`.
    pub fn try_uint64(&self) -> Result<u64, EntropyError> {
        let mut draw = [0u8; DRAW_BYTES];
        let filled = self.entropy.fill(&mut draw);
        let value = u64::from_le_bytes(draw);
        draw.zeroize();
        filled.map(|()| {
            trace!("drew {DRAW_BYTES} bytes of entropy");
            value
        })
    }

    /// [`try_uint64`](Self::try_uint64) with bit 63 cleared.
    pub fn try_int63(&self) -> Result<i64, EntropyError> {
        self.try_uint64().map(mask_int63)
    }

    /// Fills `dest` directly from the backend.
    pub fn try_fill(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.entropy.fill(dest)
    }

    /// # Panics
    /// Panics if the entropy backend fails or returns a short read.
    pub fn uint64(&self) -> u64 {
        self.try_uint64().unwrap_or_else(|err| fail_fast(err))
    }

    /// # Panics
    /// Panics if the entropy backend fails or returns a short read.
    pub fn int63(&self) -> i64 {
        mask_int63(self.uint64())
    }

    /// # Panics
    /// Panics if the entropy backend fails or returns a short read.
    pub fn fill(&self, dest: &mut [u8]) {
        if let Err(err) = self.try_fill(dest) {
            fail_fast(err);
        }
    }

    /// Accepts and ignores `seed`. The backend is not touched.
    pub fn seed(&self, _seed: i64) {
        debug!("ignoring seed for non-deterministic source");
    }
}

#[cold]
fn fail_fast(err: EntropyError) -> ! {
    error!("entropy draw failed: {err}");
    panic!("strong: failed to draw entropy: {err}");
}

impl<E: EntropySource> Source for StrongSource<E> {
    fn int63(&self) -> i64 {
        Self::int63(self)
    }

    fn seed(&self, seed: i64) {
        Self::seed(self, seed)
    }
}

impl<E: EntropySource> Source64 for StrongSource<E> {
    fn uint64(&self) -> u64 {
        Self::uint64(self)
    }
}

impl<E: EntropySource> RngCore for StrongSource<E> {
    fn next_u32(&mut self) -> u32 {
        (self.uint64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.uint64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.try_fill(dest).map_err(rand_core::Error::new)
    }
}

// The source is stateless, so a shared reference is a complete generator.
impl<E: EntropySource> RngCore for &StrongSource<E> {
    fn next_u32(&mut self) -> u32 {
        (self.uint64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.uint64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.try_fill(dest).map_err(rand_core::Error::new)
    }
}

impl CryptoRng for StrongSource<OsEntropy> {}

impl CryptoRng for &StrongSource<OsEntropy> {}

/// Seeding is accepted and ignored so generic `SeedableRng` call sites work.
impl SeedableRng for StrongSource<OsEntropy> {
    type Seed = [u8; DRAW_BYTES];

    fn from_seed(_seed: Self::Seed) -> Self {
        debug!("ignoring seed for non-deterministic source");
        Self::new()
    }
}
