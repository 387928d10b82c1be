//! Entropy backends behind the strong source.
//!
//! [`EntropySource`] is the seam between the adapter and the platform: one
//! operation that fills a buffer with secure random bytes. [`OsEntropy`] is
//! the production backend. The remaining types are deterministic stand-ins
//! for exercising the adapter without touching the operating system.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::OsRng;
use rand_core::RngCore;

use crate::error::EntropyError;

/// A source of cryptographically-secure random bytes.
///
/// Implementations must be safe to call from many threads at once; the
/// adapter adds no locking of its own.
pub trait EntropySource: Send + Sync {
    /// Performs a single read into `buf` and returns how many bytes were
    /// written.
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError>;

    /// Fills all of `buf` with one read. A short read is an error.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        let filled = self.read(buf)?;
        if filled < buf.len() {
            return Err(EntropyError::ShortRead {
                requested: buf.len(),
                filled,
            });
        }
        Ok(())
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &E {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        (**self).read(buf)
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill(buf)
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Box<E> {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        (**self).read(buf)
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill(buf)
    }
}

impl<E: EntropySource + ?Sized> EntropySource for Arc<E> {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        (**self).read(buf)
    }

    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        (**self).fill(buf)
    }
}

/// Operating-system entropy (`getrandom` and friends) via [`OsRng`].
///
/// On common platforms every read is a system call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(EntropyError::Unavailable)?;
        Ok(buf.len())
    }
}

/// Repeats a fixed byte pattern from its start on every read.
///
/// An empty pattern produces zeroes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedEntropy {
    pattern: Vec<u8>,
}

impl FixedEntropy {
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }
}

impl EntropySource for FixedEntropy {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        if self.pattern.is_empty() {
            buf.fill(0);
        } else {
            buf.iter_mut()
                .zip(self.pattern.iter().cycle())
                .for_each(|(dst, src)| *dst = *src);
        }
        Ok(buf.len())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Failure {
    Unavailable(String),
    Short(usize),
}

/// A backend that never delivers a full buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailingEntropy {
    failure: Failure,
}

impl FailingEntropy {
    /// Every read fails outright with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            failure: Failure::Unavailable(reason.into()),
        }
    }

    /// Every read writes at most `delivered` bytes, and always fewer than
    /// the buffer holds, then reports that count.
    pub fn short(delivered: usize) -> Self {
        Self {
            failure: Failure::Short(delivered),
        }
    }
}

impl EntropySource for FailingEntropy {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        match &self.failure {
            Failure::Unavailable(reason) => Err(EntropyError::Unavailable(rand_core::Error::new(
                reason.clone(),
            ))),
            Failure::Short(delivered) => {
                let filled = (*delivered).min(buf.len().saturating_sub(1));
                buf[..filled].fill(0xA5);
                Ok(filled)
            }
        }
    }
}

/// Counts reads and delivered bytes of the wrapped backend.
#[derive(Debug, Default)]
pub struct CountingEntropy<E> {
    inner: E,
    reads: AtomicU64,
    bytes: AtomicU64,
}

impl<E> CountingEntropy<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            reads: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
        }
    }

    /// Number of read attempts, including failed ones.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of bytes the wrapped backend reported as written.
    pub fn bytes_delivered(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: EntropySource> EntropySource for CountingEntropy<E> {
    fn read(&self, buf: &mut [u8]) -> Result<usize, EntropyError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let filled = self.inner.read(buf)?;
        self.bytes.fetch_add(filled as u64, Ordering::Relaxed);
        Ok(filled)
    }
}
