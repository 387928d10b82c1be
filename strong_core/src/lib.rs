//! A cryptographically-secure source for generic random generation.
//!
//! [`StrongSource`] draws every value straight from operating-system
//! entropy and exposes it through `rand_core::RngCore`, so the whole `rand`
//! toolbox (ranges, floats, shuffles, `rand_distr`) runs on secure input.
//! There is no internal state: seeding is accepted and ignored, and the
//! source may be shared freely between threads.
//!
//! Generators built on top of it ([`StrongRand`], or a ChaCha20 stream from
//! [`chacha_from_source`]) are ordinary `&mut` values and need one instance
//! per thread.
//!
//! ```no_run
//! use strong_core::{StrongRand, new_source};
//!
//! let src = new_source();
//! let _ = src.int63();
//! let _ = src.uint64();
//!
//! let mut rng = StrongRand::new(&src);
//! let _ = 1 + rng.intn(6).unwrap();
//! let _ = rng.exp_float64() * 1000.0;
//! let _ = 100.0 + rng.norm_float64() * 15.0;
//! ```

pub mod entropy;
pub mod error;
pub mod generator;
pub mod source;
pub mod variates;

pub use crate::entropy::{
    CountingEntropy, EntropySource, FailingEntropy, FixedEntropy, OsEntropy,
};
pub use crate::error::{EntropyError, VariateError};
pub use crate::generator::{StrongRand, chacha_from_source};
pub use crate::source::{INT63_MASK, Source, Source64, StrongSource, mask_int63, new_source};
