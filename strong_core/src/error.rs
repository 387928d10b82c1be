use thiserror::Error;

/// Failure to obtain entropy from the underlying secure source.
///
/// There is a single failure kind with two shapes: the source refused to
/// produce bytes, or it produced fewer than were asked for. Neither is
/// retried.
#[derive(Debug, Error)]
pub enum EntropyError {
    #[error("entropy source unavailable: {0}")]
    Unavailable(#[source] rand_core::Error),

    #[error("short entropy read: requested {requested} bytes, received {filled}")]
    ShortRead { requested: usize, filled: usize },
}

/// Invalid arguments to a bounded variate.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VariateError {
    #[error("empty sampling range: upper bound {bound} must be positive")]
    EmptyRange { bound: i128 },
}
