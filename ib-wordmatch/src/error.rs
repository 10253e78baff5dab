use thiserror::Error;

/// Errors raised while building a matcher or running a query.
///
/// Construction failures never leave a partially built matcher behind, and
/// query failures never poison one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The config bytes could not be decoded, or a query text is not UTF-8.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The configuration decoded but cannot be compiled into a matcher. The
    /// message names the offending table where one exists.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A state that should be unreachable.
    #[error("internal error: {0}")]
    Internal(String),
}
