//! Errors reported by the rules engine. Both kinds are recoverable: a rejected
//! input never changes the game state and the caller is expected to surface
//! the reason and ask for another input.

/// Convenience alias used throughout [`crate::chess`].
pub type Result<T> = std::result::Result<T, Error>;

#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed or out-of-range square text.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
    /// Any rule violation: wrong turn, geometry, blocked path, exposing own
    /// king, unmet castling/en passant/promotion preconditions.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

impl Error {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalMove(reason.into())
    }
}
