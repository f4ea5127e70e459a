use thiserror::Error;

use crate::{ports::StoreError, request::RequestKind};

/// Failures that are not part of the domain contract.
///
/// These never turn into an [`Outcome`](crate::Outcome); callers translate
/// them into a generic server error.
#[derive(Debug, Error)]
pub enum Fault {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("request was cancelled")]
    Cancelled,
    #[error("no handler registered for {0}")]
    NoHandler(RequestKind),
    #[error("handler for {0} received or produced the wrong shape")]
    ShapeMismatch(RequestKind),
}
