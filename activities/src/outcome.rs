use std::fmt;

use serde::Serialize;
use strum::Display;

/// Classification attached to a failed [`Outcome`].
///
/// The HTTP layer uses this to pick a status code. Failures without a code
/// (for example a write that affected no rows) are plain bad requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    #[strum(serialize = "not found")]
    NotFound,
    #[strum(serialize = "validation failed")]
    ValidationFailed,
}

/// The reason an operation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    reason: String,
    code: Option<FailureCode>,
}

impl Failure {
    pub fn new(reason: impl Into<String>, code: Option<FailureCode>) -> Self {
        Self {
            reason: reason.into(),
            code,
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn code(&self) -> Option<FailureCode> {
        self.code
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({})", self.reason, code),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Uniform result of every handler and of the dispatcher.
///
/// Exactly one of value or failure exists; there is no way to build an
/// outcome holding both or neither, and nothing mutates it after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// A failure without classification.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure(Failure::new(reason, None))
    }

    pub fn failure_with(reason: impl Into<String>, code: FailureCode) -> Self {
        Self::Failure(Failure::new(reason, Some(code)))
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::failure_with(reason, FailureCode::NotFound)
    }

    pub fn validation_failed(reason: impl Into<String>) -> Self {
        Self::failure_with(reason, FailureCode::ValidationFailed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.failure_ref().map(Failure::reason)
    }

    pub fn code(&self) -> Option<FailureCode> {
        self.failure_ref().and_then(Failure::code)
    }

    pub fn failure_ref(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}
