pub(crate) mod activities;
pub(crate) mod error;
pub(crate) mod extract;

pub(crate) use error::ApiError;
