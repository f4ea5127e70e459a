//! One handler per request shape.
//!
//! Handlers run only after validation passed. They report expected failures
//! through [`Outcome`] and use `Err` solely for [`Fault`]s.

mod create;
mod delete;
mod details;
mod edit;
mod list;
mod update_attendance;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::{
    error::Fault,
    outcome::Outcome,
    ports::UnitOfWork,
    request::RequestShape,
};

pub use create::CreateHandler;
pub use delete::DeleteHandler;
pub use details::DetailsHandler;
pub use edit::EditHandler;
pub use list::ListHandler;
pub use update_attendance::UpdateAttendanceHandler;

pub type HandlerResult<T> = Result<Outcome<T>, Fault>;

pub(crate) const NOT_FOUND: &str = "Activity not found";

/// Business logic for exactly one request shape.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    type Request: RequestShape;

    async fn handle(
        &self,
        request: Self::Request,
        store: &mut dyn UnitOfWork,
    ) -> HandlerResult<<Self::Request as RequestShape>::Output>;
}
