//! Request mediation core for the activities backend.
//!
//! Callers build a typed request ([`ListActivities`], [`CreateActivity`], ...)
//! and hand it to the [`Dispatcher`]. The dispatcher looks the request kind up
//! in its registry, runs the declared validation rules, and only then opens a
//! unit of work on the [`ActivityStore`] and invokes the matching handler.
//!
//! Expected failures (validation, not-found, writes that touched nothing) come
//! back as [`Outcome::Failure`]. Infrastructure problems come back as a
//! [`Fault`] in the `Err` side and are never folded into an outcome.

pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod outcome;
pub mod ports;
pub mod request;
pub mod store;
pub mod validation;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use domain::{
    Activity, ActivityDraft, ActivityId, Attendance, AttendanceChange, Attendee, UserId,
};
pub use error::Fault;
pub use outcome::{Failure, FailureCode, Outcome};
pub use ports::{ActivityStore, ApplyFields, StoreError, UnitOfWork};
pub use request::{
    ActivityDetails, CreateActivity, DeleteActivity, EditActivity, ListActivities, Request,
    RequestKind, RequestShape, Response, UpdateAttendance,
};
pub use store::InMemoryActivityStore;
