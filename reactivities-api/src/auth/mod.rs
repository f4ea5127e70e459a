mod extractor;
mod policy;

pub use extractor::{ActingUser, USER_ID_HEADER};
pub use policy::{HostPolicy, StoreHostPolicy};
