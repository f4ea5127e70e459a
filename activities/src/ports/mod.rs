mod mapper;
mod store;

pub use mapper::*;
pub use store::*;
