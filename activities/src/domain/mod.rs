mod activity;
mod draft;
mod ids;

pub use activity::*;
pub use draft::*;
pub use ids::*;
