//! Data types for navigation entries and section tracking.

mod nav;
mod section;

pub use nav::*;
pub use section::*;
