//! Trait definitions for Cloud Controller operations.
//!
//! Each resource type implements the traits its endpoints support.

mod get;
mod list;
mod resource;

pub use get::Get;
pub use list::List;
pub use resource::Resource;
