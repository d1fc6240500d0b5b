//! Cloud Controller resource models.

mod app;
mod droplet;
mod process;
mod task;

pub use droplet::*;
pub use process::*;
pub use task::*;
