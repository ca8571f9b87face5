//! Types downstream hosts interact with.

mod config;
mod errors;

pub use config::RuntimeConfig;
pub use errors::{Result, RuntimeError};
