//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod dashboard;
mod data;
mod password;
mod replay;
mod session;

pub use config_gen::*;
pub use dashboard::*;
pub use data::*;
pub use password::*;
pub use replay::*;
pub use session::*;
