//! Mode routing
//!
//! - Server mode (relay endpoint)
//! - CLI mode (dashboard, export, capture replay)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub use server::run_server;
