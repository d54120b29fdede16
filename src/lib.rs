//! Invitelytics - visitor analytics for event invitation sites
//!
//! Captures how guests interact with a single-page invitation (device,
//! page views, clicks, scroll depth, time on page) into a key/value store,
//! and reads it back for export and an admin dashboard.
//!
//! # Features
//! - **server**: relay endpoint (default)
//! - **cli**: command-line dashboard and data management (default)
//!
//! # Architecture
//! - `storage`: key/value store capability (memory, JSON file, null)
//! - `analytics`: capture, accessor, validation, relay
//! - `auth`: admin access gate
//! - `api`: relay endpoint
//! - `interfaces`: command-line interface
//! - `config`: configuration management
//! - `runtime`: execution modes
//! - `system`: logging

pub mod analytics;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod storage;
pub mod system;
pub mod utils;
