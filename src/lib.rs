//! Library crate for usredit.
//!
//! This crate exposes the building blocks of the TUI:
//! - Users API client and background worker (`api`)
//! - Application state, edit dialog and update loop (`app`)
//! - Command-line configuration and config file locations (`config`)
//! - Persisted credential lookup (`credentials`)
//! - Error and result types (`error`)
//! - Log setup (`logging`)
//! - Toast notifications (`notify`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `usredit` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod notify;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
