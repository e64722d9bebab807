//! `feedstock-app`
//!
//! **Responsibility:** the entry workflow on top of the domain and the store.
//!
//! This crate provides:
//! - `EntrySession`: pending rows, submit, undo, balances and the dashboard
//!   over one persisted record list
//! - `AppConfig`: environment-driven configuration
//! - the `feedstock` command-line front end

pub mod cli;
pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{EntrySession, SessionError};
