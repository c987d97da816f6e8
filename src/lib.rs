//! Library crate for user-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record source trait and HTTP client (`source`)
//! - Search, sort and pagination pipeline (`search`, `listing`)
//! - Fetch lifecycle state (`load`)
//! - Application state and update loop (`app`)
//! - Command line, logging and error types (`config`, `logging`, `error`)
//! - Platform helpers for config paths and links (`sys`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-directory` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod app;
pub mod config;
pub mod error;
pub mod listing;
pub mod load;
pub mod logging;
pub mod search;
pub mod source;
pub mod sys;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, FetchError, Result};
pub use listing::{PAGE_SIZE, PageView, SortOrder, ViewState};
pub use load::LoadState;
pub use source::{RecordSource, UserRecord};
