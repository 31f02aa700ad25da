//! # Walkdiary Architecture
//!
//! Walkdiary is a **UI-agnostic walking diary library**: timestamped notes
//! with optional photos and locations, and recorded walking trails with their
//! distance. The command-line binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Picks the position source, installs logging              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the session's AppState and the trail recorder       │
//! │  - Dispatches to commands, saves after each state change    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, recorder.rs)                 │
//! │  - Business logic over &mut AppState                        │
//! │  - Geo sampling, distance, photo transcoding as services    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! │  - PersistenceStore: tolerant load, never-failing save      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. User-facing messages travel back as [`commands::CmdMessage`]s
//! on a `CmdResult`, or through a [`notify::Notifier`] for work that happens
//! in the background (the recording ticker). Diagnostics go through `tracing`.
//!
//! ## Failure Model
//!
//! Nothing here is fatal. A missing location degrades an entry to "no
//! location", a bad photo aborts only that save, an unreadable record loads
//! as defaults, a failed write is logged, a bad import leaves the state as it
//! was.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`recorder`]: The trail recording state machine
//! - [`geo`]: Position sampling, gpsd client and distance math
//! - [`photo`]: Photo downscaling and JPEG encoding
//! - [`store`]: Storage abstraction, recovery and import/export documents
//! - [`model`]: Core data types (`Entry`, `Trail`, `AppState`)
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution and context setup
//! - [`notify`]: The background message channel
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod geo;
pub mod init;
pub mod model;
pub mod notify;
pub mod photo;
pub mod recorder;
pub mod store;

#[cfg(test)]
mod test_utils;
