//! # Folio Architecture
//!
//! Folio adds photos, chess posts and anime entries to a static site's content
//! store: each record is appended to a JSON catalog and its image is copied
//! into the site's asset directory. It is a library that happens to have a CLI
//! client; a desktop form would sit on the same API.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns config and paths         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - The save pipeline, listing, init, doctor                 │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                                 │
//!                 ▼                                 ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Stager (stager.rs)           │ │  Store (store/)           │
//! │  validate, name, copy assets  │ │  load, next id, append,   │
//! │                               │ │  atomic save              │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! The stager knows nothing about catalogs and the store knows nothing about
//! assets; only the `add` command sequences them.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`stager`]: Asset validation, naming and copying
//! - [`store`]: Catalog persistence and its backends
//! - [`session`]: Per-form state and save phases
//! - [`model`]: Content kinds, records and drafts
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod stager;
pub mod store;
