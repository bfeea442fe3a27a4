//! `rollbook` - Student records over HTTP
//!
//! A `SQLite`-backed record store, an axum service exposing it as a JSON
//! collection, and a client application that mirrors the collection locally.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod logging;
pub mod server;
pub mod storage;
pub mod student;

pub use client::{ClientApp, StudentsApi, ViewModel};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use logging::init_logging;
pub use storage::{RecordStore, Storage};
pub use student::{Student, StudentFields, StudentId};
