//! `roster` - A student roster backed by a JSON document
//!
//! This library provides the record store, the filter engine and the REST
//! surface behind the `roster` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod record;
pub mod render;
pub mod roster;
pub mod server;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{FilterState, Selection};
pub use logging::init_logging;
pub use record::{Gender, StudentPayload, StudentRecord};
pub use roster::Roster;
pub use stats::Summary;
pub use storage::Storage;
