#![forbid(unsafe_code)]

//! Core domain model and persistence for the Shelf library catalog.
//!
//! This crate provides:
//! - Domain types (books, magazines, users)
//! - The `Library` catalog with duplicate rejection
//! - Persistence (row codec, CSV and JSON file stores)
//! - Console collaborator traits, configuration and logging

pub mod types;
pub mod error;
pub mod library;
pub mod codec;
pub mod store;
pub mod io;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use library::{by_last_name_case_insensitive, by_title_case_insensitive, Library};
pub use codec::Record;
pub use store::{open_store, CatalogStore, CsvFileStore, FileFormat, JsonFileStore};
pub use io::{ConsoleInput, ConsoleOutput, InputSource, OutputSink};
pub use config::Config;
