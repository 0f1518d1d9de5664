// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod log;
pub mod specs;

pub mod archive;
pub mod csv;
pub mod error;
pub mod file;
pub mod manifest;
pub mod progress;
pub mod release;
pub mod report;
pub mod runner;
pub mod snapshot;

pub use error::{Error, Result};
