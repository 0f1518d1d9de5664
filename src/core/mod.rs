// src/core/mod.rs

pub mod dates;
pub mod net;

pub use net::{Fetcher, HttpClient};
