// src/specs/mod.rs
//! # Dataset “specs” module
//!
//! Knowledge about the *remote* NHSN resources lives here: which fields to ask
//! for, what the payloads look like, and how to turn them into the crate's own
//! shapes.
//!
//! ## What lives here
//! - **Request shaping** for the weekly jurisdiction dataset (`$select`, `$limit`).
//! - **Payload parsing**: flat JSON records → [`SnapshotTable`](crate::snapshot::SnapshotTable),
//!   metadata documents → [`RemoteMetadata`](metadata::RemoteMetadata).
//! - **Disease vocabulary** (3-letter codes, display names, accepted aliases).
//! - **Target data**: a snapshot joined with a locations table into the
//!   hubverse `date,location,location_name,value,weekly_rate` form.
//!
//! ## What does **not** live here
//! - **Networking** (`core::net`), **persistence** (`archive`, `manifest`) and
//!   release selection (`release`). Specs only read payloads they are handed.
//!
//! ## Conventions
//! - A malformed record is rejected with a warning; the payload as a whole only
//!   fails when nothing usable is left.
//! - Column order of a parsed table is the *requested* field order, so every
//!   snapshot of the same release has the same header.
pub mod metadata;
pub mod nhsn;
pub mod target;
