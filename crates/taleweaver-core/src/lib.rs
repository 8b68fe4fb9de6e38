//! Taleweaver Core — shared abstractions.
//!
//! This crate defines the identifiers, wire payloads and traits that the
//! story and generation crates depend on. It contains no transport code.

pub mod api;
pub mod error;
pub mod ids;
pub mod job;
pub mod schedule;
