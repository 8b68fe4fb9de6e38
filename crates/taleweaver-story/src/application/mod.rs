//! Story service orchestration: loading complete stories and catalog pages.

pub mod catalog;
pub mod loader;
