//! Story graph domain: the immutable graph and the cursor that walks it.

pub mod error;
pub mod navigator;
pub mod story;
