//! Taleweaver — story graph model, navigation and loading.
//!
//! Responsible for turning a fetched story payload into a read-only graph,
//! walking that graph in response to reader choices, and paging through
//! the story catalog.

pub mod application;
pub mod domain;
