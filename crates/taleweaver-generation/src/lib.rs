//! Taleweaver — story generation.
//!
//! Responsible for submitting a theme to the story service, tracking the
//! resulting background job until it resolves, and handing the finished
//! story over to navigation.

pub mod application;
pub mod domain;
