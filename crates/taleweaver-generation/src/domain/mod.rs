//! Generation domain: the job poller state machine and its inputs.

pub mod error;
pub mod poller;
pub mod theme;
