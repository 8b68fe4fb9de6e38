//! Driving the job poller against the story service on a tick schedule.

pub mod generator;
pub mod task;
