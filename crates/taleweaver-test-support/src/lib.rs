//! Shared test doubles and fixtures for the Taleweaver story client.

mod api;
mod fixtures;
mod ticker;

pub use api::{ApiCall, FailingStoryApi, ScriptedStoryApi};
pub use fixtures::{StoryBuilder, pirate_story, summary};
pub use ticker::{ManualTicker, TickSender, manual_ticker};
