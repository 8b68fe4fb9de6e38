//! Taleweaver terminal front end.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use taleweaver_client::HttpStoryApi;
use taleweaver_core::ids::StoryId;
use taleweaver_story::application::catalog::PageRequest;
use taleweaver_story::application::loader::load_story;
use taleweaver_story::domain::navigator::StoryNavigator;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;

use cli::{Cli, Commands};
use config::AppConfig;
use error::AppError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing subscriber; stdout belongs to the story.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if std::env::var("TALEWEAVER_LOG_JSON").is_ok_and(|value| value == "1") {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let api = Arc::new(HttpStoryApi::new(&config.client)?);
    tracing::info!(base_url = %api.base_url(), "using story service");

    let mut out = io::stdout();
    match cli.command {
        Commands::Create { theme } => {
            let shutdown = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %err, "failed to listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            };
            let story =
                commands::create::create(&theme, api, config.poll_interval, &mut out, shutdown)
                    .await?;
            let mut navigator = StoryNavigator::new(story);
            commands::play::play(&mut navigator, &mut io::stdin().lock(), &mut out)
        }
        Commands::Play { story_id } => {
            let story = load_story(&StoryId::from(story_id), api.as_ref()).await?;
            let mut navigator = StoryNavigator::new(story);
            commands::play::play(&mut navigator, &mut io::stdin().lock(), &mut out)
        }
        Commands::List { page } => {
            let request = PageRequest::new(page, config.page_size);
            commands::list::list(request, api.as_ref(), &mut out).await
        }
    }
}
