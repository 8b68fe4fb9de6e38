//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Taleweaver - generate and play choose-your-own-adventure stories.
#[derive(Debug, Parser)]
#[command(name = "taleweaver")]
#[command(about = "Generate and play choose-your-own-adventure stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Generate a new story from a theme, then play it
    Create {
        /// What the story should be about, e.g. "pirates"
        theme: String,
    },

    /// Play a story that already exists
    Play {
        /// Identifier of the story
        story_id: String,
    },

    /// Browse the stories that have been generated so far
    List {
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_create_with_theme() {
        let cli = Cli::try_parse_from(["taleweaver", "create", "haunted lighthouse"]).unwrap();

        assert_eq!(
            cli.command,
            Commands::Create {
                theme: "haunted lighthouse".into()
            }
        );
    }

    #[test]
    fn test_list_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["taleweaver", "list"]).unwrap();
        let paged = Cli::try_parse_from(["taleweaver", "list", "--page", "3"]).unwrap();

        assert_eq!(cli.command, Commands::List { page: 1 });
        assert_eq!(paged.command, Commands::List { page: 3 });
    }

    #[test]
    fn test_play_requires_story_id() {
        assert!(Cli::try_parse_from(["taleweaver", "play"]).is_err());
    }
}
