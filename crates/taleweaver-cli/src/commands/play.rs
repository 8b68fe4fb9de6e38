//! Interactive story playthrough.

use std::io::{BufRead, Write};

use taleweaver_story::domain::navigator::{Ending, NodeView, StoryNavigator};
use tracing::info;

use crate::error::AppError;

/// What the reader typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// A 1-based option number.
    Choose(usize),
    Restart,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" => Input::Quit,
        "r" | "restart" => Input::Restart,
        other => other.parse().map_or(Input::Unknown, Input::Choose),
    }
}

fn render(view: &NodeView<'_>, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", view.content)?;
    writeln!(out)?;
    match view.ending() {
        Some(Ending::Winning) => {
            writeln!(out, "Congratulations")?;
            writeln!(out, "You reached a winning ending")?;
        }
        Some(Ending::Losing) => {
            writeln!(out, "The End")?;
            writeln!(out, "Your adventure has ended.")?;
        }
        None => {
            writeln!(out, "What will you do?")?;
            for (i, option) in view.options.iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, option.text)?;
            }
        }
    }
    writeln!(out, "[r] restart  [q] quit")?;
    write!(out, "> ")?;
    out.flush()
}

/// Plays `navigator`'s story on a terminal until the reader quits or the
/// input ends.
///
/// # Errors
///
/// Returns `AppError::Navigation` if the cursor lands on a node the story
/// does not contain, or `AppError::Io` if the terminal fails.
pub fn play<R, W>(
    navigator: &mut StoryNavigator,
    input: &mut R,
    out: &mut W,
) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
{
    info!(story_id = %navigator.story().id(), "playing story");
    writeln!(out, "== {} ==", navigator.story().title())?;

    let mut line = String::new();
    loop {
        let view = navigator.current_view()?;
        render(&view, out)?;
        let available = view.options.len();

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match parse_input(&line) {
            Input::Quit => return Ok(()),
            Input::Restart => navigator.restart(),
            Input::Choose(_) | Input::Unknown if available == 0 => {
                writeln!(out, "Type r to restart or q to quit.")?;
            }
            Input::Choose(number) if (1..=available).contains(&number) => {
                navigator.choose(number - 1)?;
            }
            Input::Choose(_) | Input::Unknown => {
                writeln!(out, "Pick an option between 1 and {available}, r or q.")?;
            }
        }
    }
}
