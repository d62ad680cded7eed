//! Line-oriented hot-seat front end.
//!
//! Reads one command per line and drives a [`GameSession`]. Occupied cells and
//! moves after the end of a match are ignored without a message, the same way
//! a board UI ignores clicks on filled cells.

use std::io::{self, BufRead, Write};

use gamerzo_tictactoe::{MoveError, Position};
use tracing::{debug, instrument};

use crate::session::{GameEndListener, GameSession};

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play at a flat index (not yet range-checked).
    Move(usize),
    /// Start a fresh match.
    Reset,
    /// Stop playing.
    Quit,
    /// Show usage.
    Help,
    /// Nothing on the line.
    Empty,
    /// Unrecognized text.
    Unknown,
}

impl Command {
    /// Parses one input line.
    ///
    /// Numbers are passed through unchecked so the engine reports out-of-range
    /// indices itself.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" => Command::Empty,
            "q" | "quit" | "exit" => Command::Quit,
            "r" | "reset" => Command::Reset,
            "h" | "help" | "?" => Command::Help,
            other => match other.parse::<usize>() {
                Ok(index) => Command::Move(index),
                Err(_) => Position::parse(other)
                    .map(|pos| Command::Move(pos.to_index()))
                    .unwrap_or(Command::Unknown),
            },
        }
    }
}

const HELP: &str = "Enter a cell index 0-8 or a position name (e.g. center, top-left).\n\
                    r = new game, q = quit";

/// Runs the front end until `quit` or end of input.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
#[instrument(skip_all, fields(player1 = %session.player1(), player2 = %session.player2()))]
pub fn run<L, R, W>(session: &mut GameSession<L>, input: R, mut output: W) -> io::Result<()>
where
    L: GameEndListener,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{} (X) vs {} (O)", session.player1(), session.player2())?;
    writeln!(output, "{}", HELP)?;
    render(session, &mut output)?;

    for line in input.lines() {
        let line = line?;
        let command = Command::parse(&line);
        debug!(?command, "Input");

        match command {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Unknown => {
                writeln!(output, "Unrecognized input '{}'. {}", line.trim(), HELP)?
            }
            Command::Reset => {
                session.reset();
                render(session, &mut output)?;
            }
            Command::Move(index) => match session.submit_move(index) {
                Ok(ended) => {
                    render(session, &mut output)?;
                    if ended.is_some() {
                        writeln!(output, "Game over. Type r to play again or q to quit.")?;
                    }
                }
                Err(e @ MoveError::OutOfRange(_)) => writeln!(output, "{}", e)?,
                Err(MoveError::CellOccupied(_) | MoveError::GameAlreadyOver) => {}
            },
        }
    }

    output.flush()
}

fn render<L, W>(session: &GameSession<L>, output: &mut W) -> io::Result<()>
where
    L: GameEndListener,
    W: Write,
{
    writeln!(output)?;
    writeln!(output, "{}", session.engine().board().display())?;
    writeln!(output, "{}", session.status_line())
}
