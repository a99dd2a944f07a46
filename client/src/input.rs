//! Terminal command parsing for the headless client

use shared::ClientMessage;
use thiserror::Error;

/// One line of user input, parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Increment(i64),
    Reset,
    /// Reprint the board
    Show,
    /// List the moves of the current game
    History,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty command")]
    Empty,

    #[error("`{0}` is not a square number")]
    BadSquare(String),

    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
}

pub const HELP: &str =
    "commands: <square> | inc <square> | reset | board | history | help | quit";

impl Command {
    /// The intent to send for this command, if it has one
    pub fn intent(self) -> Option<ClientMessage> {
        match self {
            Command::Increment(square) => Some(ClientMessage::Increment { square }),
            Command::Reset => Some(ClientMessage::Reset),
            Command::Show | Command::History | Command::Help | Command::Quit => None,
        }
    }
}

/// Parses a line such as `12`, `inc 12`, `reset` or `quit`.
///
/// Square numbers are passed through as typed; range checks are the
/// server's job.
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Err(InputError::Empty);
    };

    let command = match first.to_ascii_lowercase().as_str() {
        "inc" | "increment" | "i" => {
            let square = words.next().ok_or(InputError::BadSquare(String::new()))?;
            Command::Increment(parse_square(square)?)
        }
        "reset" | "r" => Command::Reset,
        "board" | "show" | "b" => Command::Show,
        "history" | "moves" | "m" => Command::History,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other if other.starts_with(|c: char| c.is_ascii_digit() || c == '-') => {
            Command::Increment(parse_square(other)?)
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };

    Ok(command)
}

fn parse_square(word: &str) -> Result<i64, InputError> {
    word.parse()
        .map_err(|_| InputError::BadSquare(word.to_string()))
}
