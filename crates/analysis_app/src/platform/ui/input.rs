use std::path::PathBuf;

use analysis_core::Tab;
use thiserror::Error;

pub const HELP: &str = "commands: tab <home|analytics|architecture|about>, select <4 video paths>, \
submit, refresh, clear, help, quit";

/// A user intent typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Select(Vec<PathBuf>),
    Submit,
    Refresh,
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("unknown tab {0:?}")]
    UnknownTab(String),
    #[error("{0} takes no arguments")]
    UnexpectedArguments(&'static str),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    let Some(word) = line.split_whitespace().next() else {
        return Ok(None);
    };
    let rest = line[word.len()..].trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "tab" => Tab::from_id(rest)
            .map(Command::Tab)
            .ok_or_else(|| InputError::UnknownTab(rest.to_string()))?,
        "select" => Command::Select(rest.split_whitespace().map(PathBuf::from).collect()),
        "submit" => no_args("submit", rest, Command::Submit)?,
        "refresh" => no_args("refresh", rest, Command::Refresh)?,
        "clear" => no_args("clear", rest, Command::Clear)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn no_args(name: &'static str, rest: &str, command: Command) -> Result<Command, InputError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(InputError::UnexpectedArguments(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_names_with_spaces() {
        assert_eq!(
            parse_command("tab how it works"),
            Ok(Some(Command::Tab(Tab::HowItWorks)))
        );
        assert_eq!(
            parse_command("TAB Analytics"),
            Ok(Some(Command::Tab(Tab::Analytics)))
        );
        assert_eq!(
            parse_command("tab settings"),
            Err(InputError::UnknownTab("settings".to_string()))
        );
    }

    #[test]
    fn parses_selection_paths() {
        assert_eq!(
            parse_command("select n.mp4  s.mp4\tw.mp4 e.mp4"),
            Ok(Some(Command::Select(vec![
                PathBuf::from("n.mp4"),
                PathBuf::from("s.mp4"),
                PathBuf::from("w.mp4"),
                PathBuf::from("e.mp4"),
            ])))
        );
        assert_eq!(parse_command("select"), Ok(Some(Command::Select(Vec::new()))));
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("upload"),
            Err(InputError::Unknown("upload".to_string()))
        );
        assert_eq!(
            parse_command("submit now"),
            Err(InputError::UnexpectedArguments("submit"))
        );
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }
}
