//! Interactive command surface of live mode.

use std::fmt;
use std::str::FromStr;

use crate::error::LiveError;

pub const HELP: &str = "\
r        rebuild
i        rebuild ignoring times
c        rebuild and copy
a        rebuild all (ignore times, force copy)
l        toggle live preview
w <url>  set watch url
u        run upload hook
h        help
q        quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rebuild,
    RebuildIgnoringTimes,
    RebuildAndCopy,
    RebuildAll,
    TogglePreview,
    SetWatchUrl(String),
    UploadHook,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = LiveError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let cmd = match (head, rest.is_empty()) {
            ("r", true) => Command::Rebuild,
            ("i", true) => Command::RebuildIgnoringTimes,
            ("c", true) => Command::RebuildAndCopy,
            ("a", true) => Command::RebuildAll,
            ("l", true) => Command::TogglePreview,
            ("w", false) => Command::SetWatchUrl(rest.to_string()),
            ("u", true) => Command::UploadHook,
            ("h", true) => Command::Help,
            ("q", true) => Command::Quit,
            _ => return Err(LiveError::UnknownCommand(line.to_string())),
        };
        Ok(cmd)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Rebuild => write!(f, "rebuild"),
            Command::RebuildIgnoringTimes => write!(f, "rebuild-ignoring-times"),
            Command::RebuildAndCopy => write!(f, "rebuild-and-copy"),
            Command::RebuildAll => write!(f, "rebuild-all"),
            Command::TogglePreview => write!(f, "toggle-live-preview"),
            Command::SetWatchUrl(url) => write!(f, "set-watch-url {url}"),
            Command::UploadHook => write!(f, "run-upload-hook"),
            Command::Help => write!(f, "help"),
            Command::Quit => write!(f, "quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("r", Command::Rebuild)]
    #[case(" i ", Command::RebuildIgnoringTimes)]
    #[case("c", Command::RebuildAndCopy)]
    #[case("a", Command::RebuildAll)]
    #[case("l", Command::TogglePreview)]
    #[case("w http://localhost:8000/", Command::SetWatchUrl("http://localhost:8000/".into()))]
    #[case("u", Command::UploadHook)]
    #[case("h", Command::Help)]
    #[case("q\n", Command::Quit)]
    fn parses_single_letter_commands(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(line.parse::<Command>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("x")]
    #[case("w")]
    #[case("r now")]
    #[case("rebuild")]
    fn rejects_unknown_or_malformed(#[case] line: &str) {
        assert!(matches!(
            line.parse::<Command>(),
            Err(LiveError::UnknownCommand(_))
        ));
    }
}
