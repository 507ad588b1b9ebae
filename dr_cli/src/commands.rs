use std::fmt;

use thiserror::Error;

/// Usage lines printed by `help`.
pub const USAGE: &str = "\
commands:
  solo                 start a solo race
  challenge ID         challenge a roster player (alias: invite)
  incoming ID          pretend ID challenged you
  accept               accept the oldest incoming challenge
  decline              decline the oldest incoming challenge
  roll                 roll your die (alias: r)
  lobby                leave the current race or challenge (alias: leave)
  status               show the race (alias: s)
  roster               list players you can challenge
  profile              show your points
  help                 show this list
  quit                 exit (alias: exit)
";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Solo,
    Challenge(String),
    Incoming(String),
    Accept,
    Decline,
    Roll,
    Lobby,
    Status,
    Roster,
    Profile,
    Help,
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Challenge(id) => write!(f, "challenge {id}"),
            Self::Incoming(id) => write!(f, "incoming {id}"),
            Self::Solo => write!(f, "solo"),
            Self::Accept => write!(f, "accept"),
            Self::Decline => write!(f, "decline"),
            Self::Roll => write!(f, "roll"),
            Self::Lobby => write!(f, "lobby"),
            Self::Status => write!(f, "status"),
            Self::Roster => write!(f, "roster"),
            Self::Profile => write!(f, "profile"),
            Self::Help => write!(f, "help"),
            Self::Quit => write!(f, "quit"),
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing was typed.
    #[error("Type 'help' to see available commands")]
    Empty,
    /// Command needs a player ID.
    #[error("'{0}' needs a player ID (e.g., '{0} sara_vip')")]
    MissingPlayerId(&'static str),
    /// Command takes no arguments.
    #[error("'{0}' takes no arguments")]
    UnexpectedArguments(String),
    /// Unrecognized command.
    #[error("Unrecognized command '{0}'. Type 'help' to see available commands")]
    UnrecognizedCommand(String),
}

/// Parse a line of input into a Command.
///
/// # Examples
///
/// ```
/// use dr_cli::commands::{Command, parse_command};
///
/// assert_eq!(parse_command("roll"), Ok(Command::Roll));
/// assert_eq!(parse_command("challenge sara_vip"), Ok(Command::Challenge("sara_vip".to_string())));
/// assert!(parse_command("challenge").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return Err(ParseError::Empty);
    };
    let name = name.to_ascii_lowercase();

    // Commands that take a player ID
    match name.as_str() {
        "challenge" | "invite" => return player_arg("challenge", args).map(Command::Challenge),
        "incoming" => return player_arg("incoming", args).map(Command::Incoming),
        _ => {}
    }

    let command = match name.as_str() {
        "solo" => Command::Solo,
        "accept" => Command::Accept,
        "decline" => Command::Decline,
        "roll" | "r" => Command::Roll,
        "lobby" | "leave" => Command::Lobby,
        "status" | "s" => Command::Status,
        "roster" => Command::Roster,
        "profile" | "points" => Command::Profile,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    };
    if !args.is_empty() {
        return Err(ParseError::UnexpectedArguments(name));
    }
    Ok(command)
}

fn player_arg(command: &'static str, args: &[&str]) -> Result<String, ParseError> {
    match args {
        [id] => Ok((*id).to_string()),
        [] => Err(ParseError::MissingPlayerId(command)),
        _ => Err(ParseError::UnexpectedArguments(command.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_word_commands() {
        assert_eq!(parse_command("solo"), Ok(Command::Solo));
        assert_eq!(parse_command("accept"), Ok(Command::Accept));
        assert_eq!(parse_command("decline"), Ok(Command::Decline));
        assert_eq!(parse_command("roll"), Ok(Command::Roll));
        assert_eq!(parse_command("lobby"), Ok(Command::Lobby));
        assert_eq!(parse_command("status"), Ok(Command::Status));
        assert_eq!(parse_command("roster"), Ok(Command::Roster));
        assert_eq!(parse_command("profile"), Ok(Command::Profile));
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_command("r"), Ok(Command::Roll));
        assert_eq!(parse_command("leave"), Ok(Command::Lobby));
        assert_eq!(parse_command("s"), Ok(Command::Status));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
        assert_eq!(
            parse_command("invite omar_k"),
            Ok(Command::Challenge("omar_k".to_string()))
        );
    }

    #[test]
    fn test_parse_is_case_insensitive_for_names() {
        assert_eq!(parse_command("ROLL"), Ok(Command::Roll));
        assert_eq!(
            parse_command("Challenge Sara_VIP"),
            Ok(Command::Challenge("Sara_VIP".to_string()))
        );
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(parse_command("  roll  "), Ok(Command::Roll));
        assert_eq!(
            parse_command("\tincoming   nour \n"),
            Ok(Command::Incoming("nour".to_string()))
        );
    }

    #[test]
    fn test_parse_missing_player_id() {
        assert_eq!(
            parse_command("challenge"),
            Err(ParseError::MissingPlayerId("challenge"))
        );
        assert_eq!(
            parse_command("incoming"),
            Err(ParseError::MissingPlayerId("incoming"))
        );
    }

    #[test]
    fn test_parse_extra_arguments() {
        assert_eq!(
            parse_command("roll 6"),
            Err(ParseError::UnexpectedArguments("roll".to_string()))
        );
        assert_eq!(
            parse_command("challenge a b"),
            Err(ParseError::UnexpectedArguments("challenge".to_string()))
        );
    }

    #[test]
    fn test_parse_unrecognized_command() {
        let result = parse_command("dance");
        assert!(matches!(result, Err(ParseError::UnrecognizedCommand(_))));
    }

    #[test]
    fn test_parse_empty_string() {
        assert_eq!(parse_command(""), Err(ParseError::Empty));
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
    }

    #[test]
    fn test_display_round_trips() {
        for command in [
            Command::Solo,
            Command::Challenge("sara_vip".to_string()),
            Command::Incoming("nour".to_string()),
            Command::Roll,
            Command::Quit,
        ] {
            assert_eq!(parse_command(&command.to_string()), Ok(command));
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::MissingPlayerId("challenge").to_string(),
            "'challenge' needs a player ID (e.g., 'challenge sara_vip')"
        );
    }
}
