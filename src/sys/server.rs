use crate::events::AppEvent;
use async_channel::Sender;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/ringtimer.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Verb {
    Start,
    Cancel,
    Text,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    UnknownVerb(String),
    #[error("Expected a number of seconds, got '{0}'")]
    InvalidSeconds(String),
}

/// Parses one line of the control protocol: `start <seconds>`, `cancel` or
/// `text <anything>`.
pub fn parse_command(line: &str) -> Result<AppEvent, CommandError> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    if verb.is_empty() {
        return Err(CommandError::Empty);
    }

    let verb = Verb::from_str(verb).map_err(|_| CommandError::UnknownVerb(verb.to_string()))?;
    let rest = rest.trim();

    match verb {
        Verb::Start => rest
            .parse()
            .map(AppEvent::StartTimer)
            .map_err(|_| CommandError::InvalidSeconds(rest.to_string())),
        Verb::Cancel => Ok(AppEvent::CancelTimer),
        Verb::Text => Ok(AppEvent::SetText(rest.to_string())),
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Ok(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Err(CommandError::Empty) => {}
                            Err(e) => log::warn!("Ignoring control command: {}", e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("start 45", AppEvent::StartTimer(45)),
            ("  START   90 ", AppEvent::StartTimer(90)),
            ("cancel", AppEvent::CancelTimer),
            ("Cancel\n", AppEvent::CancelTimer),
            ("text 00:12:00", AppEvent::SetText("00:12:00".to_string())),
            ("text  two words ", AppEvent::SetText("two words".to_string())),
            ("text", AppEvent::SetText(String::new())),
        ];

        for (line, expected) in cases {
            assert_eq!(parse_command(line), Ok(expected), "line {:?}", line);
        }
    }

    #[test]
    fn test_rejects_bad_commands() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(
            parse_command("pause"),
            Err(CommandError::UnknownVerb("pause".to_string()))
        );
        assert_eq!(
            parse_command("start soon"),
            Err(CommandError::InvalidSeconds("soon".to_string()))
        );
        assert_eq!(
            parse_command("start -3"),
            Err(CommandError::InvalidSeconds("-3".to_string()))
        );
    }

    #[test]
    fn test_verbs_render_lowercase() {
        assert_eq!(Verb::Start.to_string(), "start");
        assert_eq!(Verb::Cancel.to_string(), "cancel");
    }
}
