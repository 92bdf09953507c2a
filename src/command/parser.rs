//! JSON conversion for commands and command results.
//!
//! Parsing is two-phase: the payload is first decoded structurally, then the
//! semantic rules are checked. For batches every element is checked before
//! failing, so callers see all problems at once.

use super::domain::{Command, CommandResult, RawCommand};
use super::error::{BatchViolation, CommandParseError};

/// Outcome of a parse: the value, or a human-readable failure.
pub type ParseResult<T> = Result<T, CommandParseError>;

/// Parses one JSON object into a [`Command`].
///
/// # Errors
///
/// - [`CommandParseError::MissingAction`] if `action` is absent or blank
/// - [`CommandParseError::Syntax`] if the text is not valid JSON
/// - [`CommandParseError::Deserialization`] for any other decoding fault
///
/// # Examples
///
/// ```
/// use assistant_core::command::parser::parse_command;
///
/// let command = parse_command(r#"{"action":"ai_sessions.get_cost","params":{"sessionId":"s1"}}"#)
///     .expect("valid command");
/// assert_eq!(command.action(), "ai_sessions.get_cost");
///
/// let error = parse_command("{}").expect_err("action is required");
/// assert!(error.to_string().contains("Action field is required"));
/// ```
pub fn parse_command(text: &str) -> ParseResult<Command> {
    let raw: RawCommand =
        serde_json::from_str(text).map_err(|e| CommandParseError::from_json_error(&e))?;
    Command::try_from(raw)
}

/// Parses a JSON array into a list of [`Command`]s.
///
/// # Errors
///
/// Structural failures are reported as for [`parse_command`]. Once the array
/// has been decoded, every element with a blank action is collected into a
/// single [`CommandParseError::InvalidBatch`] naming each offending index.
pub fn parse_commands(text: &str) -> ParseResult<Vec<Command>> {
    let raws: Vec<RawCommand> =
        serde_json::from_str(text).map_err(|e| CommandParseError::from_json_error(&e))?;

    let violations: Vec<BatchViolation> = raws
        .iter()
        .enumerate()
        .filter(|(_, raw)| raw.has_blank_action())
        .map(|(index, _)| BatchViolation::new(index, CommandParseError::MissingAction.to_string()))
        .collect();

    if !violations.is_empty() {
        return Err(CommandParseError::InvalidBatch(violations));
    }

    raws.into_iter().map(Command::try_from).collect()
}

/// Parses one JSON object into a [`CommandResult`].
///
/// # Errors
///
/// Returns [`CommandParseError::Syntax`] for malformed JSON and
/// [`CommandParseError::Deserialization`] when the shape is wrong or a
/// successful result carries an error.
pub fn parse_result(text: &str) -> ParseResult<CommandResult> {
    serde_json::from_str(text).map_err(|e| CommandParseError::from_json_error(&e))
}

/// Serialises a [`Command`] to its wire form.
///
/// # Errors
///
/// Returns [`CommandParseError::Serialization`] if encoding fails.
pub fn command_to_json(command: &Command) -> ParseResult<String> {
    to_json(command)
}

/// Serialises a [`CommandResult`] to its wire form.
///
/// # Errors
///
/// Returns [`CommandParseError::Serialization`] if encoding fails.
pub fn result_to_json(result: &CommandResult) -> ParseResult<String> {
    to_json(result)
}

/// Serialises a list of [`CommandResult`]s to a JSON array.
///
/// # Errors
///
/// Returns [`CommandParseError::Serialization`] if encoding fails.
pub fn results_to_json(results: &[CommandResult]) -> ParseResult<String> {
    to_json(results)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> ParseResult<String> {
    serde_json::to_string(value).map_err(|e| CommandParseError::Serialization(e.to_string()))
}
