//! JSON command envelopes.
//!
//! Input looks like `{"cmd": "name", "params": ["a", "b"], "id": "42"}`:
//!
//! - `cmd` (required string) is the command name and `argv[0]`
//! - `params` (optional array) supplies `argv[1..]`; non-string items are skipped
//! - `id` (optional string) is the correlation id, kept out of `argv`
//!
//! Decoding is done by `serde_json`; this module only walks the tree.

use serde_json::Value;

use crate::command::ParsedCommand;

/// Result of reading a JSON envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonCommand {
    /// A usable command.
    Found(ParsedCommand),
    /// No string `cmd` field (or not a JSON object at all).
    ///
    /// Any id that could still be recovered is kept so the error reply can
    /// be correlated.
    NotFound { id: Option<String> },
}

impl JsonCommand {
    /// Correlation id, whichever way the parse went.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Found(cmd) => cmd.id.as_deref(),
            Self::NotFound { id } => id.as_deref(),
        }
    }
}

/// Read a command out of an already decoded JSON value.
///
/// `argv` holds at most `max_tokens` entries, name included; extra params
/// are dropped.
pub fn parse_command(value: &Value, max_tokens: usize) -> JsonCommand {
    let Some(fields) = value.as_object() else {
        log::warn!("JSON command is not an object");
        return JsonCommand::NotFound { id: None };
    };

    let mut name = None;
    let mut params = Vec::new();
    let mut id = None;

    for (key, field) in fields {
        match (key.as_str(), field) {
            ("cmd", Value::String(s)) => name = Some(s.clone()),
            ("params", Value::Array(items)) => {
                params = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
            },
            ("id", Value::String(s)) => id = Some(s.clone()),
            _ => {},
        }
    }

    let Some(name) = name else {
        log::warn!("JSON command has no string 'cmd' field");
        return JsonCommand::NotFound { id };
    };

    let mut argv = Vec::with_capacity(params.len() + 1);
    argv.push(name.clone());
    argv.extend(params);
    if argv.len() > max_tokens {
        log::debug!(
            "'{name}': {} params exceed token limit {max_tokens}",
            argv.len() - 1
        );
        argv.truncate(max_tokens.max(1));
    }

    JsonCommand::Found(ParsedCommand { name, argv, id })
}

/// Decode `text` and read a command from it.
///
/// Text that is not valid JSON is `NotFound` with no id.
pub fn parse_command_str(text: &str, max_tokens: usize) -> JsonCommand {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => parse_command(&value, max_tokens),
        Err(e) => {
            log::warn!("malformed JSON command: {e}");
            JsonCommand::NotFound { id: None }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> ParsedCommand {
        match parse_command_str(text, 20) {
            JsonCommand::Found(cmd) => cmd,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn cmd_only() {
        let cmd = found(r#"{"cmd": "ping"}"#);
        assert_eq!(cmd.name, "ping");
        assert_eq!(cmd.argv, vec!["ping"]);
        assert!(cmd.id.is_none());
    }

    #[test]
    fn cmd_params_and_id() {
        let cmd = found(r#"{"cmd": "led", "params": ["on", "5"], "id": "42"}"#);
        assert_eq!(cmd.argv, vec!["led", "on", "5"]);
        assert_eq!(cmd.arg_count(), 2);
        assert_eq!(cmd.id.as_deref(), Some("42"));
    }

    #[test]
    fn field_order_does_not_matter() {
        let cmd = found(r#"{"id": "7", "params": ["x"], "cmd": "echo"}"#);
        assert_eq!(cmd.argv, vec!["echo", "x"]);
        assert_eq!(cmd.id.as_deref(), Some("7"));
    }

    #[test]
    fn non_string_params_skipped() {
        let cmd = found(r#"{"cmd": "set", "params": ["a", 1, null, {"x": 1}, "b", true]}"#);
        assert_eq!(cmd.argv, vec!["set", "a", "b"]);
    }

    #[test]
    fn params_not_array_ignored() {
        let cmd = found(r#"{"cmd": "set", "params": "a b"}"#);
        assert_eq!(cmd.argv, vec!["set"]);
    }

    #[test]
    fn non_string_id_ignored() {
        let cmd = found(r#"{"cmd": "ping", "id": 42}"#);
        assert!(cmd.id.is_none());
    }

    #[test]
    fn unknown_fields_ignored() {
        let cmd = found(r#"{"cmd": "ping", "extra": [1, 2]}"#);
        assert_eq!(cmd.argv, vec!["ping"]);
    }

    #[test]
    fn missing_cmd_keeps_id() {
        let parsed = parse_command_str(r#"{"params": ["x"], "id": "9"}"#, 20);
        assert_eq!(parsed, JsonCommand::NotFound {
            id: Some("9".into())
        });
        assert_eq!(parsed.id(), Some("9"));
    }

    #[test]
    fn non_string_cmd_is_not_found() {
        let parsed = parse_command_str(r#"{"cmd": 5, "id": "1"}"#, 20);
        assert_eq!(parsed, JsonCommand::NotFound {
            id: Some("1".into())
        });
    }

    #[test]
    fn top_level_array_is_not_found() {
        assert_eq!(
            parse_command_str(r#"["ping"]"#, 20),
            JsonCommand::NotFound { id: None }
        );
    }

    #[test]
    fn invalid_json_is_not_found() {
        assert_eq!(
            parse_command_str("ping", 20),
            JsonCommand::NotFound { id: None }
        );
        assert_eq!(
            parse_command_str(r#"{"cmd": "ping""#, 20),
            JsonCommand::NotFound { id: None }
        );
    }

    #[test]
    fn params_capped_by_token_limit() {
        let parsed = parse_command_str(r#"{"cmd": "x", "params": ["1", "2", "3", "4"]}"#, 3);
        match parsed {
            JsonCommand::Found(cmd) => assert_eq!(cmd.argv, vec!["x", "1", "2"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn works_on_prebuilt_value() {
        let value = serde_json::json!({"cmd": "name", "id": "abc"});
        match parse_command(&value, 20) {
            JsonCommand::Found(cmd) => {
                assert_eq!(cmd.name, "name");
                assert_eq!(cmd.id.as_deref(), Some("abc"));
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn escaped_strings_are_decoded() {
        let cmd = found(r#"{"cmd": "say", "params": ["a\"b", "line\nbreak"]}"#);
        assert_eq!(cmd.argv[1], "a\"b");
        assert_eq!(cmd.argv[2], "line\nbreak");
    }
}
