//! Reply envelope decorators.
//!
//! A wrapper takes the raw reply already sitting in the buffer and replaces
//! it with a transport-ready envelope:
//!
//! - newline: `ok\n`
//! - JSON: `{"cmd": "ping", "id": "42", "reply": "ok"}`
//! - XML: `<cmd_reply><cmd>ping</cmd><id>42</id><reply>ok</reply></cmd_reply>`
//!
//! The id field is emitted only by the id-aware variants, and only when an
//! id is present. Names, ids and replies are escaped. A reply that is itself
//! a JSON object is embedded as a nested object instead of a string.

use babbler_types::buffer::ReplyBuffer;
use babbler_types::config::WrapMode;
use babbler_types::reply::ReplyCode;

/// A reply envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyWrapper {
    /// Append a single `\n`.
    Newline,
    /// JSON object envelope.
    Json { with_id: bool },
    /// XML element envelope.
    Xml { with_id: bool },
}

impl ReplyWrapper {
    /// Wrapper selected by a config value; `None` means replies go out raw.
    pub fn from_mode(mode: WrapMode) -> Option<Self> {
        match mode {
            WrapMode::None => None,
            WrapMode::Newline => Some(Self::Newline),
            WrapMode::Json => Some(Self::Json { with_id: false }),
            WrapMode::JsonId => Some(Self::Json { with_id: true }),
            WrapMode::Xml => Some(Self::Xml { with_id: false }),
            WrapMode::XmlId => Some(Self::Xml { with_id: true }),
        }
    }

    /// Replace the raw reply in `reply` with its envelope.
    ///
    /// Returns the new length, or `BufferError` if the envelope does not fit
    /// (the buffer content is then unspecified).
    pub fn wrap(self, cmd: &str, id: Option<&str>, reply: &mut ReplyBuffer) -> ReplyCode {
        let envelope = match self {
            Self::Newline => {
                let res = reply.try_push(b'\n');
                return reply.finish(res);
            },
            Self::Json { with_id } => {
                json_envelope(cmd, id.filter(|_| with_id), &reply.to_str_lossy())
            },
            Self::Xml { with_id } => {
                xml_envelope(cmd, id.filter(|_| with_id), &reply.to_str_lossy())
            },
        };
        let res = reply.set_str(&envelope);
        reply.finish(res)
    }
}

/// Build `{"cmd": ..., ["id": ..., ]"reply": ...}`.
pub fn json_envelope(cmd: &str, id: Option<&str>, raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + cmd.len() + 32);
    out.push_str("{\"cmd\": ");
    push_json_string(&mut out, cmd);
    if let Some(id) = id {
        out.push_str(", \"id\": ");
        push_json_string(&mut out, id);
    }
    out.push_str(", \"reply\": ");
    if is_json_object(raw) {
        out.push_str(raw);
    } else {
        push_json_string(&mut out, raw);
    }
    out.push('}');
    out
}

/// Build `<cmd_reply><cmd>..</cmd>[<id>..</id>]<reply>..</reply></cmd_reply>`.
pub fn xml_envelope(cmd: &str, id: Option<&str>, raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + cmd.len() + 48);
    out.push_str("<cmd_reply><cmd>");
    push_xml_escaped(&mut out, cmd);
    out.push_str("</cmd>");
    if let Some(id) = id {
        out.push_str("<id>");
        push_xml_escaped(&mut out, id);
        out.push_str("</id>");
    }
    out.push_str("<reply>");
    push_xml_escaped(&mut out, raw);
    out.push_str("</reply></cmd_reply>");
    out
}

fn push_json_string(out: &mut String, s: &str) {
    // Display on a JSON string value yields the quoted, escaped literal.
    out.push_str(&serde_json::Value::from(s).to_string());
}

fn is_json_object(raw: &str) -> bool {
    raw.trim_start().starts_with('{')
        && serde_json::from_str::<serde_json::Value>(raw).is_ok_and(|v| v.is_object())
}

fn push_xml_escaped(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}
