//! Packet framing.
//!
//! Decides when accumulated input is a complete packet, strips the framing
//! from incoming packets, and re-applies it to outgoing replies. Also hosts
//! the error formatter that turns negative reply codes into text.

use std::fmt;

use babbler_types::buffer::ReplyBuffer;
use babbler_types::config::ProtocolConfig;
use babbler_types::reply::{REPLY_BUF_ERROR, ReplyCode};

/// Byte appended after the newline when a terminator is requested.
pub const TERMINATOR: u8 = 0;

/// Predicate deciding whether a buffer holds a complete packet.
pub type PacketFilter = Box<dyn Fn(&[u8]) -> bool>;

/// Default packet predicate: the last byte is a newline.
pub fn is_newline_terminated(input: &[u8]) -> bool {
    input.last() == Some(&b'\n')
}

/// Strip framing from an incoming packet.
///
/// With `drop_newline`, one trailing `\n` is removed. The input is not
/// modified; the payload is returned as a sub-slice.
pub fn unpack(input: &[u8], drop_newline: bool) -> &[u8] {
    match input.split_last() {
        Some((&b'\n', payload)) if drop_newline => payload,
        _ => input,
    }
}

/// Append `\n` (and optionally a terminator) to a reply.
///
/// Only positive codes are framed; `NoReply` and error codes come back
/// unchanged. Capacity is checked before each byte and `BufferError` is
/// returned as soon as one does not fit.
pub fn pack(reply: &mut ReplyBuffer, code: ReplyCode, add_terminator: bool) -> ReplyCode {
    if !matches!(code, ReplyCode::Written(_)) {
        return code;
    }
    if reply.try_push(b'\n').is_err() {
        log::warn!("no room to frame a {}-byte reply", reply.len());
        return ReplyCode::BufferError;
    }
    if add_terminator && reply.try_push(TERMINATOR).is_err() {
        log::warn!("no room for reply terminator");
        return ReplyCode::BufferError;
    }
    reply.code()
}

/// Render a negative reply code as text.
///
/// `BufferError` becomes `replybuferror`, any other failure `error: <code>`.
/// Non-error codes are returned untouched. If even the error text does not
/// fit, the result is `BufferError` with an empty buffer.
pub fn write_reply_error(reply: &mut ReplyBuffer, code: ReplyCode) -> ReplyCode {
    let text = match code {
        ReplyCode::BufferError => REPLY_BUF_ERROR.to_string(),
        ReplyCode::Failed(n) => format!("error: {n}"),
        ReplyCode::Written(_) | ReplyCode::NoReply => return code,
    };
    match reply.set_str(&text) {
        Ok(()) => reply.code(),
        Err(_) => {
            reply.clear();
            ReplyCode::BufferError
        },
    }
}

/// Packet boundary detection plus outgoing framing settings.
pub struct PacketFramer {
    filter: PacketFilter,
    /// Strip the trailing newline from incoming packets.
    pub drop_newline: bool,
    /// Append a newline to outgoing replies.
    pub add_newline: bool,
    /// Append a terminator after the newline.
    pub add_terminator: bool,
}

impl PacketFramer {
    /// Newline-delimited packets, newline-terminated replies, no terminator.
    pub fn new() -> Self {
        Self {
            filter: Box::new(is_newline_terminated),
            drop_newline: true,
            add_newline: true,
            add_terminator: false,
        }
    }

    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            add_newline: config.add_newline,
            add_terminator: config.add_terminator,
            ..Self::new()
        }
    }

    /// Replace the packet predicate.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&[u8]) -> bool + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_newline(mut self, add_newline: bool) -> Self {
        self.add_newline = add_newline;
        self
    }

    pub fn with_terminator(mut self, add_terminator: bool) -> Self {
        self.add_terminator = add_terminator;
        self
    }

    /// Whether `input` is a complete packet.
    pub fn is_complete(&self, input: &[u8]) -> bool {
        (self.filter)(input)
    }

    /// Strip incoming framing.
    pub fn unpack<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        unpack(input, self.drop_newline)
    }

    /// Apply outgoing framing according to the settings.
    pub fn pack(&self, reply: &mut ReplyBuffer, code: ReplyCode) -> ReplyCode {
        if self.add_newline {
            return pack(reply, code, self.add_terminator);
        }
        if self.add_terminator && matches!(code, ReplyCode::Written(_)) {
            let res = reply.try_push(TERMINATOR);
            return reply.finish(res);
        }
        code
    }
}

impl Default for PacketFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PacketFramer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketFramer")
            .field("drop_newline", &self.drop_newline)
            .field("add_newline", &self.add_newline)
            .field("add_terminator", &self.add_terminator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(text: &str, capacity: usize) -> ReplyBuffer {
        let mut buf = ReplyBuffer::with_capacity(capacity);
        buf.try_append_str(text).unwrap();
        buf
    }

    #[test]
    fn newline_predicate() {
        assert!(is_newline_terminated(b"ping\n"));
        assert!(!is_newline_terminated(b"ping"));
        assert!(!is_newline_terminated(b""));
        assert!(is_newline_terminated(b"\n"));
    }

    #[test]
    fn unpack_drops_one_newline() {
        assert_eq!(unpack(b"ping\n", true), b"ping");
        assert_eq!(unpack(b"ping\n\n", true), b"ping\n");
        assert_eq!(unpack(b"ping", true), b"ping");
        assert_eq!(unpack(b"ping\n", false), b"ping\n");
        assert_eq!(unpack(b"", true), b"");
    }

    #[test]
    fn pack_appends_newline() {
        let mut buf = buffer_with("ok", 8);
        assert_eq!(pack(&mut buf, ReplyCode::Written(2), false), ReplyCode::Written(3));
        assert_eq!(buf.as_bytes(), b"ok\n");
    }

    #[test]
    fn pack_appends_terminator() {
        let mut buf = buffer_with("ok", 8);
        assert_eq!(pack(&mut buf, ReplyCode::Written(2), true), ReplyCode::Written(4));
        assert_eq!(buf.as_bytes(), b"ok\n\0");
    }

    #[test]
    fn pack_no_room_for_newline() {
        let mut buf = buffer_with("ok", 2);
        assert_eq!(pack(&mut buf, ReplyCode::Written(2), false), ReplyCode::BufferError);
    }

    #[test]
    fn pack_no_room_for_terminator() {
        let mut buf = buffer_with("ok", 3);
        assert_eq!(pack(&mut buf, ReplyCode::Written(2), true), ReplyCode::BufferError);
    }

    #[test]
    fn pack_passes_non_positive_codes() {
        let mut buf = ReplyBuffer::with_capacity(8);
        assert_eq!(pack(&mut buf, ReplyCode::NoReply, true), ReplyCode::NoReply);
        assert_eq!(pack(&mut buf, ReplyCode::BufferError, true), ReplyCode::BufferError);
        assert_eq!(pack(&mut buf, ReplyCode::Failed(-4), true), ReplyCode::Failed(-4));
        assert!(buf.is_empty());
    }

    #[test]
    fn unpack_then_pack_restores_framing() {
        let packet = b"status\n";
        let payload = unpack(packet, true);
        let mut buf = ReplyBuffer::with_capacity(16);
        buf.try_append(payload).unwrap();
        let payload_code = buf.code();
        let code = pack(&mut buf, payload_code, true);
        assert_eq!(code, ReplyCode::Written(packet.len() + 1));
        assert_eq!(buf.as_bytes(), b"status\n\0");
        assert_eq!(&buf.as_bytes()[..packet.len()], packet);
    }

    #[test]
    fn error_formatter_buffer_error() {
        let mut buf = ReplyBuffer::with_capacity(32);
        let code = write_reply_error(&mut buf, ReplyCode::BufferError);
        assert_eq!(buf.to_str_lossy(), "replybuferror");
        assert_eq!(code, ReplyCode::Written(13));
    }

    #[test]
    fn error_formatter_handler_code() {
        let mut buf = ReplyBuffer::with_capacity(32);
        let code = write_reply_error(&mut buf, ReplyCode::Failed(-42));
        assert_eq!(buf.to_str_lossy(), "error: -42");
        assert_eq!(code, ReplyCode::Written(10));
    }

    #[test]
    fn error_formatter_extreme_code() {
        let mut buf = ReplyBuffer::with_capacity(32);
        write_reply_error(&mut buf, ReplyCode::Failed(i32::MIN));
        assert_eq!(buf.to_str_lossy(), format!("error: {}", i32::MIN));
    }

    #[test]
    fn error_formatter_leaves_success_alone() {
        let mut buf = buffer_with("ok", 8);
        assert_eq!(
            write_reply_error(&mut buf, ReplyCode::Written(2)),
            ReplyCode::Written(2)
        );
        assert_eq!(buf.as_bytes(), b"ok");
    }

    #[test]
    fn error_formatter_without_room() {
        let mut buf = ReplyBuffer::with_capacity(4);
        assert_eq!(
            write_reply_error(&mut buf, ReplyCode::BufferError),
            ReplyCode::BufferError
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn framer_custom_filter() {
        let framer = PacketFramer::new().with_filter(|input| input.ends_with(b"\r\n"));
        assert!(framer.is_complete(b"ping\r\n"));
        assert!(!framer.is_complete(b"ping\n"));
    }

    #[test]
    fn framer_without_newline_only_terminates() {
        let framer = PacketFramer::new()
            .with_newline(false)
            .with_terminator(true);
        let mut buf = buffer_with("ok", 8);
        assert_eq!(framer.pack(&mut buf, ReplyCode::Written(2)), ReplyCode::Written(3));
        assert_eq!(buf.as_bytes(), b"ok\0");
    }

    #[test]
    fn framer_raw_passthrough() {
        let framer = PacketFramer::new().with_newline(false);
        let mut buf = buffer_with("ok", 8);
        assert_eq!(framer.pack(&mut buf, ReplyCode::Written(2)), ReplyCode::Written(2));
        assert_eq!(buf.as_bytes(), b"ok");
    }

    #[test]
    fn framer_from_config() {
        let config = ProtocolConfig {
            add_terminator: true,
            ..ProtocolConfig::default()
        };
        let framer = PacketFramer::from_config(&config);
        assert!(framer.add_newline);
        assert!(framer.add_terminator);
        assert!(framer.drop_newline);
        assert!(format!("{framer:?}").contains("add_terminator: true"));
    }
}
