//! Top-level request pipeline.
//!
//! `Engine` ties the pieces together for one packet:
//! unpack -> tokenize or JSON parse (or batch split) -> dispatch -> wrap ->
//! error formatting -> pack. It borrows a frozen [`CommandRegistry`] and owns
//! only settings; every request works in the caller's [`ReplyBuffer`].

use babbler_types::buffer::ReplyBuffer;
use babbler_types::config::{
    DEFAULT_MAX_TOKENS, FRAMING_RESERVE, ProtocolConfig, ProtocolMode, WrapMode,
};
use babbler_types::reply::{REPLY_DONTUNDERSTAND, ReplyCode};

use crate::batch;
use crate::framer::{PacketFramer, write_reply_error};
use crate::json_input::{JsonCommand, parse_command_str};
use crate::registry::CommandRegistry;
use crate::tokenizer::tokenize;
use crate::wrap::ReplyWrapper;

/// Request handler bound to a registry.
#[derive(Debug)]
pub struct Engine<'r> {
    registry: &'r CommandRegistry,
    mode: ProtocolMode,
    separator: String,
    max_tokens: usize,
    wrapper: Option<ReplyWrapper>,
    framer: PacketFramer,
}

impl<'r> Engine<'r> {
    /// Plain-text mode, `;` batches, 20 tokens, raw replies, newline framing.
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Self {
            registry,
            mode: ProtocolMode::Simple,
            separator: ";".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            wrapper: None,
            framer: PacketFramer::new(),
        }
    }

    /// Engine configured from the `[protocol]` section.
    ///
    /// JSON mode with no explicit wrapper answers with the JSON+id envelope,
    /// so requests and replies stay correlated.
    pub fn from_config(registry: &'r CommandRegistry, config: &ProtocolConfig) -> Self {
        let wrap = match (config.mode, config.wrap) {
            (ProtocolMode::Json, WrapMode::None) => WrapMode::JsonId,
            (_, wrap) => wrap,
        };
        Self {
            registry,
            mode: config.mode,
            separator: config.separator.clone(),
            max_tokens: config.max_tokens,
            wrapper: ReplyWrapper::from_mode(wrap),
            framer: PacketFramer::from_config(config),
        }
    }

    pub fn with_wrapper(mut self, wrapper: Option<ReplyWrapper>) -> Self {
        self.wrapper = wrapper;
        self
    }

    pub fn with_mode(mut self, mode: ProtocolMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_framer(mut self, framer: PacketFramer) -> Self {
        self.framer = framer;
        self
    }

    pub fn registry(&self) -> &'r CommandRegistry {
        self.registry
    }

    pub fn mode(&self) -> ProtocolMode {
        self.mode
    }

    pub fn framer(&self) -> &PacketFramer {
        &self.framer
    }

    /// Whether `input` holds a complete packet.
    pub fn is_complete(&self, input: &[u8]) -> bool {
        self.framer.is_complete(input)
    }

    // -- single commands ----------------------------------------------------

    /// Tokenize a text line, dispatch it and wrap the reply.
    ///
    /// A blank line is `NoReply`.
    pub fn handle_command(&self, line: &str, reply: &mut ReplyBuffer) -> ReplyCode {
        let tokens = tokenize(line, self.max_tokens);
        let code = self.registry.dispatch_tokens(&tokens, reply);
        let name = tokens.first().copied().unwrap_or_default();
        self.wrap(name, None, reply, code)
    }

    /// Parse a JSON envelope, dispatch it and wrap the reply with its id.
    ///
    /// An envelope without a usable `cmd` is answered with `dontunderstand`
    /// under an empty command name, still carrying any id it had. A failed
    /// command has its error text rendered first so the reply still goes out
    /// in an envelope with the request id.
    pub fn handle_command_json(&self, text: &str, reply: &mut ReplyBuffer) -> ReplyCode {
        match parse_command_str(text, self.max_tokens) {
            JsonCommand::Found(cmd) => {
                let argv = cmd.argv_refs();
                let mut code = self.registry.dispatch(&cmd.name, &argv, reply);
                if code.is_error() {
                    code = write_reply_error(reply, code);
                }
                self.wrap(&cmd.name, cmd.id.as_deref(), reply, code)
            },
            JsonCommand::NotFound { id } => {
                let code = reply.reply(REPLY_DONTUNDERSTAND);
                self.wrap("", id.as_deref(), reply, code)
            },
        }
    }

    /// Run a separator-joined batch through [`Self::handle_command`].
    pub fn run_batch(&self, input: &str, reply: &mut ReplyBuffer) -> ReplyCode {
        batch::run_batch(input, &self.separator, reply, |line, out| {
            self.handle_command(line, out)
        })
    }

    fn wrap(
        &self,
        cmd: &str,
        id: Option<&str>,
        reply: &mut ReplyBuffer,
        code: ReplyCode,
    ) -> ReplyCode {
        match (self.wrapper, code) {
            (Some(wrapper), ReplyCode::Written(_)) => wrapper.wrap(cmd, id, reply),
            _ => code,
        }
    }

    // -- packets ------------------------------------------------------------

    /// Handle one raw packet according to the configured mode.
    pub fn handle_input(&self, input: &[u8], reply: &mut ReplyBuffer) -> ReplyCode {
        match self.mode {
            ProtocolMode::Simple => self.handle_input_simple(input, reply),
            ProtocolMode::Json => self.handle_input_json(input, reply),
            ProtocolMode::Multi => self.handle_input_multicmd(input, reply),
        }
    }

    /// Packet carrying one plain-text command.
    pub fn handle_input_simple(&self, input: &[u8], reply: &mut ReplyBuffer) -> ReplyCode {
        self.handle_framed(input, reply, |text, out| self.handle_command(text, out))
    }

    /// Packet carrying one JSON envelope.
    pub fn handle_input_json(&self, input: &[u8], reply: &mut ReplyBuffer) -> ReplyCode {
        self.handle_framed(input, reply, |text, out| {
            self.handle_command_json(text, out)
        })
    }

    /// Packet carrying a separator-joined batch.
    pub fn handle_input_multicmd(&self, input: &[u8], reply: &mut ReplyBuffer) -> ReplyCode {
        self.handle_framed(input, reply, |text, out| self.run_batch(text, out))
    }

    /// Shared packet path: the handler sees the payload and a buffer with
    /// [`FRAMING_RESERVE`] bytes held back for the newline and terminator.
    /// Error text must fit in what the handler had; if it does not, the
    /// result is `BufferError` and nothing is sent.
    fn handle_framed<F>(&self, input: &[u8], reply: &mut ReplyBuffer, handle: F) -> ReplyCode
    where
        F: FnOnce(&str, &mut ReplyBuffer) -> ReplyCode,
    {
        let payload = self.framer.unpack(input);
        let text: &str = &String::from_utf8_lossy(payload);

        let capacity = reply.capacity();
        reply.clear();
        reply.set_capacity(capacity.saturating_sub(FRAMING_RESERVE));

        let mut code = handle(text, reply);
        if code.is_error() {
            log::debug!("request failed with code {}", code.raw());
            code = write_reply_error(reply, code);
        }

        reply.set_capacity(capacity);
        self.framer.pack(reply, code)
    }
}
