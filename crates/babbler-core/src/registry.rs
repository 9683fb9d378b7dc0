//! Command registry and dispatch.
//!
//! The registry is an ordered list built once at startup. Lookup is a linear
//! scan in registration order with exact, case-sensitive name comparison; the
//! first match wins. Dispatch only needs `&self`, so a registry shared by
//! reference is frozen for as long as it is shared.

use std::fmt;

use babbler_types::buffer::ReplyBuffer;
use babbler_types::reply::{REPLY_DONTUNDERSTAND, ReplyCode};

use crate::command::{Command, Environment};

/// Ordered registry of available commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command at the end of the lookup order.
    ///
    /// A duplicate name is kept but unreachable: the earlier registration
    /// keeps winning at dispatch.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        if self.find(cmd.name()).is_some() {
            log::warn!(
                "command '{}' registered twice, first registration wins",
                cmd.name()
            );
        }
        self.commands.push(cmd);
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First command whose name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|cmd| cmd.name() == name)
            .map(|cmd| cmd.as_ref())
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|cmd| cmd.as_ref())
    }

    /// (name, description) pairs in registration order.
    pub fn list_commands(&self) -> Vec<(&str, Option<&str>)> {
        self.commands()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Find `name` and run it with `argv`, replying into `reply`.
    ///
    /// The reply is cleared before anything is written. An unknown name is
    /// answered with `dontunderstand`; a handler's code, negative or not, is
    /// returned unchanged.
    pub fn dispatch(&self, name: &str, argv: &[&str], reply: &mut ReplyBuffer) -> ReplyCode {
        reply.clear();
        match self.find(name) {
            Some(cmd) => {
                log::debug!("dispatch '{name}' with {} args", argv.len().saturating_sub(1));
                let env = Environment { registry: self };
                cmd.execute(argv, reply, &env)
            },
            None => {
                log::debug!("unknown command: {name}");
                reply.reply(REPLY_DONTUNDERSTAND)
            },
        }
    }

    /// Dispatch a token list whose first element is the command name.
    ///
    /// No tokens means no command was given: nothing is written and the
    /// result is `NoReply`.
    pub fn dispatch_tokens(&self, tokens: &[&str], reply: &mut ReplyBuffer) -> ReplyCode {
        match tokens.first() {
            Some(&name) => self.dispatch(name, tokens, reply),
            None => {
                reply.clear();
                ReplyCode::NoReply
            },
        }
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.commands().map(|c| c.name()))
            .finish()
    }
}
