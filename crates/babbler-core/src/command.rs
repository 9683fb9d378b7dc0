//! Command trait and descriptors.

use std::fmt;

use babbler_types::buffer::ReplyBuffer;
use babbler_types::reply::ReplyCode;

use crate::registry::CommandRegistry;

/// Context passed to every command.
pub struct Environment<'a> {
    /// The registry the command was dispatched from.
    pub registry: &'a CommandRegistry,
}

/// A single executable command.
///
/// `execute` receives the full argument vector: `args[0]` is always the
/// command name, real arguments start at `args[1]`. The reply buffer starts
/// empty and carries its own capacity.
pub trait Command {
    /// The command name (what the client sends). Matched case-sensitively.
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Full manual text for `help <name>`.
    fn manual(&self) -> Option<&str> {
        None
    }

    /// Execute the command, writing the reply into `reply`.
    fn execute(
        &self,
        args: &[&str],
        reply: &mut ReplyBuffer,
        env: &Environment<'_>,
    ) -> ReplyCode;
}

type Handler = Box<dyn Fn(&[&str], &mut ReplyBuffer) -> ReplyCode>;

/// A command built from a name and a closure.
///
/// For embedding applications that do not want a struct per command.
pub struct CommandDescriptor {
    name: String,
    handler: Handler,
    description: Option<String>,
    manual: Option<String>,
}

impl CommandDescriptor {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&[&str], &mut ReplyBuffer) -> ReplyCode + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
            description: None,
            manual: None,
        }
    }

    /// Command that always replies with the same text.
    pub fn constant(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(name, move |_args, reply| reply.reply(&text))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_manual(mut self, manual: impl Into<String>) -> Self {
        self.manual = Some(manual.into());
        self
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Command for CommandDescriptor {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    fn manual(&self) -> Option<&str> {
        self.manual.as_deref()
    }
    fn execute(
        &self,
        args: &[&str],
        reply: &mut ReplyBuffer,
        _env: &Environment<'_>,
    ) -> ReplyCode {
        (self.handler)(args, reply)
    }
}

/// A parsed request: command name, argument vector, correlation id.
///
/// `argv[0]` is the name, on every input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub argv: Vec<String>,
    /// Client-supplied correlation id, echoed back by id-aware wrappers.
    pub id: Option<String>,
}

impl ParsedCommand {
    /// A command with no arguments beyond its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            argv: vec![name.clone()],
            name,
            id: None,
        }
    }

    /// Borrowed view of `argv`, in the form handlers take.
    pub fn argv_refs(&self) -> Vec<&str> {
        self.argv.iter().map(String::as_str).collect()
    }

    /// Number of real arguments (the name excluded).
    pub fn arg_count(&self) -> usize {
        self.argv.len().saturating_sub(1)
    }
}
