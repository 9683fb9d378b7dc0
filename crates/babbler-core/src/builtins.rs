//! Built-in commands: `help` and `ping`.

use babbler_types::buffer::ReplyBuffer;
use babbler_types::error::Result;
use babbler_types::reply::{REPLY_OK, ReplyCode};

use crate::command::{Command, Environment};
use crate::registry::CommandRegistry;

/// Register `help` and `ping` with their descriptions and manuals.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd { documented: true }));
    reg.register(Box::new(PingCmd { documented: true }));
}

/// Register `help` and `ping` without help text.
///
/// Behaviour is identical; they simply show up in `help` with no
/// description.
pub fn register_builtins_short(reg: &mut CommandRegistry) {
    reg.register(Box::new(HelpCmd { documented: false }));
    reg.register(Box::new(PingCmd { documented: false }));
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

const HELP_DESCRIPTION: &str = "list available commands or show detailed help on selected command";

const HELP_MANUAL: &str = "SYNOPSIS
    help
    help [cmd_name]
    help --list
DESCRIPTION
List available commands or show detailed help on selected command. \
Running help with no options would list commands with short description.
OPTIONS
    cmd_name - command name to show detailed help for
    --list - list all available commands separated by space";

struct HelpCmd {
    documented: bool,
}

impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> Option<&str> {
        self.documented.then_some(HELP_DESCRIPTION)
    }
    fn manual(&self) -> Option<&str> {
        self.documented.then_some(HELP_MANUAL)
    }
    fn execute(
        &self,
        args: &[&str],
        reply: &mut ReplyBuffer,
        env: &Environment<'_>,
    ) -> ReplyCode {
        let res = match args.get(1) {
            None => write_listing(env.registry, reply),
            Some(&"--list") => write_names(env.registry, reply),
            Some(&name) => write_manual(env.registry, name, reply),
        };
        reply.finish(res)
    }
}

fn write_listing(registry: &CommandRegistry, reply: &mut ReplyBuffer) -> Result<()> {
    reply.try_append_str("Commands: \n")?;
    for (name, description) in registry.list_commands() {
        reply.try_append_str(name)?;
        reply.try_push(b'\n')?;
        if let Some(description) = description {
            reply.try_append_str("    ")?;
            reply.try_append_str(description)?;
            reply.try_push(b'\n')?;
        }
    }
    Ok(())
}

fn write_names(registry: &CommandRegistry, reply: &mut ReplyBuffer) -> Result<()> {
    for (i, cmd) in registry.commands().enumerate() {
        if i > 0 {
            reply.try_push(b' ')?;
        }
        reply.try_append_str(cmd.name())?;
    }
    Ok(())
}

fn write_manual(registry: &CommandRegistry, name: &str, reply: &mut ReplyBuffer) -> Result<()> {
    let Some(cmd) = registry.find(name) else {
        reply.try_append_str("help: COMMAND NOT FOUND: ")?;
        reply.try_append_str(name)?;
        return reply.try_push(b'\n');
    };
    reply.try_append_str(cmd.name())?;
    reply.try_append_str(" - manual\n")?;
    if let (Some(description), Some(manual)) = (cmd.description(), cmd.manual()) {
        reply.try_append_str("NAME\n    ")?;
        reply.try_append_str(cmd.name())?;
        reply.try_append_str(" - ")?;
        reply.try_append_str(description)?;
        reply.try_push(b'\n')?;
        reply.try_append_str(manual)?;
        reply.try_push(b'\n')?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ping
// ---------------------------------------------------------------------------

struct PingCmd {
    documented: bool,
}

impl Command for PingCmd {
    fn name(&self) -> &str {
        "ping"
    }
    fn description(&self) -> Option<&str> {
        self.documented.then_some("check if device is available")
    }
    fn manual(&self) -> Option<&str> {
        self.documented.then_some(
            "SYNOPSIS\n    ping\nDESCRIPTION\nCheck if device is available, returns \"ok\" if device is ok",
        )
    }
    fn execute(
        &self,
        _args: &[&str],
        reply: &mut ReplyBuffer,
        _env: &Environment<'_>,
    ) -> ReplyCode {
        reply.reply(REPLY_OK)
    }
}
