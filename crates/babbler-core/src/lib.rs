//! Command dispatch and protocol framing engine.
//!
//! The engine is a registry-based dispatch system. Commands implement the
//! `Command` trait and are registered by name. The engine unpacks a packet,
//! parses it as plain text or a JSON envelope, resolves the command name,
//! dispatches `execute()`, optionally wraps the reply, and packs it for the
//! transport. Every reply is written into a bounded `ReplyBuffer`.

mod batch;
pub mod builtins;
mod command;
pub mod devinfo;
mod engine;
pub mod framer;
pub mod json_input;
mod registry;
pub mod tokenizer;
pub mod wrap;

/// Split a batch on a separator and dispatch each piece in order.
pub use batch::run_batch;
/// Register `help` and `ping` into a registry.
pub use builtins::register_builtins;
/// A single executable command trait.
pub use command::Command;
/// Closure-backed command with optional help text.
pub use command::CommandDescriptor;
/// Context passed to every command.
pub use command::Environment;
/// A command name plus arguments (and optional correlation id).
pub use command::ParsedCommand;
/// Register device identity commands into a registry.
pub use devinfo::register_devinfo_commands;
/// Top-level input handling pipeline.
pub use engine::Engine;
/// Packet boundary detection and reply framing.
pub use framer::PacketFramer;
/// Ordered registry of commands with dispatch.
pub use registry::CommandRegistry;
/// Whitespace tokenizer with a token cap.
pub use tokenizer::tokenize;
/// Reply envelope decorators.
pub use wrap::ReplyWrapper;

pub use babbler_types::buffer::ReplyBuffer;
pub use babbler_types::reply::ReplyCode;
