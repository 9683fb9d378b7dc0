//! Byte-stream transport for the Babbler engine.
//!
//! `PacketReader` turns any `Read` into a sequence of packets using the
//! engine's framing predicate. `serve` runs those packets through an
//! `Engine` and writes replies back; `serve_tcp` does the same for one TCP
//! client at a time.

mod reader;
mod serve;

pub use reader::{PacketReader, PacketState};
pub use serve::{BufferSizes, serve, serve_connections, serve_tcp};
