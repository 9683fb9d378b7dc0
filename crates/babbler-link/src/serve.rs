//! Serve loops: packets in, replies out.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, TcpListener};

use babbler_core::{Engine, ReplyBuffer, ReplyCode};
use babbler_types::config::{DEFAULT_READ_BUFFER_SIZE, DEFAULT_WRITE_BUFFER_SIZE, ProtocolConfig};
use babbler_types::error::{BabblerError, Result};

use crate::reader::PacketReader;

/// Read and write buffer sizes for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSizes {
    /// Longest packet accepted before it is cut.
    pub read: usize,
    /// Reply capacity, framing included.
    pub write: usize,
}

impl BufferSizes {
    pub fn from_config(config: &ProtocolConfig) -> Self {
        Self {
            read: config.read_buffer_size,
            write: config.write_buffer_size,
        }
    }
}

impl Default for BufferSizes {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_BUFFER_SIZE,
            write: DEFAULT_WRITE_BUFFER_SIZE,
        }
    }
}

/// Serve packets from `reader` until end of stream.
///
/// Each packet is handled independently; only replies with a positive code
/// are written, and the writer is flushed after each one. Returns the
/// number of packets handled.
pub fn serve<R, W>(reader: R, mut writer: W, engine: &Engine<'_>, sizes: BufferSizes) -> Result<usize>
where
    R: Read,
    W: Write,
{
    let mut packets = PacketReader::new(reader, sizes.read);
    let mut reply = ReplyBuffer::with_capacity(sizes.write);
    let mut served = 0;

    while let Some(packet) = packets.next_packet(|buf| engine.is_complete(buf))? {
        served += 1;
        match engine.handle_input(packet, &mut reply) {
            ReplyCode::Written(_) => {
                writer.write_all(reply.as_bytes())?;
                writer.flush()?;
            },
            ReplyCode::NoReply => log::debug!("packet {served}: no reply"),
            code => log::warn!("packet {served}: reply dropped, code {}", code.raw()),
        }
    }

    Ok(served)
}

/// Accept TCP clients one after another and serve each to completion.
///
/// Stops after `limit` clients when given, otherwise runs until accept
/// fails. A client whose session errors is logged and dropped; the next
/// one is accepted as usual. Returns the number of clients served.
pub fn serve_connections(
    listener: &TcpListener,
    engine: &Engine<'_>,
    sizes: BufferSizes,
    limit: Option<usize>,
) -> Result<usize> {
    let mut clients = 0;
    while limit.is_none_or(|max| clients < max) {
        let (stream, peer) = listener.accept()?;
        clients += 1;
        log::info!("client {peer} connected");

        let result = stream
            .try_clone()
            .map_err(BabblerError::from)
            .and_then(|writer| serve(&stream, writer, engine, sizes));
        match result {
            Ok(n) => log::info!("client {peer} disconnected after {n} packets"),
            Err(e) => log::warn!("client {peer} dropped: {e}"),
        }
    }
    Ok(clients)
}

/// Listen on `port` on all interfaces and serve clients forever.
pub fn serve_tcp(port: u16, engine: &Engine<'_>, sizes: BufferSizes) -> Result<()> {
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
    log::info!("listening on {}", listener.local_addr()?);
    serve_connections(&listener, engine, sizes, None)?;
    Ok(())
}
