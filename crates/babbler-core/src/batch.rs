//! Multi-command batches: `name;ping;model` -> `DeviceX;ok;ModelY`.

use babbler_types::buffer::ReplyBuffer;
use babbler_types::error::{BabblerError, Result};
use babbler_types::reply::ReplyCode;

use crate::framer::write_reply_error;

/// Split `input` on `separator`, run each command through `run_one`, and join
/// the replies with the same separator.
///
/// Reply `i` always belongs to command `i`. Empty pieces (from leading,
/// trailing or doubled separators) are not commands and are skipped; a piece
/// of only whitespace is still run. A command that replies nothing
/// contributes an empty segment; a command that fails contributes its
/// rendered error (`replybuferror`, `error: <code>`).
///
/// Each command gets a scratch buffer of the same capacity as `reply`. If
/// the next separator and segment do not both fit, the batch stops there and
/// returns `BufferError`; the segments already joined stay in the buffer and
/// never end in a dangling separator.
pub fn run_batch<F>(input: &str, separator: &str, reply: &mut ReplyBuffer, mut run_one: F) -> ReplyCode
where
    F: FnMut(&str, &mut ReplyBuffer) -> ReplyCode,
{
    reply.clear();
    let mut scratch = ReplyBuffer::with_capacity(reply.capacity());

    let commands = input
        .split(separator)
        .filter(|piece| !piece.is_empty());

    for (i, command) in commands.enumerate() {
        scratch.clear();
        let code = run_one(command, &mut scratch);
        if code.is_error() {
            write_reply_error(&mut scratch, code);
        } else if code == ReplyCode::NoReply {
            scratch.clear();
        }

        if let Err(e) = append_segment(reply, i, separator, &scratch) {
            log::warn!("batch reply truncated after {i} commands: {e}");
            return ReplyCode::BufferError;
        }
    }

    reply.code()
}

fn append_segment(
    reply: &mut ReplyBuffer,
    index: usize,
    separator: &str,
    segment: &ReplyBuffer,
) -> Result<()> {
    let separator = if index > 0 { separator } else { "" };
    let needed = separator.len() + segment.len();
    if needed > reply.remaining() {
        return Err(BabblerError::BufferOverflow {
            requested: needed,
            remaining: reply.remaining(),
        });
    }
    reply.try_append_str(separator)?;
    reply.try_append(segment.as_bytes())
}
