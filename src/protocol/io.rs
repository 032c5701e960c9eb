use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{AppError, AppResult, ProtocolError};

use super::types::{Request, Response};

pub const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// Reads one request line. `Ok(None)` means the peer closed the stream.
///
/// # Errors
///
/// Returns a `ProtocolError` when the line is too long, not UTF-8, or not a
/// known request. The stream stays usable for the next line.
pub async fn read_request<R>(reader: &mut R) -> AppResult<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    read_request_within(reader, MAX_MESSAGE_BYTES).await
}

/// Reads at most `max_bytes + 1` bytes of the line. An oversized line is
/// skipped up to its newline before the error is returned.
pub(super) async fn read_request_within<R>(
    reader: &mut R,
    max_bytes: usize,
) -> AppResult<Option<Request>>
where
    R: AsyncBufRead + Unpin,
{
    let limit = u64::try_from(max_bytes)
        .unwrap_or(u64::MAX)
        .saturating_add(1);
    let mut buffer: Vec<u8> = Vec::with_capacity(max_bytes.min(1024));
    let bytes = (&mut *reader)
        .take(limit)
        .read_until(b'\n', &mut buffer)
        .await
        .map_err(|err| {
            AppError::protocol(ProtocolError::Io {
                context: "read request",
                source: err,
            })
        })?;
    if bytes == 0 {
        return Ok(None);
    }
    if buffer.len() > max_bytes {
        if !buffer.ends_with(b"\n") {
            skip_line(reader).await?;
        }
        return Err(AppError::protocol(ProtocolError::MessageTooLarge { max_bytes }));
    }
    if buffer.ends_with(b"\n") {
        buffer.pop();
        if buffer.ends_with(b"\r") {
            buffer.pop();
        }
    }
    let line = std::str::from_utf8(&buffer)
        .map_err(|err| AppError::protocol(ProtocolError::InvalidUtf8 { source: err }))?;
    serde_json::from_str::<Request>(line)
        .map(Some)
        .map_err(|err| {
            AppError::protocol(ProtocolError::Deserialize {
                context: "request",
                source: err,
            })
        })
}

/// Discards buffered input through the next newline or end of stream.
async fn skip_line<R>(reader: &mut R) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (used, found) = {
            let available = reader.fill_buf().await.map_err(|err| {
                AppError::protocol(ProtocolError::Io {
                    context: "skip oversized request",
                    source: err,
                })
            })?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|byte| *byte == b'\n') {
                Some(index) => (index.saturating_add(1), true),
                None => (available.len(), false),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Writes `response` as one JSON line and flushes.
///
/// # Errors
///
/// Returns a `ProtocolError` when encoding or writing fails.
pub async fn send_response<W>(writer: &mut W, response: &Response) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_string(response).map_err(|err| {
        AppError::protocol(ProtocolError::Serialize {
            context: "response",
            source: err,
        })
    })?;
    payload.push('\n');
    writer.write_all(payload.as_bytes()).await.map_err(|err| {
        AppError::protocol(ProtocolError::Io {
            context: "send response",
            source: err,
        })
    })?;
    writer.flush().await.map_err(|err| {
        AppError::protocol(ProtocolError::Io {
            context: "flush response",
            source: err,
        })
    })
}
