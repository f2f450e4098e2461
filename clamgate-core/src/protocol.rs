//! clamd command framing and reply parsing.
//!
//! Commands use the `z` prefix, so both commands and replies are
//! null-terminated. `INSTREAM` payloads are sent as chunks, each preceded by
//! its length as a 4-byte big-endian integer, and closed by a zero-length
//! chunk.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ClamdError, Result};
use crate::types::{ScanResult, CLEAN_STATUS, FOUND_STATUS};

/// Size of each `INSTREAM` chunk.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Upper bound on a reply read from the daemon.
pub const MAX_REPLY_BYTES: usize = 64 * 1024;

const PONG: &str = "PONG";
const ERROR_SUFFIX: &str = "ERROR";

/// A command understood by clamd.
#[derive(Debug, Clone, Copy)]
pub enum Command<'a> {
    Ping,
    Version,
    Instream(&'a [u8]),
}

impl Command<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Version => "VERSION",
            Command::Instream(_) => "INSTREAM",
        }
    }
}

/// Write a command (and for `INSTREAM`, its payload) to the daemon.
pub async fn write_command<W>(writer: &mut W, command: Command<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format!("z{}\0", command.name()).as_bytes())
        .await?;

    if let Command::Instream(data) = command {
        for chunk in data.chunks(CHUNK_SIZE) {
            writer.write_all(&(chunk.len() as u32).to_be_bytes()).await?;
            writer.write_all(chunk).await?;
        }
        writer.write_all(&0u32.to_be_bytes()).await?;
    }

    writer.flush().await?;
    Ok(())
}

/// Read a reply up to the terminating null byte or end of stream.
pub async fn read_reply<R>(reader: &mut R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut reply = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        if let Some(end) = buf[..n].iter().position(|&b| b == 0) {
            reply.extend_from_slice(&buf[..end]);
            break;
        }
        reply.extend_from_slice(&buf[..n]);
        if reply.len() > MAX_REPLY_BYTES {
            return Err(ClamdError::ReplyTooLarge {
                limit: MAX_REPLY_BYTES,
            });
        }
    }

    if reply.len() > MAX_REPLY_BYTES {
        return Err(ClamdError::ReplyTooLarge {
            limit: MAX_REPLY_BYTES,
        });
    }

    String::from_utf8(reply)
        .map_err(|e| ClamdError::MalformedReply(String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// Interpret a `PING` reply.
pub fn parse_ping(reply: &str) -> bool {
    reply.trim() == PONG
}

/// Interpret a `VERSION` reply.
pub fn parse_version(reply: &str) -> Result<String> {
    let version = reply.trim();
    if version.is_empty() {
        return Err(ClamdError::MalformedReply(reply.to_string()));
    }
    if let Some(message) = version.strip_suffix(ERROR_SUFFIX) {
        return Err(ClamdError::Daemon(message.trim().to_string()));
    }
    Ok(version.to_string())
}

/// Interpret a scan reply, one result per non-empty line.
///
/// ```text
/// stream: OK
/// stream: Eicar-Test-Signature FOUND
/// INSTREAM size limit exceeded. ERROR
/// ```
pub fn parse_scan_reply(reply: &str) -> Result<Vec<ScanResult>> {
    let results = reply
        .split(['\0', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_scan_line)
        .collect::<Result<Vec<_>>>()?;

    if results.is_empty() {
        return Err(ClamdError::MalformedReply(reply.to_string()));
    }
    Ok(results)
}

fn parse_scan_line(line: &str) -> Result<ScanResult> {
    if let Some(message) = line.strip_suffix(ERROR_SUFFIX) {
        return Err(ClamdError::Daemon(message.trim().to_string()));
    }

    let (filename, verdict) = line
        .rsplit_once(": ")
        .ok_or_else(|| ClamdError::MalformedReply(line.to_string()))?;

    if verdict == CLEAN_STATUS {
        return Ok(ScanResult::new(filename, CLEAN_STATUS));
    }

    match verdict.strip_suffix(FOUND_STATUS).map(str::trim) {
        Some(signature) if !signature.is_empty() => Ok(ScanResult::found(filename, signature)),
        _ => Err(ClamdError::MalformedReply(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_ping() {
        let mut out = Vec::new();
        write_command(&mut out, Command::Ping).await.unwrap();
        assert_eq!(out, b"zPING\0");
    }

    #[tokio::test]
    async fn test_write_instream_chunks() {
        let data = vec![7u8; CHUNK_SIZE + 3];
        let mut out = Vec::new();
        write_command(&mut out, Command::Instream(&data)).await.unwrap();

        let header = b"zINSTREAM\0";
        assert_eq!(&out[..header.len()], header);

        let body = &out[header.len()..];
        assert_eq!(&body[..4], &(CHUNK_SIZE as u32).to_be_bytes());
        let second = 4 + CHUNK_SIZE;
        assert_eq!(&body[second..second + 4], &3u32.to_be_bytes());
        assert_eq!(&body[body.len() - 4..], &[0, 0, 0, 0]);
        assert_eq!(body.len(), 4 + CHUNK_SIZE + 4 + 3 + 4);
    }

    #[tokio::test]
    async fn test_write_empty_instream() {
        let mut out = Vec::new();
        write_command(&mut out, Command::Instream(&[])).await.unwrap();
        assert_eq!(out, b"zINSTREAM\0\0\0\0\0");
    }

    #[tokio::test]
    async fn test_read_reply_stops_at_null() {
        let mut input: &[u8] = b"stream: OK\0trailing";
        assert_eq!(read_reply(&mut input).await.unwrap(), "stream: OK");

        let mut input: &[u8] = b"PONG\n";
        assert_eq!(read_reply(&mut input).await.unwrap(), "PONG\n");
    }

    #[tokio::test]
    async fn test_read_reply_caps_size() {
        let big = vec![b'a'; MAX_REPLY_BYTES + 1];
        let mut input: &[u8] = &big;
        let err = read_reply(&mut input).await.unwrap_err();
        assert!(matches!(err, ClamdError::ReplyTooLarge { .. }));
    }

    #[test]
    fn test_parse_ping() {
        assert!(parse_ping("PONG"));
        assert!(parse_ping("PONG\n"));
        assert!(!parse_ping("PANG"));
        assert!(!parse_ping(""));
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("ClamAV 1.3.1/27400/Tue Sep 17 08:35:19 2024\n").unwrap(),
            "ClamAV 1.3.1/27400/Tue Sep 17 08:35:19 2024"
        );
        assert!(matches!(
            parse_version(""),
            Err(ClamdError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_parse_clean() {
        let results = parse_scan_reply("stream: OK").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename(), "stream");
        assert_eq!(results[0].status(), "OK");
        assert!(results[0].is_clean());
    }

    #[test]
    fn test_parse_found() {
        let results = parse_scan_reply("stream: Win.Test.EICAR_HDB-1 FOUND").unwrap();
        assert_eq!(results[0].status(), "FOUND");
        assert_eq!(results[0].signature(), Some("Win.Test.EICAR_HDB-1"));
        assert!(!results[0].is_clean());
    }

    #[test]
    fn test_parse_multiple_lines() {
        let results = parse_scan_reply("a: OK\nb: Eicar FOUND\n").unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_clean());
        assert!(!results[1].is_clean());
    }

    #[test]
    fn test_parse_daemon_error() {
        let err = parse_scan_reply("INSTREAM size limit exceeded. ERROR").unwrap_err();
        match err {
            ClamdError::Daemon(message) => assert_eq!(message, "INSTREAM size limit exceeded."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed() {
        for reply in ["", "\0", "stream OK", "stream: FOUND", "stream: MAYBE"] {
            assert!(
                matches!(parse_scan_reply(reply), Err(ClamdError::MalformedReply(_))),
                "{:?} should be malformed",
                reply
            );
        }
    }
}
