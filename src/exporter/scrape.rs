//! Connection checking against the Redis target.
//!
//! The check dials the target (TLS when client material is configured),
//! authenticates, optionally names the connection, and expects a PONG.
//! Everything runs under the configured connection timeout.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;

use crate::exporter::options::Options;

const MAX_REPLY_LEN: usize = 512;

/// Error type for a failed connection check.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("connection timed out")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid TLS server name {0:?}")]
    InvalidServerName(String),

    #[error("unexpected reply to {command}: {reply:?}")]
    UnexpectedReply { command: &'static str, reply: String },
}

/// Run the full connection check under the configured timeout.
pub(crate) async fn check_connection(
    addr: &str,
    options: &Options,
    tls: Option<&TlsConnector>,
) -> Result<(), ScrapeError> {
    tokio::time::timeout(options.connection_timeout, dial_and_ping(addr, options, tls))
        .await
        .map_err(|_| ScrapeError::Timeout)?
}

async fn dial_and_ping(
    addr: &str,
    options: &Options,
    tls: Option<&TlsConnector>,
) -> Result<(), ScrapeError> {
    let stream = TcpStream::connect(addr).await?;

    match tls {
        Some(connector) => {
            let host = addr.rsplit_once(':').map(|(host, _)| host).unwrap_or(addr);
            let server_name = ServerName::try_from(host.to_string())
                .map_err(|_| ScrapeError::InvalidServerName(host.to_string()))?;
            let stream = connector.connect(server_name, stream).await?;
            handshake(stream, options).await
        }
        None => handshake(stream, options).await,
    }
}

async fn handshake<S>(mut stream: S, options: &Options) -> Result<(), ScrapeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if !options.password.is_empty() {
        let mut args = vec!["AUTH"];
        if !options.user.is_empty() {
            args.push(&options.user);
        }
        args.push(&options.password);
        expect_reply(&mut stream, "AUTH", &args, "+OK").await?;
    }

    if options.set_client_name {
        let args = ["CLIENT", "SETNAME", "redis_exporter"];
        expect_reply(&mut stream, "CLIENT SETNAME", &args, "+OK").await?;
    }

    expect_reply(&mut stream, "PING", &["PING"], "+PONG").await?;
    Ok(())
}

async fn expect_reply<S>(
    stream: &mut S,
    command: &'static str,
    args: &[&str],
    expected: &str,
) -> Result<(), ScrapeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&encode_command(args)).await?;
    stream.flush().await?;

    let reply = read_reply_line(stream).await?;
    if reply != expected {
        return Err(ScrapeError::UnexpectedReply { command, reply });
    }
    Ok(())
}

/// Encode a command as a RESP array of bulk strings.
fn encode_command(args: &[&str]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        buf.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.extend_from_slice(arg.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// Read a single CRLF-terminated reply line, bounded to keep a misbehaving
/// peer from holding the scrape open.
async fn read_reply_line<S>(stream: &mut S) -> Result<String, ScrapeError>
where
    S: AsyncRead + Unpin,
{
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        stream.read_exact(&mut byte).await?;
        match byte[0] {
            b'\n' => break,
            b'\r' => {}
            other => line.push(other),
        }
        if line.len() > MAX_REPLY_LEN {
            return Err(ScrapeError::UnexpectedReply {
                command: "reply",
                reply: format!("{} bytes without line end", line.len()),
            });
        }
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_ping_as_resp_array() {
        assert_eq!(encode_command(&["PING"]), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn encodes_multi_arg_commands() {
        assert_eq!(
            encode_command(&["CLIENT", "SETNAME", "redis_exporter"]),
            b"*3\r\n$6\r\nCLIENT\r\n$7\r\nSETNAME\r\n$14\r\nredis_exporter\r\n"
        );
    }

    #[tokio::test]
    async fn reads_simple_string_reply() {
        let mut reader: &[u8] = b"+PONG\r\n";
        let reply = read_reply_line(&mut reader).await.unwrap();
        assert_eq!(reply, "+PONG");
    }

    #[tokio::test]
    async fn truncated_reply_is_an_io_error() {
        let mut reader: &[u8] = b"+PON";
        let err = read_reply_line(&mut reader).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
    }
}
