//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Start a minimal mock Redis server on an ephemeral port.
///
/// Understands just enough RESP for the exporter's connection check:
/// AUTH (against `password`, when set), CLIENT SETNAME, and PING.
pub async fn start_mock_redis(password: Option<&'static str>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(handle_connection(socket, password));
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn handle_connection(socket: TcpStream, password: Option<&'static str>) {
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let Some(args) = read_command(&mut reader).await else {
            break;
        };
        let command = args.first().map(|arg| arg.to_ascii_uppercase());
        let reply = match command.as_deref() {
            Some("AUTH") => match password {
                Some(expected) if args.last().map(String::as_str) == Some(expected) => "+OK\r\n",
                Some(_) => "-ERR invalid password\r\n",
                None => "-ERR Client sent AUTH, but no password is set\r\n",
            },
            Some("CLIENT") => "+OK\r\n",
            Some("PING") => "+PONG\r\n",
            _ => "-ERR unknown command\r\n",
        };
        if write_half.write_all(reply.as_bytes()).await.is_err() {
            break;
        }
    }
}

/// Read one RESP array of bulk strings.
async fn read_command<R>(reader: &mut R) -> Option<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut header = String::new();
    if reader.read_line(&mut header).await.ok()? == 0 {
        return None;
    }
    let count: usize = header.strip_prefix('*')?.trim().parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let mut len_line = String::new();
        reader.read_line(&mut len_line).await.ok()?;
        let len: usize = len_line.strip_prefix('$')?.trim().parse().ok()?;

        let mut payload = vec![0u8; len + 2];
        reader.read_exact(&mut payload).await.ok()?;
        payload.truncate(len);
        args.push(String::from_utf8(payload).ok()?);
    }
    Some(args)
}
