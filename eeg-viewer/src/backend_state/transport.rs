use std::{
    io::ErrorKind,
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use app_core::string_error::ErrorStringExt;
use tungstenite::{http::Uri, HandshakeError, Message, WebSocket};

/// What a single read from the transport produced.
#[derive(Debug, PartialEq)]
pub enum Incoming {
    Text(String),
    /// Nothing arrived within the read timeout.
    Idle,
    /// The peer closed the connection.
    Closed,
}

/// A message based, bidirectional connection to the stream server.
///
/// All methods block for a bounded time only: `read` returns
/// [`Incoming::Idle`] when nothing arrived in time, so the backend loop can
/// still serve requests.
pub trait Transport: Send {
    fn connect(&mut self) -> Result<(), String>;
    fn send_text(&mut self, text: &str) -> Result<(), String>;
    /// After an `Err` the transport is unusable.
    fn read(&mut self) -> Result<Incoming, String>;
    fn close(&mut self) -> Result<(), String>;
}

/// WebSocket client over a plain TCP stream.
///
/// Establishing the connection, TCP connect and handshake together, gives up
/// after `connect_timeout`.
pub struct WsTransport {
    url: String,
    read_timeout: Duration,
    connect_timeout: Duration,
    socket: Option<WebSocket<TcpStream>>,
}

impl WsTransport {
    pub fn new(url: &str, read_timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            url: url.to_owned(),
            read_timeout: read_timeout.max(Duration::from_millis(1)),
            connect_timeout: connect_timeout.max(Duration::from_millis(1)),
            socket: None,
        }
    }
}

/// Address of the server named in `uri`. IPv6 hosts come bracketed in
/// urls, `ToSocketAddrs` wants them bare.
fn server_addr(uri: &Uri) -> Result<SocketAddr, String> {
    let host = uri
        .host()
        .ok_or(format!("server url '{uri}' has no host"))?
        .trim_start_matches('[')
        .trim_end_matches(']');
    let port = uri.port_u16().unwrap_or(80);
    (host, port)
        .to_socket_addrs()
        .err_to_string(&format!("could not resolve '{host}'"))?
        .next()
        .ok_or(format!("no address found for '{host}'"))
}

impl Transport for WsTransport {
    fn connect(&mut self) -> Result<(), String> {
        let uri: Uri = self.url.parse().err_to_string("invalid server url")?;
        match uri.scheme_str() {
            Some("ws") => (),
            other => {
                return Err(format!(
                    "unsupported url scheme {other:?}, only 'ws://' is supported"
                ))
            }
        }
        let addr = server_addr(&uri)?;
        let deadline = Instant::now() + self.connect_timeout;

        log::info!("connecting to {} ({addr})", self.url);
        let stream = TcpStream::connect_timeout(&addr, self.connect_timeout)
            .err_to_string("could not reach stream server")?;
        // Both timeouts must be in place before the handshake, a server that
        // never answers would block it otherwise.
        stream
            .set_read_timeout(Some(self.read_timeout))
            .err_to_string("could not set read timeout")?;
        stream
            .set_write_timeout(Some(self.connect_timeout))
            .err_to_string("could not set write timeout")?;

        let mut handshake = tungstenite::client(self.url.as_str(), stream);
        let socket = loop {
            match handshake {
                Ok((socket, _response)) => break socket,
                Err(HandshakeError::Interrupted(mid)) => {
                    if Instant::now() >= deadline {
                        return Err(format!(
                            "websocket handshake with {} timed out after {:?}",
                            self.url, self.connect_timeout
                        ));
                    }
                    handshake = mid.handshake();
                }
                Err(HandshakeError::Failure(err)) => {
                    return Err(format!("websocket handshake failed: {err}"))
                }
            }
        };
        self.socket = Some(socket);
        Ok(())
    }

    fn send_text(&mut self, text: &str) -> Result<(), String> {
        let Some(socket) = self.socket.as_mut() else {
            return Err("not connected".into());
        };
        socket
            .send(Message::Text(text.to_owned()))
            .err_to_string("could not send message")
    }

    fn read(&mut self) -> Result<Incoming, String> {
        let Some(socket) = self.socket.as_mut() else {
            return Ok(Incoming::Closed);
        };
        match socket.read() {
            Ok(Message::Text(text)) => Ok(Incoming::Text(text)),
            Ok(Message::Binary(bytes)) => {
                log::warn!("ignoring binary message ({} bytes)", bytes.len());
                Ok(Incoming::Idle)
            }
            Ok(Message::Close(frame)) => {
                log::debug!("server sent close frame: {frame:?}");
                Ok(Incoming::Idle)
            }
            // Pings are answered by tungstenite itself.
            Ok(_) => Ok(Incoming::Idle),
            Err(tungstenite::Error::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                Ok(Incoming::Idle)
            }
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                self.socket = None;
                Ok(Incoming::Closed)
            }
            Err(err) => {
                self.socket = None;
                Err(format!("could not read from websocket: {err}"))
            }
        }
    }

    fn close(&mut self) -> Result<(), String> {
        let Some(mut socket) = self.socket.take() else {
            log::debug!("websocket already closed");
            return Ok(());
        };
        log::debug!("closing websocket");
        socket.close(None).err_to_string("could not close websocket")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_round_trip_with_local_server() {
        let _ = env_logger::builder().is_test(true).try_init();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut ws = tungstenite::accept(stream).unwrap();
            ws.send(Message::Text(r#"{"streams": [{"name": "EEG"}]}"#.into()))
                .unwrap();
            let selection = ws.read().unwrap().into_text().unwrap();
            // wait for the client to close
            let mut saw_close = false;
            loop {
                match ws.read() {
                    Ok(Message::Close(_)) => saw_close = true,
                    Ok(_) => (),
                    Err(_) => break,
                }
            }
            (selection, saw_close)
        });

        let mut transport = WsTransport::new(
            &format!("ws://{addr}"),
            Duration::from_millis(20),
            CONNECT_TIMEOUT,
        );
        transport.connect().unwrap();
        let text = loop {
            match transport.read().unwrap() {
                Incoming::Text(text) => break text,
                Incoming::Idle => continue,
                Incoming::Closed => panic!("server closed too early"),
            }
        };
        assert!(text.contains("EEG"));

        transport.send_text(r#"{"stream_name":"EEG"}"#).unwrap();
        transport.close().unwrap();

        let (selection, saw_close) = server.join().unwrap();
        assert_eq!(selection, r#"{"stream_name":"EEG"}"#);
        assert!(saw_close);
        // closing twice is harmless
        assert!(transport.close().is_ok());
        assert_eq!(transport.read(), Ok(Incoming::Closed));
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut transport = WsTransport::new(
            "http://localhost:8765",
            Duration::from_millis(20),
            CONNECT_TIMEOUT,
        );
        let err = transport.connect().unwrap_err();
        assert!(err.contains("only 'ws://'"));
    }

    #[test]
    fn test_unreachable_server() {
        // bind and drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut transport = WsTransport::new(
            &format!("ws://127.0.0.1:{port}"),
            Duration::from_millis(20),
            CONNECT_TIMEOUT,
        );
        assert!(transport.connect().is_err());
        assert!(transport.send_text("{}").is_err());
    }

    #[test]
    fn test_silent_server_times_out() {
        let _ = env_logger::builder().is_test(true).try_init();

        // accepts the TCP connection, but never answers the handshake
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_secs(2));
            drop(stream);
        });

        let mut transport = WsTransport::new(
            &format!("ws://{addr}"),
            Duration::from_millis(20),
            Duration::from_millis(200),
        );
        let tic = Instant::now();
        let err = transport.connect().unwrap_err();
        assert!(tic.elapsed() < Duration::from_millis(1500), "{:?}", tic.elapsed());
        assert!(err.contains("timed out"), "{err}");
        assert!(transport.send_text("{}").is_err());
        server.join().unwrap();
    }

    #[test]
    fn test_server_addr_accepts_ipv6_hosts() {
        let uri: Uri = "ws://[::1]:8765/stream".parse().unwrap();
        let addr = server_addr(&uri).unwrap();
        assert_eq!(addr, "[::1]:8765".parse::<SocketAddr>().unwrap());

        let uri: Uri = "ws://127.0.0.1".parse().unwrap();
        assert_eq!(server_addr(&uri).unwrap().port(), 80);
    }
}
