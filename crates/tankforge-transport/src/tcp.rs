//! Newline-delimited TCP transport built on `tokio-util`'s `LinesCodec`.
//!
//! Every frame is one line of UTF-8 text terminated by `\n`. Reads and
//! writes use separate halves of the socket, each behind its own lock, so
//! a task blocked in `recv` never stalls a concurrent `send`.
//!
//! The read side drives the codec by hand instead of through `FramedRead`:
//! a framed stream ends after its first decode error, but an over-long line
//! must only cost the offending frame, not the connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::SinkExt;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, FramedWrite, LinesCodec, LinesCodecError};

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Upper bound on a single inbound line unless configured otherwise.
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024;

/// A TCP [`Transport`] producing newline-framed connections.
pub struct TcpLineTransport {
    listener: TcpListener,
    max_frame_len: usize,
}

impl TcpLineTransport {
    /// Binds a new transport to the given address.
    pub async fn bind(
        addr: &str,
        max_frame_len: usize,
    ) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP line transport listening");
        Ok(Self {
            listener,
            max_frame_len,
        })
    }
}

impl Transport for TcpLineTransport {
    type Connection = LineConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let conn = LineConnection::from_stream(stream, self.max_frame_len);
        tracing::debug!(id = %conn.id(), %addr, "accepted TCP connection");
        Ok(conn)
    }

    fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Read half of a connection plus its partially-decoded input.
struct LineReader {
    half: OwnedReadHalf,
    codec: LinesCodec,
    buf: BytesMut,
    eof: bool,
}

impl LineReader {
    async fn next_line(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let decoded = if self.eof {
                self.codec.decode_eof(&mut self.buf)
            } else {
                self.codec.decode(&mut self.buf)
            };
            match decoded {
                Ok(Some(line)) => return Ok(Some(line)),
                Ok(None) if self.eof => return Ok(None),
                Ok(None) => {}
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    return Err(TransportError::FrameTooLong {
                        max: self.codec.max_length(),
                    });
                }
                // The codec has already consumed the bad line.
                Err(LinesCodecError::Io(e))
                    if e.kind() == std::io::ErrorKind::InvalidData =>
                {
                    return Err(TransportError::NotUtf8);
                }
                Err(LinesCodecError::Io(e)) => {
                    return Err(TransportError::ReceiveFailed(e));
                }
            }

            let n = self
                .half
                .read_buf(&mut self.buf)
                .await
                .map_err(TransportError::ReceiveFailed)?;
            if n == 0 {
                self.eof = true;
            }
        }
    }
}

/// A single newline-framed TCP connection.
pub struct LineConnection {
    id: ConnectionId,
    reader: Mutex<LineReader>,
    writer: Mutex<FramedWrite<OwnedWriteHalf, LinesCodec>>,
}

impl LineConnection {
    /// Wraps an already-connected stream. Used by the accept loop and by
    /// clients that dial the server themselves.
    pub fn from_stream(stream: TcpStream, max_frame_len: usize) -> Self {
        let (read_half, write_half) = stream.into_split();
        let id = ConnectionId::new(
            NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
        );
        Self {
            id,
            reader: Mutex::new(LineReader {
                half: read_half,
                codec: LinesCodec::new_with_max_length(max_frame_len),
                buf: BytesMut::with_capacity(4096),
                eof: false,
            }),
            writer: Mutex::new(FramedWrite::new(
                write_half,
                LinesCodec::new(),
            )),
        }
    }

    /// Dials `addr` and wraps the resulting stream.
    pub async fn connect(
        addr: &str,
        max_frame_len: usize,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        Ok(Self::from_stream(stream, max_frame_len))
    }
}

impl Connection for LineConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        let line =
            std::str::from_utf8(data).map_err(|_| TransportError::InvalidFrame)?;
        self.writer
            .lock()
            .await
            .send(line)
            .await
            .map_err(|e| match e {
                LinesCodecError::Io(io) => TransportError::SendFailed(io),
                LinesCodecError::MaxLineLengthExceeded => {
                    TransportError::InvalidFrame
                }
            })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let line = self.reader.lock().await.next_line().await?;
        Ok(line.map(String::into_bytes))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        SinkExt::<&str>::close(&mut *self.writer.lock().await)
            .await
            .map_err(|e| match e {
                LinesCodecError::Io(io) => TransportError::SendFailed(io),
                LinesCodecError::MaxLineLengthExceeded => {
                    TransportError::InvalidFrame
                }
            })
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
