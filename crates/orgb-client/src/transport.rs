//! Framed blocking transport over TCP.
//!
//! Wraps a `TcpStream` and moves whole frames: one length-exact read for the
//! 16-byte header, one for the declared body. Framing is by length, not
//! delimiter, so a partially read frame cannot be resumed: any failure
//! mid-frame marks the transport broken and the connection must be
//! re-established.

use std::{
    io::{ErrorKind, Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

use bytes::BytesMut;
use orgb_proto::{Frame, Header, ProtocolError};
use tracing::trace;

use crate::error::{ClientError, Result};

/// Default cap on a frame's declared body size: 16 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// A frame-oriented view of one TCP connection to the daemon.
#[derive(Debug)]
pub struct FramedTransport {
    stream: TcpStream,
    max_body_size: usize,
    broken: bool,
}

impl FramedTransport {
    /// Connect to the daemon, trying every resolved address within the
    /// timeout.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|err| ClientError::Transport(format!("resolving {host}:{port}: {err}")))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    let _ = stream.set_nodelay(true);
                    trace!(%addr, "transport connected");
                    return Ok(Self {
                        stream,
                        max_body_size: DEFAULT_MAX_BODY_SIZE,
                        broken: false,
                    });
                },
                Err(err) => last_err = Some(err),
            }
        }

        Err(match last_err {
            Some(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                ClientError::Timeout
            },
            Some(err) => ClientError::Transport(err.to_string()),
            None => ClientError::Transport(format!("{host}:{port} resolved to no addresses")),
        })
    }

    /// Replace the body size cap (default 16 MiB).
    pub fn set_max_body_size(&mut self, max_body_size: usize) {
        self.max_body_size = max_body_size;
    }

    /// Whether a previous failure already broke this transport.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Write one whole frame.
    ///
    /// The frame is serialized into a single buffer and written with short
    /// writes retried, so frames are never interleaved on the stream.
    pub fn send_frame(&mut self, frame: &Frame) -> Result<()> {
        if self.broken {
            return Err(ClientError::Disconnected);
        }

        let mut buf = BytesMut::with_capacity(frame.wire_size());
        frame.encode(&mut buf);
        trace!(
            message_type = frame.header.message_type(),
            body_size = frame.header.body_size(),
            "send frame"
        );

        let mut offset = 0;
        while offset < buf.len() {
            match self.stream.write(&buf[offset..]) {
                Ok(0) => return Err(self.fail(ClientError::Disconnected)),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.fail(err.into())),
            }
        }
        Ok(())
    }

    /// Read one whole frame, or `None` if the deadline fires while the
    /// stream is still idle.
    ///
    /// The idle case (deadline reached before the first header byte) is
    /// the only one that leaves the connection usable; it exists so a
    /// notification poll can come up empty without killing the link. A
    /// deadline firing mid-frame, an oversized body, EOF, or any read error
    /// breaks the transport.
    pub fn recv_frame(&mut self, deadline: Instant) -> Result<Option<Frame>> {
        if self.broken {
            return Err(ClientError::Disconnected);
        }

        let mut header_bytes = [0u8; Header::SIZE];
        if !self.fill(&mut header_bytes, deadline, true)? {
            return Ok(None);
        }

        let header = match Header::from_bytes(&header_bytes) {
            Ok(header) => *header,
            Err(err) => return Err(self.fail(err.into())),
        };

        let body_size = header.body_size() as usize;
        if body_size > self.max_body_size {
            return Err(self.fail(ClientError::Protocol(ProtocolError::OverSized {
                size: body_size,
                max: self.max_body_size,
            })));
        }

        let mut body = vec![0u8; body_size];
        if body_size > 0 {
            self.fill(&mut body, deadline, false)?;
        }

        trace!(
            message_type = header.message_type(),
            body_size = header.body_size(),
            "recv frame"
        );
        Ok(Some(Frame::new(header, body)))
    }

    /// Shut the connection down; the transport is unusable afterwards.
    pub fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
        self.broken = true;
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        self.broken = true;
        err
    }

    /// Read exactly `buf.len()` bytes before the deadline.
    ///
    /// Returns `Ok(false)` only when `idle_ok` is set and the deadline
    /// fired with nothing read.
    fn fill(&mut self, buf: &mut [u8], deadline: Instant, idle_ok: bool) -> Result<bool> {
        let mut filled = 0;
        while filled < buf.len() {
            let now = Instant::now();
            if now >= deadline {
                if idle_ok && filled == 0 {
                    return Ok(false);
                }
                return Err(self.fail(ClientError::Timeout));
            }

            if let Err(err) = self.stream.set_read_timeout(Some(deadline - now)) {
                return Err(self.fail(err.into()));
            }

            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(self.fail(ClientError::Disconnected)),
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if idle_ok && filled == 0 {
                        return Ok(false);
                    }
                    return Err(self.fail(ClientError::Timeout));
                },
                Err(err) => return Err(self.fail(err.into())),
            }
        }
        Ok(true)
    }
}
