//! Blocking client for the OpenRGB daemon.
//!
//! [`Client`] drives the pure [`Session`] state machine over a
//! [`FramedTransport`]: it executes the actions the machine returns, feeds
//! inbound frames back into it, and surfaces replies and notifications to
//! the caller.
//!
//! # Threading
//!
//! A `Client` is single-threaded by design: the protocol correlates replies
//! by FIFO order per message type, so interleaving requests from multiple
//! threads without external locking would scramble reply assignment. Use it
//! from one thread, or wrap it in a mutex.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use orgb_proto::{Color, DeviceDescription, Message, ModeDescription};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, Result},
    session::{Inbound, Notification, Session, SessionAction},
    transport::FramedTransport,
};

/// Default TCP port of the OpenRGB daemon.
pub const DEFAULT_PORT: u16 = 6742;

/// Default deadline for connecting and completing the version handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);

/// Default deadline for data requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Live {
    transport: FramedTransport,
    session: Session,
    notifications: VecDeque<Notification>,
}

/// A handle to one connection to the OpenRGB daemon.
///
/// Starts disconnected; [`Client::connect`] opens the transport and runs
/// the version handshake. Any fatal error tears the connection down, after
/// which every call returns [`ClientError::NotConnected`] until the handle
/// is connected again.
#[derive(Debug, Default)]
pub struct Client {
    live: Option<Live>,
}

impl Client {
    /// Create a disconnected handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the handle currently holds a live connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.live.is_some()
    }

    /// Negotiated protocol version of the live connection.
    #[must_use]
    pub fn negotiated_version(&self) -> Option<u32> {
        self.live.as_ref().and_then(|live| live.session.negotiated_version())
    }

    /// Connect to a daemon and run the version handshake.
    ///
    /// `client_name`, when given, is announced to the server once the
    /// handshake completes. If the server closes the stream instead of
    /// answering the version request (legacy daemons drop unknown message
    /// types), the client redials once and proceeds at version 0.
    ///
    /// # Errors
    ///
    /// `AlreadyConnected` if the handle is live; otherwise any transport or
    /// handshake failure. On error the handle stays disconnected.
    pub fn connect(
        &mut self,
        host: &str,
        port: u16,
        client_name: Option<&str>,
        timeout: Duration,
    ) -> Result<()> {
        if self.live.is_some() {
            return Err(ClientError::AlreadyConnected);
        }

        let deadline = Instant::now() + timeout;
        let mut transport = FramedTransport::connect(host, port, timeout)?;
        let mut session = Session::new(client_name.map(str::to_owned));
        let mut notifications = VecDeque::new();

        let actions = session.stream_ready()?;
        execute(&mut transport, actions)?;

        loop {
            match transport.recv_frame(deadline) {
                Ok(Some(frame)) => {
                    let (inbound, actions) = session.handle_frame(&frame)?;
                    execute(&mut transport, actions)?;
                    match inbound {
                        Inbound::Reply { .. } => break,
                        Inbound::Notification(note) => notifications.push_back(note),
                        Inbound::Discarded => {},
                    }
                },
                Ok(None) => return Err(ClientError::Timeout),
                Err(ClientError::Disconnected) => {
                    debug!(host, port, "server closed during handshake, assuming legacy daemon");
                    transport = FramedTransport::connect(host, port, timeout)?;
                    let actions = session.assume_legacy()?;
                    execute(&mut transport, actions)?;
                    break;
                },
                Err(err) => return Err(err),
            }
        }

        debug!(
            host,
            port,
            version = session.negotiated_version(),
            "connected"
        );
        self.live = Some(Live { transport, session, notifications });
        Ok(())
    }

    /// Close the connection, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(mut live) = self.live.take() {
            let actions = live.session.close();
            for action in actions {
                match action {
                    SessionAction::SendFrame(frame) => {
                        let _ = live.transport.send_frame(&frame);
                    },
                    SessionAction::Close => live.transport.shutdown(),
                }
            }
            live.session.fail();
            debug!("connection closed");
        }
    }

    /// Ask how many controllers the daemon manages.
    pub fn controller_count(&mut self, timeout: Duration) -> Result<u32> {
        match self.roundtrip(Message::RequestControllerCount, 0, timeout)? {
            Message::ReplyControllerCount { count } => Ok(count),
            other => Err(self.fail(unexpected(&other))),
        }
    }

    /// Fetch one controller's full description.
    pub fn controller_data(
        &mut self,
        device_idx: u32,
        timeout: Duration,
    ) -> Result<DeviceDescription> {
        let protocol_version = self.negotiated_version().unwrap_or(0);
        let request = Message::RequestControllerData { protocol_version };
        match self.roundtrip(request, device_idx, timeout)? {
            Message::ReplyControllerData { device } => Ok(device),
            other => Err(self.fail(unexpected(&other))),
        }
    }

    /// Resize an LED zone, if the device supports it. No reply.
    pub fn resize_zone(&mut self, device_idx: u32, zone_idx: u32, new_size: u32) -> Result<()> {
        self.send(Message::ResizeZone { zone_idx, new_size }, device_idx)
    }

    /// Set every LED color on a controller. No reply.
    pub fn update_leds(&mut self, device_idx: u32, colors: &[Color]) -> Result<()> {
        self.send(Message::UpdateLeds { colors: colors.to_vec() }, device_idx)
    }

    /// Set every LED color within one zone. No reply.
    pub fn update_zone_leds(
        &mut self,
        device_idx: u32,
        zone_idx: u32,
        colors: &[Color],
    ) -> Result<()> {
        self.send(Message::UpdateZoneLeds { zone_idx, colors: colors.to_vec() }, device_idx)
    }

    /// Set one LED's color. No reply.
    pub fn update_single_led(&mut self, device_idx: u32, led_idx: u32, color: Color) -> Result<()> {
        self.send(Message::UpdateSingleLed { led_idx, color }, device_idx)
    }

    /// Switch a controller to its direct-control mode. No reply.
    pub fn set_custom_mode(&mut self, device_idx: u32) -> Result<()> {
        self.send(Message::SetCustomMode, device_idx)
    }

    /// Replace one mode's parameters. No reply.
    ///
    /// The frame is sent verbatim; whether the server also activates the
    /// mode is daemon-dependent and not interpreted here.
    pub fn update_mode(
        &mut self,
        device_idx: u32,
        mode_idx: u32,
        mode: ModeDescription,
    ) -> Result<()> {
        self.send(Message::UpdateMode { mode_idx, mode }, device_idx)
    }

    /// Wait up to `timeout` for a server notification.
    ///
    /// Returns `Ok(None)` when the deadline passes with the stream idle;
    /// the connection stays usable in that case. Notifications that arrived
    /// while a request was in flight are buffered and returned first.
    pub fn poll_notifications(&mut self, timeout: Duration) -> Result<Option<Notification>> {
        let result = self.poll_inner(timeout);
        self.check_fatal(&result);
        result
    }

    fn poll_inner(&mut self, timeout: Duration) -> Result<Option<Notification>> {
        let live = self.live.as_mut().ok_or(ClientError::NotConnected)?;
        if let Some(note) = live.notifications.pop_front() {
            return Ok(Some(note));
        }

        let deadline = Instant::now() + timeout;
        loop {
            match live.transport.recv_frame(deadline)? {
                None => return Ok(None),
                Some(frame) => {
                    let (inbound, actions) = live.session.handle_frame(&frame)?;
                    execute(&mut live.transport, actions)?;
                    match inbound {
                        Inbound::Notification(note) => return Ok(Some(note)),
                        Inbound::Discarded => {},
                        Inbound::Reply { message, .. } => {
                            return Err(unexpected(&message));
                        },
                    }
                },
            }
        }
    }

    /// Send a request and wait for its reply.
    fn roundtrip(&mut self, message: Message, device_idx: u32, timeout: Duration) -> Result<Message> {
        let result = self.roundtrip_inner(message, device_idx, timeout);
        self.check_fatal(&result);
        result
    }

    fn roundtrip_inner(
        &mut self,
        message: Message,
        device_idx: u32,
        timeout: Duration,
    ) -> Result<Message> {
        let live = self.live.as_mut().ok_or(ClientError::NotConnected)?;
        let deadline = Instant::now() + timeout;

        let (request, actions) = live.session.send_request(&message, device_idx)?;
        execute(&mut live.transport, actions)?;
        let request = request.ok_or(ClientError::NotConnected)?;

        loop {
            match live.transport.recv_frame(deadline)? {
                // a reply may still be in flight; resuming would desync the
                // FIFO, so even an idle deadline is fatal here
                None => return Err(ClientError::Timeout),
                Some(frame) => {
                    let (inbound, actions) = live.session.handle_frame(&frame)?;
                    execute(&mut live.transport, actions)?;
                    match inbound {
                        Inbound::Reply { request: id, message } if id == request => {
                            return Ok(message);
                        },
                        Inbound::Reply { .. } | Inbound::Discarded => {},
                        Inbound::Notification(note) => live.notifications.push_back(note),
                    }
                },
            }
        }
    }

    /// Send a fire-and-forget message.
    fn send(&mut self, message: Message, device_idx: u32) -> Result<()> {
        let result = self.send_inner(message, device_idx);
        self.check_fatal(&result);
        result
    }

    fn send_inner(&mut self, message: Message, device_idx: u32) -> Result<()> {
        let live = self.live.as_mut().ok_or(ClientError::NotConnected)?;
        let (request, actions) = live.session.send_request(&message, device_idx)?;
        debug_assert_eq!(request, None);
        execute(&mut live.transport, actions)
    }

    fn check_fatal<T>(&mut self, result: &Result<T>) {
        if let Err(err) = result {
            if !err.is_recoverable() {
                let _ = self.fail(err.clone());
            }
        }
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        if let Some(mut live) = self.live.take() {
            warn!(error = %err, "connection failed");
            live.session.fail();
            live.transport.shutdown();
        }
        err
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

fn execute(transport: &mut FramedTransport, actions: Vec<SessionAction>) -> Result<()> {
    for action in actions {
        match action {
            SessionAction::SendFrame(frame) => transport.send_frame(&frame)?,
            SessionAction::Close => transport.shutdown(),
        }
    }
    Ok(())
}

fn unexpected(message: &Message) -> ClientError {
    ClientError::UnexpectedMessage { message_type: message.message_type().to_u32() }
}
