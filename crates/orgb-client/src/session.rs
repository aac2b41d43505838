//! Connection state machine for the OpenRGB client.
//!
//! This module implements the session layer: the version handshake,
//! request/reply correlation, and notification routing.
//!
//! # Architecture: Action-Based State Machine
//!
//! The state machine performs no I/O. Methods return
//! `Vec<SessionAction>`, frames to send or an order to close, and the
//! driver (the blocking [`Client`](crate::Client), or a test) executes
//! them. This keeps the protocol logic deterministic and testable without
//! sockets.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐ stream_ready ┌─────────────┐ version reply ┌───────────┐
//! │ Connecting │─────────────>│ Handshaking │──────────────>│ Connected │
//! └────────────┘              └─────────────┘               └───────────┘
//!                                    │ peer closed (legacy)       │ close
//!                                    └──────────> Connected       ↓
//!                                                            ┌─────────┐
//!         any state ──fatal──> Disconnected <────────────────│ Closing │
//!                                                            └─────────┘
//! ```
//!
//! # Correlation
//!
//! The protocol has no request ids. Correlation is strictly FIFO per
//! message type: expectations queue up in send order, and an inbound frame
//! completes the oldest expectation of its type code. `DeviceListUpdated`
//! bypasses the queue entirely. A frame matching nothing is a fatal
//! [`ClientError::UnexpectedMessage`].

use std::collections::VecDeque;

use orgb_proto::{Frame, IMPLEMENTED_PROTOCOL_VERSION, Message, MessageType};

use crate::error::{ClientError, Result};

/// Actions returned by the session state machine.
///
/// The driver executes these in order: serialize and send the frame, or
/// shut the transport down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Send this frame to the server
    SendFrame(Frame),

    /// Shut the transport down
    Close,
}

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport open in progress
    Connecting,
    /// Version request sent, waiting for the server's reply
    Handshaking,
    /// Handshake done, requests allowed
    Connected,
    /// Shutdown requested, draining
    Closing,
    /// No live connection (initial and terminal)
    Disconnected,
}

/// Identifies one pending request within a session.
pub type RequestId = u64;

/// A server-initiated event, delivered outside request/reply correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The server's device list changed; cached controller data is stale
    DeviceListUpdated,
}

/// What an inbound frame turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Reply completing the given pending request
    Reply {
        /// The request this frame answers
        request: RequestId,
        /// Decoded reply payload
        message: Message,
    },

    /// Server-initiated notification
    Notification(Notification),

    /// Reply to a cancelled request, dropped silently
    Discarded,
}

#[derive(Debug)]
struct Expectation {
    id: RequestId,
    message_type: MessageType,
    cancelled: bool,
}

/// Client-side connection state machine.
///
/// Pure logic, no I/O. One instance per connection attempt; a reconnect
/// starts over with a fresh `Session`.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    client_name: Option<String>,
    negotiated_version: Option<u32>,
    pending: VecDeque<Expectation>,
    next_request: RequestId,
}

impl Session {
    /// Create a session for a connection attempt.
    ///
    /// `client_name`, when given, is announced to the server right after
    /// the version exchange.
    #[must_use]
    pub fn new(client_name: Option<String>) -> Self {
        Self {
            state: SessionState::Connecting,
            client_name,
            negotiated_version: None,
            pending: VecDeque::new(),
            next_request: 0,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Negotiated protocol version, once the handshake finished.
    ///
    /// `min(client, server)`, or 0 for a legacy server that closed the
    /// stream instead of answering the version request.
    #[must_use]
    pub fn negotiated_version(&self) -> Option<u32> {
        self.negotiated_version
    }

    /// Number of expectations still queued (cancelled ones included).
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn enqueue(&mut self, message_type: MessageType) -> RequestId {
        let id = self.next_request;
        self.next_request += 1;
        self.pending.push_back(Expectation { id, message_type, cancelled: false });
        id
    }

    /// The transport is open; begin the version handshake.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` if the session is not in `Connecting`.
    pub fn stream_ready(&mut self) -> Result<Vec<SessionAction>> {
        if self.state != SessionState::Connecting {
            return Err(ClientError::NotConnected);
        }
        self.state = SessionState::Handshaking;
        self.enqueue(MessageType::RequestProtocolVersion);

        let request = Message::RequestProtocolVersion {
            client_version: IMPLEMENTED_PROTOCOL_VERSION,
        };
        Ok(vec![SessionAction::SendFrame(request.to_frame(0))])
    }

    /// The server closed the stream instead of answering the version
    /// request; treat it as a legacy daemon speaking version 0.
    ///
    /// The driver redials before executing the returned actions. The
    /// fallback is deliberate and explicit; see the connection docs.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` outside of `Handshaking`.
    pub fn assume_legacy(&mut self) -> Result<Vec<SessionAction>> {
        if self.state != SessionState::Handshaking {
            return Err(ClientError::NotConnected);
        }
        self.pending.clear();
        self.negotiated_version = Some(0);
        self.state = SessionState::Connected;
        Ok(self.announce_name())
    }

    fn announce_name(&mut self) -> Vec<SessionAction> {
        match &self.client_name {
            Some(name) => {
                let message = Message::SetClientName { name: name.clone() };
                vec![SessionAction::SendFrame(message.to_frame(0))]
            },
            None => Vec::new(),
        }
    }

    /// Queue an outbound request.
    ///
    /// Returns the actions to execute and, for message types the server
    /// answers, the id of the newly queued expectation.
    ///
    /// # Errors
    ///
    /// Returns `NotConnected` unless the session is `Connected`.
    pub fn send_request(
        &mut self,
        message: &Message,
        device_idx: u32,
    ) -> Result<(Option<RequestId>, Vec<SessionAction>)> {
        if self.state != SessionState::Connected {
            return Err(ClientError::NotConnected);
        }

        let message_type = message.message_type();
        let request = message_type.expects_reply().then(|| self.enqueue(message_type));
        let actions = vec![SessionAction::SendFrame(message.to_frame(device_idx))];
        Ok((request, actions))
    }

    /// Cancel a pending request.
    ///
    /// The expectation keeps its place in the queue so FIFO correlation is
    /// undisturbed; when its reply eventually arrives it is discarded
    /// silently. Returns `false` if the id is not pending.
    pub fn cancel(&mut self, request: RequestId) -> bool {
        match self.pending.iter_mut().find(|exp| exp.id == request) {
            Some(exp) => {
                exp.cancelled = true;
                true
            },
            None => false,
        }
    }

    /// Process one inbound frame.
    ///
    /// Routes notifications, completes or discards the oldest matching
    /// expectation, and finishes the handshake when the version reply
    /// arrives.
    ///
    /// # Errors
    ///
    /// - `NotConnected` if no frames can be received in the current state
    /// - `UnexpectedMessage` if the frame matches nothing (fatal; the
    ///   driver must tear the connection down)
    /// - any decode error from the frame body
    pub fn handle_frame(&mut self, frame: &Frame) -> Result<(Inbound, Vec<SessionAction>)> {
        if !matches!(self.state, SessionState::Handshaking | SessionState::Connected) {
            return Err(ClientError::NotConnected);
        }

        let message_type = frame
            .header
            .message_type_enum()
            .ok_or_else(|| ClientError::Protocol(orgb_proto::ProtocolError::UnknownMessageType(
                frame.header.message_type(),
            )))?;

        if message_type.is_notification() {
            // decode validates the empty body even though the variant is unit
            match Message::decode_from_server(frame)? {
                Message::DeviceListUpdated => {
                    return Ok((
                        Inbound::Notification(Notification::DeviceListUpdated),
                        Vec::new(),
                    ));
                },
                other => {
                    return Err(ClientError::UnexpectedMessage {
                        message_type: other.message_type().to_u32(),
                    });
                },
            }
        }

        let position = self
            .pending
            .iter()
            .position(|exp| exp.message_type == message_type)
            .ok_or(ClientError::UnexpectedMessage { message_type: message_type.to_u32() })?;

        let expectation = self
            .pending
            .remove(position)
            .ok_or(ClientError::UnexpectedMessage { message_type: message_type.to_u32() })?;

        if expectation.cancelled {
            return Ok((Inbound::Discarded, Vec::new()));
        }

        let message = Message::decode_from_server(frame)?;

        let mut actions = Vec::new();
        if self.state == SessionState::Handshaking {
            let Message::ReplyProtocolVersion { server_version } = &message else {
                return Err(ClientError::UnexpectedMessage {
                    message_type: message_type.to_u32(),
                });
            };
            self.negotiated_version =
                Some(IMPLEMENTED_PROTOCOL_VERSION.min(*server_version));
            self.state = SessionState::Connected;
            actions = self.announce_name();
        }

        Ok((Inbound::Reply { request: expectation.id, message }, actions))
    }

    /// Begin a graceful shutdown.
    pub fn close(&mut self) -> Vec<SessionAction> {
        self.state = SessionState::Closing;
        vec![SessionAction::Close]
    }

    /// The transport is gone (closed or failed); terminal state.
    ///
    /// Drains the expectation queue; their callers are failed with
    /// `Disconnected` by the driver.
    pub fn fail(&mut self) {
        self.state = SessionState::Disconnected;
        self.pending.clear();
    }
}
