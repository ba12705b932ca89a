//! UDP endpoint receiving gesture datagrams from the touch server.
//!
//! The endpoint owns one non-blocking datagram socket bound to
//! `0.0.0.0:<port>`. It is polled from the host's event loop; each
//! [`poll`](GestureEndpoint::poll) consumes at most one datagram and never
//! blocks, so a full receive queue drains over successive loop iterations.
//!
//! # Examples
//!
//! ```no_run
//! use touch_protocol::socket::GestureEndpoint;
//!
//! let mut endpoint = GestureEndpoint::new();
//! if let Err(e) = endpoint.initialize("localhost", 3333) {
//!     eprintln!("gesture input disabled: {e}");
//! }
//!
//! loop {
//!     match endpoint.poll() {
//!         Ok(Some(frame)) => println!("{} with {} touches", frame.gesture_name, frame.touch_points.len()),
//!         Ok(None) => break,
//!         Err(e) => eprintln!("dropped datagram: {e}"),
//!     }
//! }
//! ```

use crate::errors::{DecodeError, EndpointError};
use crate::messages::{GestureFrame, GestureParser, MAX_DATAGRAM_SIZE};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use tracing::{debug, info, trace};

/// Port the touch server sends to unless configured otherwise.
pub const DEFAULT_GESTURE_PORT: u16 = 3333;

/// Receive-only UDP endpoint for gesture datagrams.
///
/// An endpoint that failed to initialize stays usable: every poll simply
/// reports no data, so the host runs on without gesture input.
pub struct GestureEndpoint {
    host_name: String,
    port: u16,
    socket: Option<UdpSocket>,
    parser: GestureParser,
    buffer: Box<[u8]>,
}

impl Default for GestureEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureEndpoint {
    /// Create an uninitialized endpoint.
    pub fn new() -> Self {
        Self {
            host_name: String::new(),
            port: 0,
            socket: None,
            parser: GestureParser::new(),
            // One spare byte so an oversized datagram shows up as too long
            // instead of silently truncated.
            buffer: vec![0u8; MAX_DATAGRAM_SIZE + 1].into_boxed_slice(),
        }
    }

    /// Create and initialize an endpoint in one step.
    pub fn bind(host_name: &str, port: u16) -> Result<Self, EndpointError> {
        let mut endpoint = Self::new();
        endpoint.initialize(host_name, port)?;
        Ok(endpoint)
    }

    /// Open the UDP socket, make it non-blocking and bind it to `port` on all
    /// interfaces.
    ///
    /// `host_name` names the touch server for diagnostics only; datagrams are
    /// accepted from any sender. Port 0 asks the OS for a free port, see
    /// [`local_addr`](Self::local_addr).
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be created, configured or bound,
    /// or if the endpoint is already initialized. On error the endpoint stays
    /// uninitialized (or keeps its existing socket).
    pub fn initialize(&mut self, host_name: &str, port: u16) -> Result<(), EndpointError> {
        if self.socket.is_some() {
            return Err(EndpointError::AlreadyInitialized(self.port));
        }

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(EndpointError::SocketCreateFailed)?;
        socket
            .set_nonblocking(true)
            .map_err(EndpointError::NonBlockingFailed)?;

        let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
        socket
            .bind(&addr.into())
            .map_err(|source| EndpointError::BindFailed { port, source })?;

        let socket: UdpSocket = socket.into();
        let bound_port = socket.local_addr().map(|a| a.port()).unwrap_or(port);

        self.host_name = host_name.to_string();
        self.port = bound_port;
        self.socket = Some(socket);

        info!(
            host = %self.host_name,
            port = self.port,
            "gesture endpoint listening"
        );
        Ok(())
    }

    /// Returns true once the socket is bound and until teardown.
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Configured touch server host name.
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Bound port, 0 before initialization.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Local address of the bound socket.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Receive and decode at most one datagram without blocking.
    ///
    /// Returns `Ok(None)` when the endpoint is not initialized, no datagram
    /// is queued, the datagram is empty, or the socket reports an error.
    ///
    /// # Errors
    ///
    /// Returns the decode error of a malformed datagram, including
    /// [`DecodeError::Oversized`] for one longer than
    /// [`MAX_DATAGRAM_SIZE`]. The datagram is consumed and the held gesture
    /// is left cleared.
    pub fn poll(&mut self) -> Result<Option<GestureFrame>, DecodeError> {
        let Some(socket) = self.socket.as_ref() else {
            return Ok(None);
        };

        let len = match socket.recv_from(&mut self.buffer) {
            Ok((len, peer)) => {
                trace!(%peer, len, "gesture datagram");
                len
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(e) => {
                debug!("gesture socket receive failed: {}", e);
                return Ok(None);
            }
        };

        if len == 0 {
            return Ok(None);
        }

        let frame = self.parser.parse(&self.buffer[..len])?;
        Ok(Some(frame.clone()))
    }

    /// The most recently decoded gesture, empty after a failed decode.
    pub fn gesture(&self) -> &GestureParser {
        &self.parser
    }

    /// Close the socket. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(socket) = self.socket.take() {
            drop(socket);
            info!(port = self.port, "gesture endpoint closed");
        }
    }
}

impl Drop for GestureEndpoint {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for GestureEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureEndpoint")
            .field("host_name", &self.host_name)
            .field("port", &self.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}
