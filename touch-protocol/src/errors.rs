//! Error types for gesture decoding and the UDP endpoint.

use std::io;
use thiserror::Error;

/// Errors produced while decoding a gesture datagram.
///
/// A decode error only ever discards the datagram it came from; the next
/// datagram is decoded independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The `set` marker separating header from payload was not found.
    #[error("frame marker not found")]
    NoFrameMarker,

    /// The gesture name has no NUL terminator before the end of the datagram.
    #[error("gesture name is not NUL-terminated")]
    UnterminatedName,

    /// The gesture name contains non-ASCII bytes.
    #[error("gesture name is not ASCII")]
    InvalidName,

    /// A field extends past the end of the datagram.
    #[error("truncated datagram: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The datagram is larger than the receive buffer.
    #[error("datagram of {0} bytes exceeds maximum size")]
    Oversized(usize),

    /// The touch count field is negative.
    #[error("negative touch count: {0}")]
    NegativeTouchCount(i32),
}

/// Errors encoding a gesture frame for sending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The gesture name contains a NUL byte and would end early on the wire.
    #[error("gesture name contains a NUL byte")]
    NameContainsNul,

    /// The gesture name contains non-ASCII characters.
    #[error("gesture name is not ASCII")]
    NonAsciiName,

    /// More touch points than the count field can carry.
    #[error("too many touch points: {0}")]
    TooManyTouches(usize),

    /// The encoded datagram would not fit the receiver's buffer.
    #[error("encoded datagram of {0} bytes exceeds maximum size")]
    Oversized(usize),
}

/// Errors setting up the gesture endpoint.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The UDP socket could not be created.
    #[error("could not create socket: {0}")]
    SocketCreateFailed(#[source] io::Error),

    /// The socket could not be switched to non-blocking mode.
    #[error("could not set non-blocking mode: {0}")]
    NonBlockingFailed(#[source] io::Error),

    /// The socket could not be bound to the requested port.
    #[error("could not bind to port {port}: {source}")]
    BindFailed {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// `initialize` was called on an endpoint that is already bound.
    #[error("endpoint already initialized on port {0}")]
    AlreadyInitialized(u16),
}

impl EndpointError {
    /// Returns true if the gesture feature cannot run after this error.
    ///
    /// Socket failures disable gesture input for the session; a repeated
    /// `initialize` leaves the existing socket in place.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::AlreadyInitialized(_))
    }
}
