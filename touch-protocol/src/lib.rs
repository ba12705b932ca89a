//! Multi-touch gesture protocol implementation.
//!
//! This crate provides the receiving side of the touch server's gesture
//! feed: a non-blocking UDP endpoint, bounds-checked datagram streams, and
//! the gesture frame codec.
//!
//! # Modules
//!
//! - [`socket`] - Non-blocking UDP endpoint
//! - [`io`] - Datagram cursors (GestureInStream, GestureOutStream)
//! - [`messages`] - Touch points, gesture frames and the frame parser
//! - [`errors`] - Decode, encode and endpoint errors
//!
//! # Examples
//!
//! ```no_run
//! use touch_protocol::GestureEndpoint;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut endpoint = GestureEndpoint::bind("localhost", 3333)?;
//! while let Some(frame) = endpoint.poll()? {
//!     println!("{}", frame.gesture_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod io;
pub mod messages;
pub mod socket;

// Re-export commonly used types
pub use errors::{DecodeError, EncodeError, EndpointError};
pub use io::{GestureInStream, GestureOutStream};
pub use messages::{GestureFrame, GestureParser, TouchPoint};
pub use socket::{GestureEndpoint, DEFAULT_GESTURE_PORT};
