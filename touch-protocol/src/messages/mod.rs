//! Gesture message types.
//!
//! - **Core types** ([`types`]) - TouchPoint, GestureFrame and wire constants
//! - **Frames** ([`frame`]) - datagram decoding/encoding and the stateful parser
//!
//! # Wire Format Rules
//!
//! 1. **Header is opaque** - everything before the first `set` marker is skipped
//! 2. **Big-endian integers** - touch count, ids and move-origin flags
//! 3. **Byte-swapped doubles** - locations and directions
//! 4. **Word alignment** - the name field is padded to 4 bytes, terminator included
//! 5. **Fail on short data** - every read is bounds-checked, nothing is guessed
//!
//! # Examples
//!
//! ```
//! use touch_protocol::messages::{GestureFrame, TouchPoint};
//! use touch_common::Vec2;
//!
//! let frame = GestureFrame::new(
//!     "one_drag",
//!     vec![TouchPoint::new(1, Vec2::new(10.0, 20.0), Vec2::new(0.01, 0.0), 0)],
//! );
//! let datagram = frame.encode()?;
//! assert_eq!(GestureFrame::decode(&datagram)?, frame);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod frame;
pub mod types;

#[cfg(test)]
mod proptest_framing;

pub use frame::GestureParser;
pub use types::{
    name_padding, GestureFrame, TouchPoint, DEFAULT_HEADER, FRAME_MARKER, MAX_DATAGRAM_SIZE,
    RELEASE_GESTURE, TOUCH_POINT_WIRE_SIZE,
};
