//! Core gesture message types and wire constants.

use crate::errors::DecodeError;
use crate::io::{GestureInStream, GestureOutStream};
use touch_common::Vec2;

/// Literal separating the transport header from the gesture payload.
pub const FRAME_MARKER: &[u8; 3] = b"set";

/// Gesture name that ends a gesture; carries no touch points.
pub const RELEASE_GESTURE: &str = "release";

/// Largest datagram the endpoint receives, taken from the OSC packet limit.
pub const MAX_DATAGRAM_SIZE: usize = 16384;

/// Encoded size of one [`TouchPoint`].
pub const TOUCH_POINT_WIRE_SIZE: usize = 4 + 4 * 8 + 4;

/// Header written by the encoder ahead of the frame marker: an OSC-style
/// address padded to a 4-byte boundary.
pub const DEFAULT_HEADER: &[u8] = b"/gesture\0\0\0\0";

/// Padding bytes after a gesture name of `name_len` bytes.
///
/// Counted from the start of the name field and including its terminator,
/// so names of length 3, 7, 11, ... need none.
pub const fn name_padding(name_len: usize) -> usize {
    (4 - (name_len + 1) % 4) % 4
}

/// One finger's contact within a gesture frame.
///
/// # Wire Format
///
/// - 4 bytes: id (i32, big-endian)
/// - 8 bytes: location x (f64, byte-swapped)
/// - 8 bytes: location y
/// - 8 bytes: direction x
/// - 8 bytes: direction y
/// - 4 bytes: move origin flag (i32, big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    /// Stable for the physical touch while the frame lasts.
    pub id: i32,
    /// Screen position.
    pub location: Vec2,
    /// Displacement since the previous frame.
    pub direction: Vec2,
    /// Nonzero on the touch anchoring a translate or rotate gesture.
    pub move_origin: i32,
}

impl TouchPoint {
    /// Create a touch point.
    pub fn new(id: i32, location: Vec2, direction: Vec2, move_origin: i32) -> Self {
        Self {
            id,
            location,
            direction,
            move_origin,
        }
    }

    /// Returns true if this touch anchors the gesture.
    pub fn is_move_origin(&self) -> bool {
        self.move_origin != 0
    }

    /// Read a touch point from a gesture stream.
    pub fn read_from(stream: &mut GestureInStream<'_>) -> Result<Self, DecodeError> {
        let id = stream.read_i32()?;
        let location = Vec2::new(stream.read_f64_swapped()?, stream.read_f64_swapped()?);
        let direction = Vec2::new(stream.read_f64_swapped()?, stream.read_f64_swapped()?);
        let move_origin = stream.read_i32()?;
        Ok(Self {
            id,
            location,
            direction,
            move_origin,
        })
    }

    /// Write a touch point to a gesture stream.
    pub fn write_to(&self, stream: &mut GestureOutStream) {
        stream.write_i32(self.id);
        stream.write_f64_swapped(self.location.x);
        stream.write_f64_swapped(self.location.y);
        stream.write_f64_swapped(self.direction.x);
        stream.write_f64_swapped(self.direction.y);
        stream.write_i32(self.move_origin);
    }
}

/// The decoded content of one datagram.
///
/// The name is kept as received; matching it against the known gesture
/// vocabulary happens at dispatch time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureFrame {
    pub gesture_name: String,
    pub touch_points: Vec<TouchPoint>,
}

impl GestureFrame {
    /// Create a frame.
    pub fn new(gesture_name: impl Into<String>, touch_points: Vec<TouchPoint>) -> Self {
        Self {
            gesture_name: gesture_name.into(),
            touch_points,
        }
    }

    /// A `release` frame.
    pub fn release() -> Self {
        Self::new(RELEASE_GESTURE, Vec::new())
    }

    /// Returns true for the `release` gesture.
    pub fn is_release(&self) -> bool {
        self.gesture_name == RELEASE_GESTURE
    }

    /// Reset to an empty name and no touch points.
    pub fn clear(&mut self) {
        self.gesture_name.clear();
        self.touch_points.clear();
    }
}
