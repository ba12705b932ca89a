//! Gesture frame decoding and encoding.
//!
//! # Wire Format
//!
//! - N bytes: transport header (ignored)
//! - 3 bytes: `set` marker
//! - 1 byte: separator
//! - K+1 bytes: gesture name, NUL-terminated ASCII
//! - `name_padding(K)` bytes: padding to a 4-byte boundary from the name start
//!
//! Everything below is absent for `release`:
//!
//! - 4 bytes: touch count (i32, big-endian)
//! - 40 bytes per touch: see [`TouchPoint`]

use super::types::{
    name_padding, GestureFrame, TouchPoint, DEFAULT_HEADER, FRAME_MARKER, MAX_DATAGRAM_SIZE,
    RELEASE_GESTURE, TOUCH_POINT_WIRE_SIZE,
};
use crate::errors::{DecodeError, EncodeError};
use crate::io::{find_marker, GestureInStream, GestureOutStream};
use bytes::Bytes;
use tracing::trace;

impl GestureFrame {
    /// Decode one datagram.
    ///
    /// Only the `release` gesture short-circuits: its frame ends at the name
    /// terminator, whatever follows. Any other name must be followed by its
    /// padding, the touch count and that many touch points.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() > MAX_DATAGRAM_SIZE {
            return Err(DecodeError::Oversized(data.len()));
        }

        let marker_at = find_marker(data, FRAME_MARKER).ok_or(DecodeError::NoFrameMarker)?;
        let mut stream = GestureInStream::new(data);
        stream.skip(marker_at + FRAME_MARKER.len() + 1)?;

        let name_bytes = stream.read_cstr()?;
        if !name_bytes.is_ascii() {
            return Err(DecodeError::InvalidName);
        }
        let gesture_name = String::from_utf8_lossy(name_bytes).into_owned();

        if gesture_name == RELEASE_GESTURE {
            return Ok(Self::release());
        }

        stream.skip(name_padding(name_bytes.len()))?;

        let count = stream.read_i32()?;
        if count < 0 {
            return Err(DecodeError::NegativeTouchCount(count));
        }
        let count = count as usize;

        // The count is untrusted; never reserve more than the payload can hold.
        let mut touch_points =
            Vec::with_capacity(count.min(stream.remaining() / TOUCH_POINT_WIRE_SIZE));
        for _ in 0..count {
            touch_points.push(TouchPoint::read_from(&mut stream)?);
        }

        trace!(
            gesture = %gesture_name,
            touches = touch_points.len(),
            trailing = stream.remaining(),
            "decoded gesture frame"
        );

        Ok(Self {
            gesture_name,
            touch_points,
        })
    }

    /// Encode behind the default OSC-style header.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        self.encode_with_header(DEFAULT_HEADER)
    }

    /// Encode behind an arbitrary transport header.
    ///
    /// The header must not itself contain the `set` marker, otherwise the
    /// receiver locks onto the wrong offset. A `release` frame is written
    /// without count or touches, even if it holds touch points.
    pub fn encode_with_header(&self, header: &[u8]) -> Result<Bytes, EncodeError> {
        let name = self.gesture_name.as_bytes();
        if !name.is_ascii() {
            return Err(EncodeError::NonAsciiName);
        }
        if name.contains(&0) {
            return Err(EncodeError::NameContainsNul);
        }

        let mut out = GestureOutStream::with_capacity(
            header.len()
                + FRAME_MARKER.len()
                + 1
                + name.len()
                + 4
                + 4
                + self.touch_points.len() * TOUCH_POINT_WIRE_SIZE,
        );
        out.write_bytes(header);
        out.write_bytes(FRAME_MARKER);
        out.write_u8(0);
        out.write_bytes(name);
        out.write_u8(0);
        out.write_zeros(name_padding(name.len()));

        if !self.is_release() {
            let count = i32::try_from(self.touch_points.len())
                .map_err(|_| EncodeError::TooManyTouches(self.touch_points.len()))?;
            out.write_i32(count);
            for touch in &self.touch_points {
                touch.write_to(&mut out);
            }
        }

        if out.len() > MAX_DATAGRAM_SIZE {
            return Err(EncodeError::Oversized(out.len()));
        }
        Ok(out.into_bytes())
    }
}

/// Holds the most recently decoded gesture.
///
/// Every call to [`parse`](Self::parse) clears the held gesture first, so a
/// datagram that fails to decode leaves an empty gesture rather than the
/// previous one.
#[derive(Debug, Default)]
pub struct GestureParser {
    frame: GestureFrame,
}

impl GestureParser {
    /// Create a parser holding an empty gesture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `data`, replacing the held gesture.
    pub fn parse(&mut self, data: &[u8]) -> Result<&GestureFrame, DecodeError> {
        self.clear();
        self.frame = GestureFrame::decode(data)?;
        Ok(&self.frame)
    }

    /// Drop the held gesture.
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// The held gesture.
    pub fn frame(&self) -> &GestureFrame {
        &self.frame
    }

    /// Name of the held gesture, empty if none.
    pub fn gesture_name(&self) -> &str {
        &self.frame.gesture_name
    }

    /// Touch points of the held gesture.
    pub fn touch_points(&self) -> &[TouchPoint] {
        &self.frame.touch_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use touch_common::Vec2;

    fn two_touches() -> Vec<TouchPoint> {
        vec![
            TouchPoint::new(1, Vec2::new(100.0, 50.0), Vec2::new(-0.02, 0.0), 0),
            TouchPoint::new(2, Vec2::new(40.0, 50.0), Vec2::new(0.0, 0.0), 1),
        ]
    }

    #[test]
    fn test_decode_zoom_frame() {
        let frame = GestureFrame::new("zoom", two_touches());
        let bytes = frame.encode().unwrap();
        assert_eq!(GestureFrame::decode(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_encoded_layout() {
        let frame = GestureFrame::new("zoom", vec![]);
        let bytes = frame.encode_with_header(b"").unwrap();
        // "set", separator, "zoom\0", 3 bytes padding, count
        assert_eq!(&bytes[..], b"set\0zoom\0\0\0\0\0\0\0\0");
        assert_eq!(bytes.len(), 3 + 1 + 5 + 3 + 4);
    }

    #[test]
    fn test_decode_handwritten_datagram() {
        let mut data = b"#bundle\0junk set_".to_vec();
        data.extend_from_slice(b"one_drag\0\0\0\0");
        data.extend_from_slice(&[0, 0, 0, 1]);
        data.extend_from_slice(&[0, 0, 0, 9]);
        for v in [10.0f64, 20.0, 0.5, -0.25] {
            let mut raw = v.to_le_bytes();
            raw.reverse();
            data.extend_from_slice(&raw);
        }
        data.extend_from_slice(&[0, 0, 0, 0]);

        let frame = GestureFrame::decode(&data).unwrap();
        assert_eq!(frame.gesture_name, "one_drag");
        assert_eq!(
            frame.touch_points,
            vec![TouchPoint::new(
                9,
                Vec2::new(10.0, 20.0),
                Vec2::new(0.5, -0.25),
                0
            )]
        );
    }

    #[test]
    fn test_release_ignores_trailing_bytes() {
        let mut data = b"/gesture\0\0\0\0set\0release\0".to_vec();
        data.extend_from_slice(&[0xFF; 13]);
        let frame = GestureFrame::decode(&data).unwrap();
        assert!(frame.is_release());
        assert!(frame.touch_points.is_empty());

        // Nothing at all after the terminator is fine too.
        let frame = GestureFrame::decode(b"set\0release\0").unwrap();
        assert!(frame.is_release());
    }

    #[test]
    fn test_release_encodes_without_touches() {
        let frame = GestureFrame::new(RELEASE_GESTURE, two_touches());
        let bytes = frame.encode().unwrap();
        assert_eq!(GestureFrame::decode(&bytes).unwrap(), GestureFrame::release());
        assert_eq!(bytes.len(), DEFAULT_HEADER.len() + 4 + 8);
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            GestureFrame::decode(b"/gesture\0zoom\0\0\0"),
            Err(DecodeError::NoFrameMarker)
        );
        assert_eq!(GestureFrame::decode(b""), Err(DecodeError::NoFrameMarker));
    }

    #[test]
    fn test_unterminated_name() {
        assert_eq!(
            GestureFrame::decode(b"set\0zoom"),
            Err(DecodeError::UnterminatedName)
        );
    }

    #[test]
    fn test_non_ascii_name() {
        assert_eq!(
            GestureFrame::decode(b"set\0zo\xC3\xB6m\0\0\0\0\0"),
            Err(DecodeError::InvalidName)
        );
    }

    #[test]
    fn test_negative_count() {
        let data = b"set\0zoom\0\0\0\0\xFF\xFF\xFF\xFF";
        assert_eq!(
            GestureFrame::decode(data),
            Err(DecodeError::NegativeTouchCount(-1))
        );
    }

    #[test]
    fn test_huge_count_is_truncated_not_allocated() {
        let data = b"set\0zoom\0\0\0\0\x7F\xFF\xFF\xFF";
        assert!(matches!(
            GestureFrame::decode(data),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_oversized() {
        let data = vec![b'x'; MAX_DATAGRAM_SIZE + 1];
        assert_eq!(
            GestureFrame::decode(&data),
            Err(DecodeError::Oversized(MAX_DATAGRAM_SIZE + 1))
        );
    }

    #[test]
    fn test_unknown_name_still_decodes() {
        let frame = GestureFrame::new("pinch_explode", vec![]);
        let bytes = frame.encode().unwrap();
        assert_eq!(GestureFrame::decode(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_encode_rejects_bad_names() {
        assert_eq!(
            GestureFrame::new("zo\0om", vec![]).encode(),
            Err(EncodeError::NameContainsNul)
        );
        assert_eq!(
            GestureFrame::new("zööm", vec![]).encode(),
            Err(EncodeError::NonAsciiName)
        );
    }

    #[test]
    fn test_encode_rejects_oversized() {
        let touches = vec![TouchPoint::default(); MAX_DATAGRAM_SIZE / TOUCH_POINT_WIRE_SIZE + 1];
        assert!(matches!(
            GestureFrame::new("six_drag", touches).encode(),
            Err(EncodeError::Oversized(_))
        ));
    }

    #[test]
    fn test_parser_clears_on_failure() {
        let mut parser = GestureParser::new();
        let bytes = GestureFrame::new("one_drag", two_touches()).encode().unwrap();
        parser.parse(&bytes).unwrap();
        assert_eq!(parser.gesture_name(), "one_drag");
        assert_eq!(parser.touch_points().len(), 2);

        assert!(parser.parse(&bytes[..bytes.len() - 1]).is_err());
        assert_eq!(parser.gesture_name(), "");
        assert!(parser.touch_points().is_empty());
    }

    #[test]
    fn test_parser_replaces_previous_frame() {
        let mut parser = GestureParser::new();
        let first = GestureFrame::new("zoom", two_touches()).encode().unwrap();
        let second = GestureFrame::release().encode().unwrap();
        parser.parse(&first).unwrap();
        let frame = parser.parse(&second).unwrap();
        assert_eq!(frame, &GestureFrame::release());
        assert!(parser.touch_points().is_empty());
    }
}
