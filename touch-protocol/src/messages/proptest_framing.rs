//! Property tests for gesture framing.
//!
//! Datagrams come from another process over UDP, so the decoder must accept
//! every frame the encoder produces and reject, never panic on, anything cut
//! short.

use super::types::*;
use proptest::prelude::*;
use touch_common::Vec2;

fn arbitrary_vec2() -> impl Strategy<Value = Vec2> {
    (-1.0e4f64..1.0e4, -1.0e4f64..1.0e4).prop_map(|(x, y)| Vec2::new(x, y))
}

fn arbitrary_touch() -> impl Strategy<Value = TouchPoint> {
    (any::<i32>(), arbitrary_vec2(), arbitrary_vec2(), 0i32..=1).prop_map(
        |(id, location, direction, move_origin)| TouchPoint {
            id,
            location,
            direction,
            move_origin,
        },
    )
}

fn arbitrary_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_]{0,24}".prop_filter("release is handled separately", |name| {
        name != RELEASE_GESTURE
    })
}

fn arbitrary_frame() -> impl Strategy<Value = GestureFrame> {
    (
        arbitrary_name(),
        prop::collection::vec(arbitrary_touch(), 0..8),
    )
        .prop_map(|(gesture_name, touch_points)| GestureFrame {
            gesture_name,
            touch_points,
        })
}

fn arbitrary_header() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..32)
        .prop_filter("header must not contain the marker", |h| {
            !h.windows(FRAME_MARKER.len()).any(|w| w == FRAME_MARKER)
        })
}

proptest! {
    /// Any non-release frame survives encode then decode.
    #[test]
    fn test_round_trip(frame in arbitrary_frame(), header in arbitrary_header()) {
        let bytes = frame.encode_with_header(&header).unwrap();
        let parsed = GestureFrame::decode(&bytes).unwrap();
        prop_assert_eq!(&parsed.gesture_name, &frame.gesture_name);
        prop_assert_eq!(parsed.touch_points.len(), frame.touch_points.len());
        for (a, b) in parsed.touch_points.iter().zip(&frame.touch_points) {
            prop_assert_eq!(a.id, b.id);
            prop_assert!(a.location.bit_eq(&b.location));
            prop_assert!(a.direction.bit_eq(&b.direction));
            prop_assert_eq!(a.move_origin, b.move_origin);
        }
    }

    /// Release decodes to an empty frame whatever follows the name.
    #[test]
    fn test_release_short_circuit(
        header in arbitrary_header(),
        trailing in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut data = header;
        data.extend_from_slice(FRAME_MARKER);
        data.push(b' ');
        data.extend_from_slice(RELEASE_GESTURE.as_bytes());
        data.push(0);
        data.extend_from_slice(&trailing);

        let parsed = GestureFrame::decode(&data).unwrap();
        prop_assert!(parsed.is_release());
        prop_assert!(parsed.touch_points.is_empty());
    }

    /// Cutting a frame anywhere before its end is an error, not a panic.
    #[test]
    fn test_truncation_rejected(frame in arbitrary_frame(), cut in any::<prop::sample::Index>()) {
        let bytes = frame.encode().unwrap();
        let cut = cut.index(bytes.len());
        prop_assert!(GestureFrame::decode(&bytes[..cut]).is_err());
    }

    /// A release frame cut before its name terminator is rejected.
    #[test]
    fn test_release_truncation_rejected(header in arbitrary_header()) {
        let bytes = GestureFrame::release().encode_with_header(&header).unwrap();
        for cut in 0..bytes.len() {
            prop_assert!(GestureFrame::decode(&bytes[..cut]).is_err(), "cut at {}", cut);
        }
    }

    /// The touch count always starts at the 4-byte boundary after the name.
    #[test]
    fn test_padding_law(name in arbitrary_name()) {
        let frame = GestureFrame::new(name.clone(), vec![]);
        let bytes = frame.encode_with_header(b"").unwrap();
        let k = name.len();
        let pad = (4 - (k + 1) % 4) % 4;
        prop_assert_eq!(pad, name_padding(k));
        prop_assert_eq!((k + 1 + pad) % 4, 0);
        // "set", separator, name, NUL, padding, then the count.
        prop_assert_eq!(bytes.len(), FRAME_MARKER.len() + 1 + k + 1 + pad + 4);
        prop_assert!(bytes[FRAME_MARKER.len() + 1 + k..].iter().all(|&b| b == 0));
    }

    /// Arbitrary bytes never panic the decoder.
    #[test]
    fn test_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = GestureFrame::decode(&data);
    }
}

#[test]
fn test_release_truncated_at_every_offset() {
    let bytes = GestureFrame::release().encode().unwrap();
    assert!(GestureFrame::decode(&bytes).unwrap().is_release());
    for cut in 0..bytes.len() {
        assert!(
            GestureFrame::decode(&bytes[..cut]).is_err(),
            "cut at {cut} decoded"
        );
    }
}
