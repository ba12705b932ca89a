//! Loopback tests for the gesture endpoint.
//!
//! Each test binds an endpoint on an OS-assigned port and feeds it datagrams
//! from a plain UDP socket on 127.0.0.1.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::thread::sleep;
use std::time::{Duration, Instant};
use touch_common::Vec2;
use touch_protocol::messages::MAX_DATAGRAM_SIZE;
use touch_protocol::{DecodeError, GestureEndpoint, GestureFrame, TouchPoint};

fn sender() -> UdpSocket {
    UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind sender")
}

fn target(endpoint: &GestureEndpoint) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, endpoint.port()))
}

/// Poll until something other than "no data" comes back.
fn poll_until_some(endpoint: &mut GestureEndpoint) -> Result<GestureFrame, DecodeError> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match endpoint.poll() {
            Ok(Some(frame)) => return Ok(frame),
            Ok(None) if Instant::now() < deadline => sleep(Duration::from_millis(5)),
            Ok(None) => panic!("no datagram arrived"),
            Err(e) => return Err(e),
        }
    }
}

#[test]
fn test_receive_drag_frame() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let frame = GestureFrame::new(
        "one_drag",
        vec![TouchPoint::new(
            4,
            Vec2::new(512.0, 384.0),
            Vec2::new(0.01, -0.02),
            0,
        )],
    );
    sender()
        .send_to(&frame.encode().unwrap(), target(&endpoint))
        .unwrap();

    let received = poll_until_some(&mut endpoint).unwrap();
    assert_eq!(received, frame);
    assert_eq!(endpoint.gesture().frame(), &frame);
}

#[test]
fn test_one_datagram_per_poll() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let socket = sender();
    let zoom = GestureFrame::new("zoom", vec![TouchPoint::default(); 2]);
    let release = GestureFrame::release();
    socket
        .send_to(&zoom.encode().unwrap(), target(&endpoint))
        .unwrap();
    socket
        .send_to(&release.encode().unwrap(), target(&endpoint))
        .unwrap();

    assert_eq!(poll_until_some(&mut endpoint).unwrap(), zoom);
    assert_eq!(poll_until_some(&mut endpoint).unwrap(), release);
    assert_eq!(endpoint.poll(), Ok(None));
}

#[test]
fn test_malformed_datagram_is_skipped() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let socket = sender();
    socket
        .send_to(b"/gesture\0no marker", target(&endpoint))
        .unwrap();
    let good = GestureFrame::new("translate_x", vec![]);
    socket
        .send_to(&good.encode().unwrap(), target(&endpoint))
        .unwrap();

    assert_eq!(
        poll_until_some(&mut endpoint),
        Err(DecodeError::NoFrameMarker)
    );
    assert_eq!(endpoint.gesture().gesture_name(), "");
    assert_eq!(poll_until_some(&mut endpoint).unwrap(), good);
}

#[test]
fn test_empty_datagram_reports_nothing() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let socket = sender();
    socket.send_to(&[], target(&endpoint)).unwrap();
    let good = GestureFrame::release();
    socket
        .send_to(&good.encode().unwrap(), target(&endpoint))
        .unwrap();

    // The empty datagram yields Ok(None) and is consumed along the way.
    assert_eq!(poll_until_some(&mut endpoint).unwrap(), good);
}

#[test]
fn test_teardown_stops_receiving() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let addr = target(&endpoint);
    endpoint.teardown();
    let _ = sender().send_to(&GestureFrame::release().encode().unwrap(), addr);
    sleep(Duration::from_millis(20));
    assert_eq!(endpoint.poll(), Ok(None));
    assert_eq!(endpoint.port(), addr.port());
}

#[test]
fn test_oversized_datagram_is_discarded() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let socket = sender();

    // A valid release frame followed by enough filler to overflow the buffer.
    let mut oversized = b"set\0release\0".to_vec();
    oversized.resize(20_000, 0xAB);
    socket.send_to(&oversized, target(&endpoint)).unwrap();
    let drag = GestureFrame::new("one_drag", vec![TouchPoint::default()]);
    socket
        .send_to(&drag.encode().unwrap(), target(&endpoint))
        .unwrap();

    assert!(matches!(
        poll_until_some(&mut endpoint),
        Err(DecodeError::Oversized(len)) if len > MAX_DATAGRAM_SIZE
    ));
    assert_eq!(endpoint.gesture().frame(), &GestureFrame::default());
    assert_eq!(poll_until_some(&mut endpoint).unwrap(), drag);
}

#[test]
fn test_largest_datagram_is_accepted() {
    let mut endpoint = GestureEndpoint::bind("localhost", 0).unwrap();
    let mut datagram = GestureFrame::release().encode().unwrap().to_vec();
    datagram.resize(MAX_DATAGRAM_SIZE, 0);
    sender().send_to(&datagram, target(&endpoint)).unwrap();

    assert!(poll_until_some(&mut endpoint).unwrap().is_release());
}
