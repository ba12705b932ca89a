//! Gesture sender, standing in for the touch server during manual tests.

use crate::args::SendArgs;
use anyhow::{anyhow, Context, Result};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use touch_protocol::GestureFrame;
use tracing::{debug, info};

/// Resolve `host:port`, preferring an IPv4 address.
pub async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .with_context(|| format!("failed to resolve {host}"))?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| anyhow!("no addresses found for {host}"))
}

/// Encode the requested gesture and send it `count` times.
///
/// Returns the number of datagrams sent.
pub async fn send(args: &SendArgs) -> Result<u32> {
    let frame = GestureFrame::new(args.gesture.clone(), args.touches.clone());
    let datagram = frame
        .encode()
        .with_context(|| format!("failed to encode gesture '{}'", args.gesture))?;

    let target = resolve(&args.host, args.port).await?;
    let local: SocketAddr = if target.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local)
        .await
        .context("failed to bind sending socket")?;

    info!(
        "Sending '{}' with {} touches to {} ({} bytes) x{}",
        frame.gesture_name,
        frame.touch_points.len(),
        target,
        datagram.len(),
        args.count
    );

    let interval = Duration::from_millis(args.interval_ms);
    for i in 0..args.count {
        if i > 0 {
            tokio::time::sleep(interval).await;
        }
        socket
            .send_to(&datagram, target)
            .await
            .with_context(|| format!("failed to send datagram to {target}"))?;
        debug!("sent datagram {}/{}", i + 1, args.count);
    }

    Ok(args.count)
}
