//! One event-loop step: receive a datagram and dispatch it.

use crate::dispatcher::{DispatchOutcome, GestureDispatcher};
use crate::observer::GestureObserver;
use touch_protocol::{DecodeError, GestureEndpoint};
use tracing::debug;

/// Result of [`pump_once`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpOutcome {
    /// Nothing was received.
    Idle,
    /// A frame was received and dispatched.
    Dispatched(DispatchOutcome),
    /// A datagram was received but could not be decoded.
    Discarded(DecodeError),
}

/// Poll the endpoint once and dispatch whatever arrived.
///
/// Never blocks and never fails: a malformed datagram is logged and
/// reported as [`PumpOutcome::Discarded`], and an uninitialized endpoint
/// simply stays idle.
pub fn pump_once<D: GestureObserver>(
    endpoint: &mut GestureEndpoint,
    dispatcher: &mut GestureDispatcher<D>,
) -> PumpOutcome {
    match endpoint.poll() {
        Ok(Some(frame)) => PumpOutcome::Dispatched(dispatcher.dispatch(&frame)),
        Ok(None) => PumpOutcome::Idle,
        Err(e) => {
            debug!("discarding gesture datagram: {}", e);
            PumpOutcome::Discarded(e)
        }
    }
}
