//! touch-input: Map multi-touch gesture frames to camera interactions
//!
//! This crate provides [`GestureDispatcher`], which looks up each decoded
//! frame's gesture name in a [`GestureTable`] and delivers the resulting
//! [`GestureEvent`] to a registered [`GestureObserver`] or to a default
//! handler. [`CameraGestureHandler`] is the default handler that orbits,
//! zooms, pans and rolls a [`CameraControl`] camera.
//!
//! # Examples
//!
//! ```
//! use touch_input::{CameraGestureHandler, DispatchOutcome, GestureDispatcher, GestureEvent, SceneCamera};
//! use touch_protocol::{GestureFrame, TouchPoint};
//! use touch_common::Vec2;
//!
//! let mut dispatcher = GestureDispatcher::new(CameraGestureHandler::new(SceneCamera::default()));
//! let frame = GestureFrame::new(
//!     "one_drag",
//!     vec![TouchPoint::new(1, Vec2::new(10.0, 10.0), Vec2::new(0.02, 0.0), 0)],
//! );
//! assert_eq!(dispatcher.dispatch(&frame), DispatchOutcome::Default(GestureEvent::OneDrag));
//! assert_eq!(dispatcher.defaults().camera().render_count(), 1);
//! ```

mod camera;
mod dispatcher;
mod gestures;
mod handlers;
mod observer;
mod pump;

pub use camera::{CameraControl, Headlight, SceneCamera};
pub use dispatcher::{DispatchOutcome, DispatchStats, GestureDispatcher, GestureState};
pub use gestures::{GestureConfig, GestureEvent, GestureTable};
pub use handlers::CameraGestureHandler;
pub use observer::GestureObserver;
pub use pump::{pump_once, PumpOutcome};
