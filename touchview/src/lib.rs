//! touchview: headless multi-touch gesture listener
//!
//! `listen` binds the gesture endpoint and drives a [`SceneCamera`] from
//! incoming gesture datagrams. `send` encodes gestures and sends them over
//! UDP in place of a touch server.
//!
//! [`SceneCamera`]: touch_input::SceneCamera

pub mod args;
pub mod config;
pub mod errors;
pub mod event_loop;
pub mod send;

pub use config::Config;
pub use errors::{ConfigError, TouchArgError};
pub use event_loop::{Listener, Summary};
