//! Command-line argument parsing.
//!
//! # Examples
//!
//! ```
//! use touchview::args::{Args, Command};
//!
//! let args = Args::try_parse_from(["touchview", "-v", "listen", "--port", "4000"])?;
//! assert_eq!(args.verbose, 1);
//! assert!(matches!(args.command, Command::Listen(ref l) if l.port == Some(4000)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::errors::TouchArgError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use touch_common::Vec2;
use touch_protocol::TouchPoint;

/// touchview command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "touchview")]
#[command(about = "Drive a scene camera from multi-touch gesture datagrams")]
#[command(version)]
pub struct Args {
    /// Configuration file path (TOML format)
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Receive gestures and apply them to the camera until Ctrl-C
    Listen(ListenArgs),
    /// Send gesture datagrams, standing in for the touch server
    Send(SendArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListenArgs {
    /// UDP port to listen on (overrides the config file)
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Touch server host name, for diagnostics (overrides the config file)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SendArgs {
    /// Destination UDP port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: u16,

    /// Destination host
    #[arg(long, value_name = "HOST", default_value = "localhost")]
    pub host: String,

    /// Gesture name, e.g. one_drag, zoom, translate_x, release
    #[arg(short = 'g', long, value_name = "NAME")]
    pub gesture: String,

    /// Touch point as id,x,y,dx,dy,move (repeatable)
    #[arg(short = 't', long = "touch", value_name = "TOUCH", value_parser = parse_touch, allow_hyphen_values = true)]
    pub touches: Vec<TouchPoint>,

    /// Number of datagrams to send
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,

    /// Delay between datagrams in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 16)]
    pub interval_ms: u64,
}

impl Args {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse arguments from an iterator.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }
}

/// Parse a touch point given as `id,x,y,dx,dy,move`.
pub fn parse_touch(value: &str) -> Result<TouchPoint, TouchArgError> {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let [id, x, y, dx, dy, move_origin] = fields.as_slice() else {
        return Err(TouchArgError::FieldCount(fields.len()));
    };

    fn int(field: &'static str, value: &str) -> Result<i32, TouchArgError> {
        value.parse().map_err(|_| TouchArgError::InvalidField {
            field,
            value: value.to_string(),
        })
    }
    fn float(field: &'static str, value: &str) -> Result<f64, TouchArgError> {
        value.parse().map_err(|_| TouchArgError::InvalidField {
            field,
            value: value.to_string(),
        })
    }

    Ok(TouchPoint::new(
        int("id", id)?,
        Vec2::new(float("x", x)?, float("y", y)?),
        Vec2::new(float("dx", dx)?, float("dy", dy)?),
        int("move", move_origin)?,
    ))
}
