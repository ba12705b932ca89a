//! Configuration types for touchview.
//!
//! Every key is optional; missing keys and sections take their defaults.
//!
//! ```toml
//! [endpoint]
//! host = "touch-server.local"
//! port = 3333
//!
//! [gestures]
//! rotate_scale = 500.0
//!
//! [camera]
//! parallel_projection = true
//! scene_bounds = [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]
//!
//! [event_loop]
//! poll_interval_ms = 16
//! ```

use crate::args::ListenArgs;
use crate::errors::ConfigError;
use directories::BaseDirs;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use touch_input::{CameraControl, GestureConfig, SceneCamera};
use touch_protocol::DEFAULT_GESTURE_PORT;

/// Complete touchview configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gesture endpoint settings.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Gesture handler tuning.
    #[serde(default)]
    pub gestures: GesturesConfig,
    /// Initial camera.
    #[serde(default)]
    pub camera: CameraConfig,
    /// Event loop settings.
    #[serde(default)]
    pub event_loop: EventLoopConfig,
}

/// Gesture endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Touch server host name (informational).
    #[serde(default = "default_host")]
    pub host: String,
    /// UDP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_GESTURE_PORT
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Gesture handler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturesConfig {
    /// Receive gestures at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Degrees per unit of touch direction for drag and rotate.
    #[serde(default = "default_rotate_scale")]
    pub rotate_scale: f64,
    /// Exponent scale for zoom.
    #[serde(default = "default_zoom_scale")]
    pub zoom_scale: f64,
    /// Base of the zoom factor.
    #[serde(default = "default_zoom_base")]
    pub zoom_base: f64,
    /// Display pixels per unit of touch direction for translate.
    #[serde(default = "default_translate_scale")]
    pub translate_scale: f64,
}

fn default_true() -> bool {
    true
}

fn default_rotate_scale() -> f64 {
    500.0
}

fn default_zoom_scale() -> f64 {
    20.0
}

fn default_zoom_base() -> f64 {
    1.1
}

fn default_translate_scale() -> f64 {
    1000.0
}

impl Default for GesturesConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            rotate_scale: default_rotate_scale(),
            zoom_scale: default_zoom_scale(),
            zoom_base: default_zoom_base(),
            translate_scale: default_translate_scale(),
        }
    }
}

/// Camera configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Vertical field of view in degrees.
    #[serde(default = "default_view_angle")]
    pub view_angle: f64,
    #[serde(default)]
    pub parallel_projection: bool,
    #[serde(default = "default_true")]
    pub auto_adjust_clipping_range: bool,
    #[serde(default = "default_true")]
    pub light_follow_camera: bool,
    #[serde(default = "default_position")]
    pub position: [f64; 3],
    #[serde(default)]
    pub focal_point: [f64; 3],
    #[serde(default = "default_view_up")]
    pub view_up: [f64; 3],
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]` used to fit the clipping range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_bounds: Option<[f64; 6]>,
}

fn default_viewport_width() -> u32 {
    1024
}

fn default_viewport_height() -> u32 {
    768
}

fn default_view_angle() -> f64 {
    30.0
}

fn default_position() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_view_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            view_angle: default_view_angle(),
            parallel_projection: false,
            auto_adjust_clipping_range: default_true(),
            light_follow_camera: default_true(),
            position: default_position(),
            focal_point: [0.0; 3],
            view_up: default_view_up(),
            scene_bounds: None,
        }
    }
}

impl CameraConfig {
    /// Build the scene camera described by this section.
    pub fn build_camera(&self) -> SceneCamera {
        let mut camera = SceneCamera::new(self.viewport_width, self.viewport_height);
        camera.set_view_angle(self.view_angle);
        camera.set_parallel_projection(self.parallel_projection);
        camera.set_position(Point3::from(self.position));
        camera.set_focal_point(Point3::from(self.focal_point));
        camera.set_view_up(Vector3::from(self.view_up));
        camera.orthogonalize_view_up();
        camera.set_scene_bounds(self.scene_bounds);
        if self.auto_adjust_clipping_range {
            camera.reset_clipping_range();
        }
        camera.update_lights();
        camera
    }
}

/// Event loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLoopConfig {
    /// Time between endpoint polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    16
}

impl Default for EventLoopConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load and validate a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the values
    /// are invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration for the `listen` command.
    ///
    /// The explicit config file is loaded if given, otherwise the default
    /// config file if it exists. Command-line values then override the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the resulting
    /// configuration is invalid.
    pub fn from_args(config_path: Option<&Path>, listen: &ListenArgs) -> Result<Self, ConfigError> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let base = match path {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };

        let mut builder = ConfigBuilder { config: base };
        if let Some(port) = listen.port {
            builder = builder.port(port);
        }
        if let Some(host) = &listen.host {
            builder = builder.host(host);
        }
        builder.build()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if self.endpoint.port == 0 {
            return invalid("Port cannot be 0");
        }

        let g = &self.gestures;
        for (name, value) in [
            ("rotate_scale", g.rotate_scale),
            ("zoom_scale", g.zoom_scale),
            ("translate_scale", g.translate_scale),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(g.zoom_base > 0.0 && g.zoom_base.is_finite()) {
            return invalid("zoom_base must be positive");
        }

        let c = &self.camera;
        if c.viewport_width == 0 || c.viewport_height == 0 {
            return invalid("Viewport size cannot be 0");
        }
        if !(c.view_angle > 0.0 && c.view_angle < 180.0) {
            return invalid("view_angle must be between 0 and 180 degrees");
        }
        let direction = Point3::from(c.focal_point) - Point3::from(c.position);
        if direction.norm() < f64::EPSILON {
            return invalid("Camera position and focal point cannot coincide");
        }
        let view_up = Vector3::from(c.view_up);
        if view_up.cross(&direction).norm() < f64::EPSILON * direction.norm() * view_up.norm().max(1.0) {
            return invalid("view_up cannot be parallel to the view direction");
        }
        if let Some(b) = c.scene_bounds {
            if b[0] > b[1] || b[2] > b[3] || b[4] > b[5] {
                return invalid("scene_bounds must be [xmin, xmax, ymin, ymax, zmin, zmax]");
            }
        }

        if self.event_loop.poll_interval_ms == 0 {
            return invalid("poll_interval_ms cannot be 0");
        }

        Ok(())
    }

    /// Handler tuning from the gestures and camera sections.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            rotate_scale: self.gestures.rotate_scale,
            zoom_scale: self.gestures.zoom_scale,
            zoom_base: self.gestures.zoom_base,
            translate_scale: self.gestures.translate_scale,
            auto_adjust_clipping_range: self.camera.auto_adjust_clipping_range,
            light_follow_camera: self.camera.light_follow_camera,
        }
    }

    /// Returns the event loop poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.event_loop.poll_interval_ms)
    }
}

/// `<config dir>/touchview/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("touchview").join("config.toml"))
}

/// Builder for creating a `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the touch server host name.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.endpoint.host = host.into();
        self
    }

    /// Sets the UDP port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.endpoint.port = port;
        self
    }

    /// Enables or disables gesture input.
    #[must_use]
    pub fn gestures_enabled(mut self, enabled: bool) -> Self {
        self.config.gestures.enabled = enabled;
        self
    }

    /// Sets the poll interval in milliseconds.
    #[must_use]
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.event_loop.poll_interval_ms = ms;
        self
    }

    /// Sets the camera section.
    #[must_use]
    pub fn camera(mut self, camera: CameraConfig) -> Self {
        self.config.camera = camera;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.endpoint.port, 3333);
        assert_eq!(config.endpoint.host, "localhost");
        assert_eq!(config.poll_interval(), Duration::from_millis(16));
        assert_eq!(config.gesture_config(), GestureConfig::default());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .host("touch-server")
            .port(4000)
            .poll_interval_ms(5)
            .build()
            .unwrap();
        assert_eq!(config.endpoint.host, "touch-server");
        assert_eq!(config.endpoint.port, 4000);
        assert_eq!(config.event_loop.poll_interval_ms, 5);
    }

    #[test]
    fn test_config_validation_zero_port() {
        assert!(Config::builder().port(0).build().is_err());
    }

    #[test]
    fn test_config_validation_scales() {
        let mut config = Config::default();
        config.gestures.zoom_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gestures.zoom_base = -1.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gestures.rotate_scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_camera() {
        let mut config = Config::default();
        config.camera.viewport_height = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.view_angle = 180.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.focal_point = config.camera.position;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.view_up = [0.0, 0.0, 2.0];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.scene_bounds = Some([1.0, -1.0, 0.0, 1.0, 0.0, 1.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_poll_interval() {
        assert!(Config::builder().poll_interval_ms(0).build().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
            [endpoint]
            port = 4444

            [camera]
            parallel_projection = true
            scene_bounds = [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]
            "#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.endpoint.port, 4444);
        assert_eq!(config.endpoint.host, "localhost");
        assert!(config.camera.parallel_projection);
        assert_eq!(config.camera.viewport_width, 1024);
        assert_eq!(config.gestures, GesturesConfig::default());
        assert_eq!(config.event_loop, EventLoopConfig::default());
    }

    #[test]
    fn test_load_empty_file() {
        let file = write_config("");
        assert_eq!(Config::load(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_load_errors() {
        let file = write_config("[endpoint]\nport = \"not a number\"\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let file = write_config("[endpoint]\nport = 0\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_from_args_overrides_file() {
        let file = write_config("[endpoint]\nhost = \"file-host\"\nport = 4444\n");
        let listen = ListenArgs {
            port: Some(5555),
            host: None,
        };
        let config = Config::from_args(Some(file.path()), &listen).unwrap();
        assert_eq!(config.endpoint.port, 5555);
        assert_eq!(config.endpoint.host, "file-host");
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = Config::default();
        config.camera.scene_bounds = Some([0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_build_camera() {
        let camera_config = CameraConfig {
            position: [0.0, 0.0, 5.0],
            scene_bounds: Some([-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]),
            viewport_width: 800,
            viewport_height: 600,
            ..Default::default()
        };
        let camera = camera_config.build_camera();
        assert_eq!(camera.viewport(), (800, 600));
        assert_eq!(camera.position(), Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.headlight().position, camera.position());
        let (near, far) = camera.clipping_range();
        assert!(near > 2.0 && far < 8.0);
    }
}
