//! Default camera interactions for gestures.

use crate::camera::CameraControl;
use crate::gestures::GestureConfig;
use crate::observer::GestureObserver;
use nalgebra::Point3;
use touch_protocol::TouchPoint;
use tracing::trace;

/// Axis a translate gesture pans along, in display space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanAxis {
    X,
    Y,
}

/// Turns gestures into camera motion.
///
/// - one-drag orbits the camera
/// - zoom dollies, or changes the parallel scale in orthographic views
/// - translate-X/Y pans along the display axes
/// - rotate-X/Y/Z elevate, azimuth and roll about the focal point
///
/// Every other event leaves the camera alone. Gestures without the touches
/// they need are ignored.
#[derive(Debug, Clone)]
pub struct CameraGestureHandler<C> {
    camera: C,
    config: GestureConfig,
}

impl<C: CameraControl> CameraGestureHandler<C> {
    /// Create a handler with default tuning.
    pub fn new(camera: C) -> Self {
        Self::with_config(camera, GestureConfig::default())
    }

    /// Create with custom tuning.
    pub fn with_config(camera: C, config: GestureConfig) -> Self {
        Self { camera, config }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Zoom factor for a pair of touches.
    ///
    /// The magnitude comes from the first touch's direction. It is negated
    /// (zoom out) when the rightmost of the two touches moves left.
    pub fn zoom_factor(&self, first: &TouchPoint, second: &TouchPoint) -> f64 {
        let mut amount = first.direction.norm();
        let rightmost = if first.location.x > second.location.x {
            first
        } else {
            second
        };
        if rightmost.direction.x < 0.0 {
            amount = -amount;
        }
        self.config.zoom_base.powf(amount * self.config.zoom_scale)
    }

    fn reset_clipping_if_enabled(&mut self) {
        if self.config.auto_adjust_clipping_range {
            self.camera.reset_clipping_range();
        }
    }

    fn follow_and_render(&mut self) {
        if self.config.light_follow_camera {
            self.camera.update_lights();
        }
        self.camera.render();
    }

    fn pan(&mut self, touches: &[TouchPoint], axis: PanAxis) {
        let Some(anchor) = touches.iter().find(|t| t.is_move_origin()) else {
            trace!(?axis, "translate without anchor touch");
            return;
        };

        // Both axes are driven by the vertical component of the motion.
        let offset = anchor.direction.y * self.config.translate_scale;
        let (dx, dy) = match axis {
            PanAxis::X => (offset, 0.0),
            PanAxis::Y => (0.0, offset),
        };

        let Some(focus) = self.camera.world_to_display(&self.camera.focal_point()) else {
            trace!("focal point does not project");
            return;
        };
        let (x, y) = (anchor.location.x, anchor.location.y);
        let picked = self.camera.display_to_world(&Point3::new(x, y, focus.z));
        let offset_pick = self
            .camera
            .display_to_world(&Point3::new(x + dx, y + dy, focus.z));
        let (Some(picked), Some(offset_pick)) = (picked, offset_pick) else {
            trace!("touch location does not unproject");
            return;
        };

        // The camera moves against the content.
        let motion = offset_pick - picked;
        let focal_point = self.camera.focal_point() + motion;
        let position = self.camera.position() + motion;
        self.camera.set_focal_point(focal_point);
        self.camera.set_position(position);

        self.follow_and_render();
    }

    fn rotate(&mut self, touches: &[TouchPoint], apply: impl FnOnce(&mut C, f64)) {
        let Some(anchor) = touches.iter().find(|t| t.is_move_origin()) else {
            trace!("rotate without anchor touch");
            return;
        };

        let dy = anchor.direction.y * self.config.rotate_scale;
        apply(&mut self.camera, dy);
        self.camera.orthogonalize_view_up();
        self.reset_clipping_if_enabled();
        self.follow_and_render();
    }
}

impl<C: CameraControl> GestureObserver for CameraGestureHandler<C> {
    fn on_one_drag(&mut self, touches: &[TouchPoint]) {
        let Some(touch) = touches.first() else {
            trace!("one-drag without touches");
            return;
        };

        let motion = touch.direction.scaled(self.config.rotate_scale);
        self.camera.azimuth(-motion.x);
        self.camera.elevation(motion.y);
        self.camera.orthogonalize_view_up();
        self.reset_clipping_if_enabled();
        self.follow_and_render();
    }

    fn on_zoom(&mut self, touches: &[TouchPoint]) {
        let [first, second, ..] = touches else {
            trace!(touches = touches.len(), "zoom needs two touches");
            return;
        };

        let factor = self.zoom_factor(first, second);
        if self.camera.is_parallel_projection() {
            let scale = self.camera.parallel_scale() / factor;
            self.camera.set_parallel_scale(scale);
        } else {
            self.camera.dolly(factor);
            self.reset_clipping_if_enabled();
        }
        self.follow_and_render();
    }

    fn on_translate_x(&mut self, touches: &[TouchPoint]) {
        self.pan(touches, PanAxis::X);
    }

    fn on_translate_y(&mut self, touches: &[TouchPoint]) {
        self.pan(touches, PanAxis::Y);
    }

    fn on_rotate_x(&mut self, touches: &[TouchPoint]) {
        self.rotate(touches, |camera, dy| camera.elevation(dy));
    }

    fn on_rotate_y(&mut self, touches: &[TouchPoint]) {
        self.rotate(touches, |camera, dy| camera.azimuth(-dy));
    }

    fn on_rotate_z(&mut self, touches: &[TouchPoint]) {
        self.rotate(touches, |camera, dy| camera.roll(-dy));
    }
}
