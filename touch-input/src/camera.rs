//! Camera interface used by the gesture handlers, and a reference camera.
//!
//! [`CameraControl`] is what the handlers need from a scene: orbiting
//! rotations, dolly and parallel scale, clipping and light updates, redraw,
//! and projection between world and display coordinates.
//!
//! Display coordinates are pixels with the origin at the bottom-left of the
//! viewport, plus a depth in `[0, 1]` from the near to the far clipping plane.

use nalgebra::{matrix, Matrix4, Point3, Rotation3, Unit, Vector3};
use tracing::trace;

/// Camera operations driven by gestures.
///
/// Angles are in degrees. Rotations orbit the focal point.
pub trait CameraControl {
    /// Rotate the position about the view-up vector.
    fn azimuth(&mut self, degrees: f64);
    /// Rotate the position about the camera's right axis.
    fn elevation(&mut self, degrees: f64);
    /// Rotate the view-up vector about the direction of projection.
    fn roll(&mut self, degrees: f64);
    /// Move toward the focal point, dividing the distance by `factor`.
    fn dolly(&mut self, factor: f64);
    /// Make view-up perpendicular to the direction of projection.
    fn orthogonalize_view_up(&mut self);

    fn position(&self) -> Point3<f64>;
    fn set_position(&mut self, position: Point3<f64>);
    fn focal_point(&self) -> Point3<f64>;
    fn set_focal_point(&mut self, focal_point: Point3<f64>);

    fn is_parallel_projection(&self) -> bool;
    fn parallel_scale(&self) -> f64;
    fn set_parallel_scale(&mut self, scale: f64);

    /// Fit the near and far planes around the visible scene.
    fn reset_clipping_range(&mut self);
    /// Place the lights at the camera.
    fn update_lights(&mut self);
    /// Request a redraw.
    fn render(&mut self);

    /// Project a world point to display coordinates.
    fn world_to_display(&self, world: &Point3<f64>) -> Option<Point3<f64>>;
    /// Unproject a display point (x, y, depth) to world coordinates.
    fn display_to_world(&self, display: &Point3<f64>) -> Option<Point3<f64>>;
}

/// Light placed at the camera and aimed at its focal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Headlight {
    pub position: Point3<f64>,
    pub focal_point: Point3<f64>,
}

const DEFAULT_CLIPPING_RANGE: (f64, f64) = (0.01, 1000.01);
const NEAR_CLIPPING_PLANE_TOLERANCE: f64 = 0.001;
const CLIPPING_RANGE_EXPANSION: f64 = 0.5;

/// Reference scene camera.
///
/// Holds the camera's geometry and projection and implements
/// [`CameraControl`] without a renderer behind it: redraw requests are
/// counted, the headlight is tracked as plain geometry, and the clipping
/// range is fitted to configured scene bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneCamera {
    position: Point3<f64>,
    focal_point: Point3<f64>,
    view_up: Vector3<f64>,
    /// Vertical field of view in degrees.
    view_angle: f64,
    parallel_projection: bool,
    parallel_scale: f64,
    clipping_range: (f64, f64),
    viewport: (u32, u32),
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]` of the visible scene.
    scene_bounds: Option<[f64; 6]>,
    headlight: Headlight,
    render_count: u64,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl SceneCamera {
    /// Camera at `(0, 0, 1)` looking at the origin with +Y up, for a
    /// `width` x `height` viewport.
    pub fn new(width: u32, height: u32) -> Self {
        let position = Point3::new(0.0, 0.0, 1.0);
        let focal_point = Point3::origin();
        Self {
            position,
            focal_point,
            view_up: Vector3::y(),
            view_angle: 30.0,
            parallel_projection: false,
            parallel_scale: 1.0,
            clipping_range: DEFAULT_CLIPPING_RANGE,
            viewport: (width.max(1), height.max(1)),
            scene_bounds: None,
            headlight: Headlight {
                position,
                focal_point,
            },
            render_count: 0,
        }
    }

    pub fn view_up(&self) -> Vector3<f64> {
        self.view_up
    }

    pub fn set_view_up(&mut self, view_up: Vector3<f64>) {
        self.view_up = view_up.try_normalize(f64::EPSILON).unwrap_or(self.view_up);
    }

    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    /// Set the vertical field of view, clamped to `[0.00000001, 179]` degrees.
    pub fn set_view_angle(&mut self, degrees: f64) {
        self.view_angle = degrees.clamp(0.000_000_01, 179.0);
    }

    pub fn set_parallel_projection(&mut self, parallel: bool) {
        self.parallel_projection = parallel;
    }

    pub fn clipping_range(&self) -> (f64, f64) {
        self.clipping_range
    }

    /// Set the near and far planes. Swapped if given in reverse.
    pub fn set_clipping_range(&mut self, near: f64, far: f64) {
        let (near, far) = if near <= far { (near, far) } else { (far, near) };
        let far = if far - near < 1e-20 { near + 1e-20 } else { far };
        self.clipping_range = (near, far);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    pub fn scene_bounds(&self) -> Option<[f64; 6]> {
        self.scene_bounds
    }

    pub fn set_scene_bounds(&mut self, bounds: Option<[f64; 6]>) {
        self.scene_bounds = bounds;
    }

    pub fn headlight(&self) -> Headlight {
        self.headlight
    }

    /// Number of redraws requested so far.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Distance from position to focal point.
    pub fn distance(&self) -> f64 {
        (self.focal_point - self.position).norm()
    }

    /// Unit vector from position toward the focal point.
    pub fn direction_of_projection(&self) -> Vector3<f64> {
        (self.focal_point - self.position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| -Vector3::z())
    }

    /// Width over height of the viewport.
    pub fn aspect(&self) -> f64 {
        f64::from(self.viewport.0) / f64::from(self.viewport.1)
    }

    /// Orthonormal camera basis: right, up, and backward (toward the eye).
    fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let backward = -self.direction_of_projection();
        let right = self
            .view_up
            .cross(&backward)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| any_perpendicular(&backward));
        let up = backward.cross(&right);
        (right, up, backward)
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let (r, u, b) = self.basis();
        let p = self.position.coords;
        matrix![r.x, r.y, r.z, -r.dot(&p);
                u.x, u.y, u.z, -u.dot(&p);
                b.x, b.y, b.z, -b.dot(&p);
                0.0, 0.0, 0.0, 1.0]
    }

    /// Camera-to-clip matrix, mapping the view frustum to `[-1, 1]^3`.
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let (near, far) = self.clipping_range;
        let aspect = self.aspect();
        if self.parallel_projection {
            let h = self.parallel_scale;
            let w = h * aspect;
            matrix![1.0 / w, 0.0, 0.0, 0.0;
                    0.0, 1.0 / h, 0.0, 0.0;
                    0.0, 0.0, -2.0 / (far - near), -(far + near) / (far - near);
                    0.0, 0.0, 0.0, 1.0]
        } else {
            let f = 1.0 / (self.view_angle.to_radians() / 2.0).tan();
            matrix![f / aspect, 0.0, 0.0, 0.0;
                    0.0, f, 0.0, 0.0;
                    0.0, 0.0, (far + near) / (near - far), 2.0 * far * near / (near - far);
                    0.0, 0.0, -1.0, 0.0]
        }
    }

    fn rotate_about_focal_point(&mut self, axis: Vector3<f64>, degrees: f64) {
        let Some(axis) = Unit::try_new(axis, f64::EPSILON) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&candidate).normalize()
}

impl CameraControl for SceneCamera {
    fn azimuth(&mut self, degrees: f64) {
        self.rotate_about_focal_point(self.view_up, degrees);
    }

    fn elevation(&mut self, degrees: f64) {
        let (right, _, _) = self.basis();
        self.rotate_about_focal_point(-right, degrees);
    }

    fn roll(&mut self, degrees: f64) {
        let Some(axis) = Unit::try_new(self.direction_of_projection(), f64::EPSILON) else {
            return;
        };
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.view_up = rotation * self.view_up;
    }

    fn dolly(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let distance = self.distance() / factor;
        self.position = self.focal_point - distance * self.direction_of_projection();
    }

    fn orthogonalize_view_up(&mut self) {
        let (_, up, _) = self.basis();
        self.view_up = up;
    }

    fn position(&self) -> Point3<f64> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    fn focal_point(&self) -> Point3<f64> {
        self.focal_point
    }

    fn set_focal_point(&mut self, focal_point: Point3<f64>) {
        self.focal_point = focal_point;
    }

    fn is_parallel_projection(&self) -> bool {
        self.parallel_projection
    }

    fn parallel_scale(&self) -> f64 {
        self.parallel_scale
    }

    fn set_parallel_scale(&mut self, scale: f64) {
        self.parallel_scale = scale;
    }

    fn reset_clipping_range(&mut self) {
        let Some(bounds) = self.scene_bounds else {
            trace!("no scene bounds, clipping range unchanged");
            return;
        };

        let dop = self.direction_of_projection();
        let mut near = f64::MAX;
        let mut far = 1e-18_f64;
        for &x in &bounds[0..2] {
            for &y in &bounds[2..4] {
                for &z in &bounds[4..6] {
                    let dist = dop.dot(&(Point3::new(x, y, z) - self.position));
                    near = near.min(dist);
                    far = far.max(dist);
                }
            }
        }

        if near < 0.0 {
            near = 0.0;
        }
        near = 0.99 * near - (far - near) * CLIPPING_RANGE_EXPANSION;
        far = 1.01 * far + (far - near) * CLIPPING_RANGE_EXPANSION;
        if near >= far {
            near = 0.01 * far;
        }
        if near < NEAR_CLIPPING_PLANE_TOLERANCE * far {
            near = NEAR_CLIPPING_PLANE_TOLERANCE * far;
        }
        self.clipping_range = (near, far);
    }

    fn update_lights(&mut self) {
        self.headlight = Headlight {
            position: self.position,
            focal_point: self.focal_point,
        };
    }

    fn render(&mut self) {
        self.render_count += 1;
        trace!(
            position = ?self.position,
            focal_point = ?self.focal_point,
            "render"
        );
    }

    fn world_to_display(&self, world: &Point3<f64>) -> Option<Point3<f64>> {
        let clip = self.projection_matrix() * self.view_matrix() * world.to_homogeneous();
        let ndc = Point3::from_homogeneous(clip)?;
        let (width, height) = (f64::from(self.viewport.0), f64::from(self.viewport.1));
        Some(Point3::new(
            (ndc.x + 1.0) * width / 2.0,
            (ndc.y + 1.0) * height / 2.0,
            (ndc.z + 1.0) / 2.0,
        ))
    }

    fn display_to_world(&self, display: &Point3<f64>) -> Option<Point3<f64>> {
        let (width, height) = (f64::from(self.viewport.0), f64::from(self.viewport.1));
        let ndc = Point3::new(
            2.0 * display.x / width - 1.0,
            2.0 * display.y / height - 1.0,
            2.0 * display.z - 1.0,
        );
        let inverse = (self.projection_matrix() * self.view_matrix()).try_inverse()?;
        Point3::from_homogeneous(inverse * ndc.to_homogeneous())
    }
}
