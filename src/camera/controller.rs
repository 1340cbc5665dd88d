use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::core::PerspectiveCamera;
use crate::input::{InputEvent, MouseButton};
use crate::options::ControlsOptions;

/// Smallest polar angle / squared movement treated as non-zero.
const EPS: f32 = 1e-6;

/// Anything that owns the scene camera and reacts to pointer input.
///
/// The frame loop calls [`update`](Self::update) once per frame after the
/// render, so controls may ease motion out over several frames.
pub trait CameraControls {
    /// The camera the controls drive.
    fn camera(&self) -> &PerspectiveCamera;
    /// Apply pending motion. Returns `true` if the camera moved.
    fn update(&mut self) -> bool;
    /// Track a new viewport size (updates the camera aspect).
    fn resize(&mut self, width: u32, height: u32);
    /// Feed a pointer event. Returns `true` if the event was consumed.
    fn handle_input(&mut self, event: InputEvent) -> bool {
        let _ = event;
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    None,
    Rotate,
    Pan,
}

/// Orbit camera controls: rotate around a target, pan in the view plane,
/// dolly towards/away from the target.
///
/// Rotation is tracked in spherical coordinates about a Y-up axis. Input
/// only accumulates pending deltas; [`CameraControls::update`] applies them,
/// easing them out over several updates when damping is enabled.
pub struct OrbitControls {
    camera: PerspectiveCamera,
    target: Vec3,

    // Pending spherical deltas (azimuth, polar) and pan offset
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
    scale: f32,

    viewport: (u32, u32),
    drag: DragMode,
    shift_pressed: bool,
    last_cursor: Option<Vec2>,

    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    /// Wrap `camera`, orbiting around its current target.
    #[must_use]
    pub fn new(
        camera: PerspectiveCamera,
        options: &ControlsOptions,
        viewport: (u32, u32),
    ) -> Self {
        let target = camera.target;
        Self {
            camera,
            target,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            viewport,
            drag: DragMode::None,
            shift_pressed: false,
            last_cursor: None,
            enable_damping: options.enable_damping,
            damping_factor: options.damping_factor.clamp(0.0, 1.0),
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
        }
    }

    /// The point the camera orbits around.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Current eye-to-target distance.
    pub fn distance(&self) -> f32 {
        (self.camera.eye - self.target).length()
    }

    /// Queue a rotation around the vertical axis (radians).
    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    /// Queue a rotation towards the top pole (radians).
    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    /// Queue a pan by a screen-space pixel delta.
    pub fn pan(&mut self, delta: Vec2) {
        let height = self.viewport.1.max(1) as f32;
        let offset = self.camera.eye - self.target;
        // Half the visible height at the target plane
        let target_distance =
            offset.length() * (self.camera.fovy.to_radians() / 2.0).tan();

        let forward = (self.target - self.camera.eye).normalize_or_zero();
        let right = forward.cross(self.camera.up).normalize_or_zero();
        let up = right.cross(forward);

        let left = right * (-2.0 * delta.x * target_distance / height);
        let upward = up * (2.0 * delta.y * target_distance / height);
        self.pan_offset += left + upward;
    }

    /// Queue a dolly. Positive values move towards the target.
    pub fn dolly(&mut self, amount: f32) {
        let zoom_scale = 0.95f32.powf(self.zoom_speed);
        self.scale *= zoom_scale.powf(amount);
    }

    fn drag_to(&mut self, position: Vec2) {
        let Some(last) = self.last_cursor.replace(position) else {
            return;
        };
        let delta = position - last;
        let height = self.viewport.1.max(1) as f32;
        match self.drag {
            DragMode::Rotate => {
                self.rotate_left(TAU * delta.x / height * self.rotate_speed);
                self.rotate_up(TAU * delta.y / height * self.rotate_speed);
            }
            DragMode::Pan => self.pan(delta * self.pan_speed),
            DragMode::None => {}
        }
    }
}

impl CameraControls for OrbitControls {
    fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    fn update(&mut self) -> bool {
        let previous_eye = self.camera.eye;
        let previous_target = self.target;

        let offset = self.camera.eye - self.target;
        let radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.theta_delta * step;
        phi += self.phi_delta * step;
        phi = phi.clamp(EPS, PI - EPS);

        let radius = (radius * self.scale)
            .max(self.min_distance)
            .min(self.max_distance);
        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        self.camera.eye = self.target + new_offset;
        self.camera.target = self.target;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        self.camera.eye.distance_squared(previous_eye) > EPS
            || self.target.distance_squared(previous_target) > EPS
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera.set_viewport(width, height);
    }

    fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::MouseButton { button, pressed } => {
                self.drag = if !pressed {
                    DragMode::None
                } else {
                    match button {
                        MouseButton::Left if self.shift_pressed => DragMode::Pan,
                        MouseButton::Left => DragMode::Rotate,
                        MouseButton::Right | MouseButton::Middle => DragMode::Pan,
                    }
                };
                true
            }
            InputEvent::CursorMoved { x, y } => {
                self.drag_to(Vec2::new(x, y));
                self.drag != DragMode::None
            }
            InputEvent::Scroll { delta } => {
                self.dolly(delta);
                true
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CameraOptions;

    fn controls(enable_damping: bool) -> OrbitControls {
        let camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        let options = ControlsOptions {
            enable_damping,
            ..ControlsOptions::default()
        };
        OrbitControls::new(camera, &options, (800, 600))
    }

    fn assert_near(a: Vec3, b: Vec3) {
        assert!(a.distance(b) < 1e-3, "{a} != {b}");
    }

    #[test]
    fn idle_update_does_not_move_camera() {
        let mut c = controls(true);
        assert!(!c.update());
        assert_near(c.camera().eye, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut c = controls(false);
        c.rotate_left(PI / 2.0);
        assert!(c.update());
        assert_near(c.camera().eye, Vec3::new(-5.0, 0.0, 0.0));
        assert!(!c.update());
    }

    #[test]
    fn damped_rotation_eases_towards_full_angle() {
        let mut c = controls(true);
        c.rotate_left(PI / 2.0);
        assert!(c.update());
        // Only damping_factor of the rotation lands on the first update
        let first_angle = c.camera().eye.x.atan2(c.camera().eye.z);
        assert!((first_angle + PI / 2.0 * 0.025).abs() < 1e-4);

        for _ in 0..2000 {
            let _ = c.update();
        }
        assert_near(c.camera().eye, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn polar_angle_is_clamped_at_the_pole() {
        let mut c = controls(false);
        c.rotate_up(TAU);
        let _ = c.update();
        let eye = c.camera().eye;
        assert!(eye.is_finite());
        assert!(eye.y > 4.99);
        assert!((eye.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn scroll_dollies_towards_target() {
        let mut c = controls(false);
        assert!(c.handle_input(InputEvent::Scroll { delta: 1.0 }));
        let _ = c.update();
        assert!((c.distance() - 5.0 * 0.95).abs() < 1e-4);
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let camera =
            PerspectiveCamera::from_options(&CameraOptions::default(), 800, 600);
        let options = ControlsOptions {
            enable_damping: false,
            min_distance: 4.0,
            max_distance: 6.0,
            ..ControlsOptions::default()
        };
        let mut c = OrbitControls::new(camera, &options, (800, 600));
        c.dolly(50.0);
        let _ = c.update();
        assert!((c.distance() - 4.0).abs() < 1e-4);
        c.dolly(-50.0);
        let _ = c.update();
        assert!((c.distance() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn left_drag_orbits_at_constant_distance() {
        let mut c = controls(false);
        let _ = c.handle_input(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = c.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(c.handle_input(InputEvent::CursorMoved { x: 100.0, y: 0.0 }));
        assert!(c.update());
        assert!((c.distance() - 5.0).abs() < 1e-4);
        assert!(c.camera().eye.x < 0.0);
    }

    #[test]
    fn moves_without_button_are_ignored() {
        let mut c = controls(false);
        let _ = c.handle_input(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        assert!(!c.handle_input(InputEvent::CursorMoved { x: 300.0, y: 10.0 }));
        assert!(!c.update());
    }

    #[test]
    fn release_ends_the_drag() {
        let mut c = controls(false);
        let _ = c.handle_input(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = c.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        let _ = c.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert!(!c.handle_input(InputEvent::CursorMoved { x: 200.0, y: 50.0 }));
        assert!(!c.update());
    }

    #[test]
    fn shift_drag_pans_target() {
        let mut c = controls(false);
        let _ = c.handle_input(InputEvent::ModifiersChanged { shift: true });
        let _ = c.handle_input(InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = c.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        let _ = c.handle_input(InputEvent::CursorMoved { x: 50.0, y: 0.0 });
        assert!(c.update());
        // Dragging right moves the scene right, i.e. the target left
        assert!(c.target().x < 0.0);
        assert!((c.distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn horizontal_middle_drag_pans_without_dolly() {
        let mut c = controls(false);
        let _ = c.handle_input(InputEvent::CursorMoved { x: 0.0, y: 100.0 });
        let _ = c.handle_input(InputEvent::MouseButton {
            button: MouseButton::Middle,
            pressed: true,
        });
        for step in 1..=10 {
            let x = step as f32 * 10.0;
            let _ = c.handle_input(InputEvent::CursorMoved { x, y: 100.0 });
        }
        assert!(c.update());
        assert!((c.distance() - 5.0).abs() < 1e-4);
        assert!(c.target().x < 0.0);
        assert!(c.target().y.abs() < 1e-4);
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut c = controls(true);
        c.resize(1280, 720);
        assert!((c.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
