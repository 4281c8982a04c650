use std::f32::consts::PI;
use three_d::*;

use crate::config::OrbitConfig;


const POLAR_EPS: f32 = 1e-4;
const REST_EPS: f32 = 1e-6;


/// Camera motion that has been requested but not yet applied
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitDelta {
    /// Azimuth around +y, radians
    pub theta: f32,
    /// Polar angle from +y, radians
    pub phi: f32,
    /// World-space target translation
    pub pan: Vec3,
    /// Log-scale dolly, positive moves closer
    pub zoom: f32,
}
impl Default for OrbitDelta {
    fn default() -> Self {
        Self { theta: 0.0, phi: 0.0, pan: Vec3::zero(), zoom: 0.0 }
    }
}
impl OrbitDelta {
    fn is_at_rest(&self) -> bool {
        self.theta.abs() < REST_EPS
            && self.phi.abs() < REST_EPS
            && self.pan.magnitude() < REST_EPS
            && self.zoom.abs() < REST_EPS
    }

    /// Splits off the part to apply this frame and keeps the rest pending
    fn take_step(&mut self, damping: Option<f32>) -> OrbitDelta {
        let zoom = std::mem::take(&mut self.zoom);
        let step = match damping {
            Some(factor) => {
                let factor = factor.clamp(0.0, 1.0);
                let step = OrbitDelta {
                    theta: self.theta * factor,
                    phi: self.phi * factor,
                    pan: self.pan * factor,
                    zoom,
                };
                self.theta -= step.theta;
                self.phi -= step.phi;
                self.pan -= step.pan;
                step
            }
            None => {
                let step = OrbitDelta { zoom, ..*self };
                *self = OrbitDelta::default();
                step
            }
        };
        if self.is_at_rest() {
            // fold the leftover into this frame so motion ends exactly where it was aimed
            let rest = std::mem::take(self);
            return OrbitDelta {
                theta: step.theta + rest.theta,
                phi: step.phi + rest.phi,
                pan: step.pan + rest.pan,
                zoom: step.zoom,
            };
        }
        step
    }
}


/// Orbit (left drag), pan (right drag) and dolly (wheel) around a target point,
/// with optional damping that eases motion out over the following frames
pub struct OrbitControl {
    target: Vec3,
    config: OrbitConfig,
    pending: OrbitDelta,
}
impl OrbitControl {
    pub fn new(target: Vec3, config: OrbitConfig) -> Self {
        Self {
            target,
            config,
            pending: OrbitDelta::default(),
        }
    }

    #[cfg(test)]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending.theta -= dx * self.config.rotate_speed;
        self.pending.phi -= dy * self.config.rotate_speed;
    }

    /// Drag in pixels; the target follows the cursor in the camera plane
    pub fn pan(&mut self, camera: &Camera, dx: f32, dy: f32) {
        let (right, up) = camera_basis(*camera.position(), self.target);
        let distance = (*camera.position() - self.target).magnitude();
        let scale = self.config.pan_speed * distance;
        self.pending.pan += (-right * dx + up * dy) * scale;
    }

    pub fn zoom(&mut self, wheel: f32) {
        self.pending.zoom += wheel * self.config.zoom_speed;
    }

    /// Collects unhandled mouse input. Returns true if anything was consumed.
    pub fn handle_events(&mut self, camera: &Camera, events: &mut [Event]) -> bool {
        let mut consumed = false;
        for event in events.iter_mut() {
            match event {
                Event::MouseMotion { button, delta, handled, .. } if !*handled => {
                    match button {
                        Some(MouseButton::Left) => self.rotate(delta.0, delta.1),
                        Some(MouseButton::Right) => self.pan(camera, delta.0, delta.1),
                        _ => continue,
                    }
                    *handled = true;
                    consumed = true;
                }
                Event::MouseWheel { delta, handled, .. } if !*handled => {
                    self.zoom(delta.1);
                    *handled = true;
                    consumed = true;
                }
                _ => {}
            }
        }
        consumed
    }

    /// Applies this frame's share of the pending motion. Must be called each frame.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let damping = self.config.enable_damping.then_some(self.config.damping_factor);
        let step = self.pending.take_step(damping);
        if step == OrbitDelta::default() {
            return false;
        }

        let offset = *camera.position() - self.target;
        let radius = offset.magnitude();
        let theta = offset.x.atan2(offset.z) + step.theta;
        let phi = ((offset.y / radius.max(REST_EPS)).clamp(-1.0, 1.0).acos() + step.phi)
            .clamp(POLAR_EPS, PI - POLAR_EPS);
        let radius = (radius * (-step.zoom).exp())
            .clamp(self.config.min_distance, self.config.max_distance);

        self.target += step.pan;
        let position = self.target + vec3(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.set_view(position, self.target, vec3(0.0, 1.0, 0.0));
        true
    }
}


/// Right and up directions of a camera looking from `position` at `target`
fn camera_basis(position: Vec3, target: Vec3) -> (Vec3, Vec3) {
    let forward = (target - position).normalize();
    let right = forward.cross(vec3(0.0, 1.0, 0.0));
    let right = if right.magnitude() < REST_EPS { vec3(1.0, 0.0, 0.0) } else { right.normalize() };
    (right, right.cross(forward))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new_perspective(
            Viewport::new_at_origo(800, 600),
            vec3(0.0, 0.0, 10.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            degrees(50.0),
            0.1,
            100.0,
        )
    }

    fn undamped() -> OrbitConfig {
        OrbitConfig { enable_damping: false, ..OrbitConfig::default() }
    }

    #[test]
    fn orbiting_keeps_the_distance_to_the_target() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), undamped());
        control.rotate(120.0, -45.0);
        assert!(control.update(&mut camera));
        assert!((camera.position().magnitude() - 10.0).abs() < 1e-3);
        assert!(camera.position().x.abs() > 0.1);
    }

    #[test]
    fn dragging_right_swings_the_camera_left() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), undamped());
        control.rotate(100.0, 0.0);
        control.update(&mut camera);
        assert!(camera.position().x < 0.0);
    }

    #[test]
    fn damping_decays_geometrically() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), OrbitConfig::default());
        control.rotate(100.0, 0.0);
        let total = control.pending.theta;

        control.update(&mut camera);
        let left = control.pending.theta;
        assert!((left - total * 0.95).abs() < 1e-6);

        control.update(&mut camera);
        assert!((control.pending.theta - total * 0.95 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn damped_motion_eventually_rests_at_the_full_angle() {
        let mut damped_camera = camera();
        let mut damped = OrbitControl::new(Vec3::zero(), OrbitConfig::default());
        damped.rotate(100.0, 0.0);
        let mut frames = 0;
        while damped.update(&mut damped_camera) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(frames > 1);
        assert_eq!(damped.pending, OrbitDelta::default());

        let mut direct_camera = camera();
        let mut direct = OrbitControl::new(Vec3::zero(), undamped());
        direct.rotate(100.0, 0.0);
        direct.update(&mut direct_camera);

        assert!((*damped_camera.position() - *direct_camera.position()).magnitude() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), undamped());
        control.rotate(0.0, 1.0e5);
        control.update(&mut camera);
        assert!(camera.position().y <= 10.0);
        assert!(vec2(camera.position().x, camera.position().z).magnitude() > 0.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = camera();
        let config = OrbitConfig { min_distance: 2.0, max_distance: 20.0, ..undamped() };
        let mut control = OrbitControl::new(Vec3::zero(), config);

        control.zoom(1.0e6);
        control.update(&mut camera);
        assert!((camera.position().magnitude() - 2.0).abs() < 1e-3);

        control.zoom(-1.0e6);
        control.update(&mut camera);
        assert!((camera.position().magnitude() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn panning_moves_target_and_camera_together() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), undamped());
        control.pan(&camera, 50.0, 0.0);
        control.update(&mut camera);

        let target = control.target();
        assert!(target.x < 0.0);
        assert!(target.y.abs() < 1e-5);
        assert!((*camera.position() - target - vec3(0.0, 0.0, 10.0)).magnitude() < 1e-3);
    }

    #[test]
    fn idle_update_leaves_the_camera_alone() {
        let mut camera = camera();
        let mut control = OrbitControl::new(Vec3::zero(), OrbitConfig::default());
        assert!(!control.update(&mut camera));
        assert_eq!(*camera.position(), vec3(0.0, 0.0, 10.0));
    }
}
