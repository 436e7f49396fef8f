use crate::movement::MoveIntent;
use arena_common::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera setup surface of the rendering collaborator.
pub trait CameraRig {
    fn set_position(&mut self, position: Vec3);

    fn set_target(&mut self, target: Vec3);

    /// Turn gravity on with the given acceleration.
    fn enable_gravity(&mut self, gravity: Vec3);

    /// Collision ellipsoid radii around the camera position.
    fn set_collision_ellipsoid(&mut self, radii: Vec3);
}

/// Receives movement intents every frame and mouse deltas while locked.
pub trait MovementIntegrator {
    fn integrate(&mut self, intent: MoveIntent, dt: f32);

    fn look(&mut self, dx: f32, dy: f32);
}

/// Initial camera placement and physics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: Vec3,
    pub target: Vec3,
    pub gravity: Vec3,
    pub ellipsoid: Vec3,
    /// Walk speed in units per second.
    pub speed: f32,
    /// Radians per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, -20.0),
            target: Vec3::ZERO,
            gravity: Vec3::new(0.0, -0.75, 0.0),
            ellipsoid: Vec3::new(1.0, 1.5, 1.0),
            speed: 10.0,
            sensitivity: 0.003,
        }
    }
}

impl CameraConfig {
    /// Push position, target, gravity and ellipsoid to `rig`, in that order.
    pub fn apply<R: CameraRig + ?Sized>(&self, rig: &mut R) {
        rig.set_position(self.position);
        rig.set_target(self.target);
        rig.enable_gravity(self.gravity);
        rig.set_collision_ellipsoid(self.ellipsoid);
    }
}

const PITCH_LIMIT_DEG: f32 = 89.0;

/// First-person walking camera.
///
/// Keys move it on the ground plane; gravity pulls it down until the bottom
/// of its ellipsoid rests on the ground (y = 0) or on top of a collider.
/// Collision treats the ellipsoid as its bounding box and resolves each axis
/// separately, so the camera slides along walls instead of sticking.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub max_fall_speed: f32,
    gravity: Vec3,
    gravity_enabled: bool,
    ellipsoid: Vec3,
    velocity: Vec3,
    grounded: bool,
    colliders: Vec<Aabb>,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 90.0_f32.to_radians(),
            pitch: 0.0,
            speed: 10.0,
            sensitivity: 0.003,
            max_fall_speed: 50.0,
            gravity: Vec3::ZERO,
            gravity_enabled: false,
            ellipsoid: Vec3::new(1.0, 1.5, 1.0),
            velocity: Vec3::ZERO,
            grounded: false,
            colliders: Vec::new(),
        }
    }
}

impl FirstPersonCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut cam = Self {
            speed: config.speed,
            sensitivity: config.sensitivity,
            ..Self::default()
        };
        config.apply(&mut cam);
        cam
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Forward projected onto the ground plane.
    pub fn planar_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    pub fn right(&self) -> Vec3 {
        self.planar_forward().cross(Vec3::Y)
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-PITCH_LIMIT_DEG.to_radians(), PITCH_LIMIT_DEG.to_radians());
    }

    /// Replace the boxes the camera collides with.
    pub fn set_colliders(&mut self, colliders: impl IntoIterator<Item = Aabb>) {
        self.colliders = colliders.into_iter().collect();
        tracing::debug!(colliders = self.colliders.len(), "camera colliders set");
    }

    pub fn colliders(&self) -> &[Aabb] {
        &self.colliders
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn gravity(&self) -> Option<Vec3> {
        self.gravity_enabled.then_some(self.gravity)
    }

    pub fn ellipsoid(&self) -> Vec3 {
        self.ellipsoid
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn body_at(&self, position: Vec3) -> Aabb {
        Aabb {
            min: position - self.ellipsoid,
            max: position + self.ellipsoid,
        }
    }

    fn blocked_at(&self, position: Vec3) -> bool {
        let body = self.body_at(position);
        self.colliders.iter().any(|c| c.intersects(&body))
    }

    /// Move along a horizontal axis unless that would put the body inside a
    /// collider. A body that already overlaps one (spawned inside a building)
    /// moves freely until it is clear.
    fn step_horizontal(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        let next = self.position + delta;
        if !self.blocked_at(next) || self.blocked_at(self.position) {
            self.position = next;
        }
    }

    fn step_vertical(&mut self, dy: f32) {
        self.grounded = false;
        let mut next = self.position + Vec3::Y * dy;

        if dy < 0.0 {
            let body = self.body_at(next);
            let landing = self
                .colliders
                .iter()
                .filter(|c| c.intersects(&body))
                .map(|c| c.max.y)
                .fold(f32::NEG_INFINITY, f32::max);
            if landing.is_finite() {
                next.y = next.y.max(landing + self.ellipsoid.y);
                self.grounded = true;
            }
        } else if dy > 0.0 && self.blocked_at(next) {
            next.y = self.position.y;
            self.velocity.y = 0.0;
        }

        let floor = self.ellipsoid.y;
        if next.y <= floor {
            next.y = floor;
            self.grounded = true;
        }
        if self.grounded {
            self.velocity.y = 0.0;
        }
        self.position.y = next.y;
    }
}

impl CameraRig for FirstPersonCamera {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
    }

    fn set_target(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON {
            return;
        }
        let dir = dir.normalize();
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir
            .y
            .asin()
            .clamp(-PITCH_LIMIT_DEG.to_radians(), PITCH_LIMIT_DEG.to_radians());
    }

    fn enable_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
        self.gravity_enabled = true;
    }

    fn set_collision_ellipsoid(&mut self, radii: Vec3) {
        self.ellipsoid = radii.abs();
    }
}

impl MovementIntegrator for FirstPersonCamera {
    fn integrate(&mut self, intent: MoveIntent, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let walk = (self.planar_forward() * intent.forward + self.right() * intent.strafe)
            .normalize_or_zero()
            * self.speed
            * dt;

        if self.gravity_enabled {
            self.velocity += self.gravity * dt;
            self.velocity.y = self.velocity.y.max(-self.max_fall_speed);
        }
        let drift = self.velocity * dt;

        self.step_horizontal(Vec3::X * (walk.x + drift.x));
        self.step_horizontal(Vec3::Z * (walk.z + drift.z));
        if self.gravity_enabled {
            self.step_vertical(drift.y);
        }
    }

    fn look(&mut self, dx: f32, dy: f32) {
        self.rotate(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_common::Extents;

    #[derive(Default)]
    struct RigLog {
        calls: Vec<&'static str>,
        gravity: Option<Vec3>,
        ellipsoid: Option<Vec3>,
    }

    impl CameraRig for RigLog {
        fn set_position(&mut self, _: Vec3) {
            self.calls.push("position");
        }

        fn set_target(&mut self, _: Vec3) {
            self.calls.push("target");
        }

        fn enable_gravity(&mut self, gravity: Vec3) {
            self.calls.push("gravity");
            self.gravity = Some(gravity);
        }

        fn set_collision_ellipsoid(&mut self, radii: Vec3) {
            self.calls.push("ellipsoid");
            self.ellipsoid = Some(radii);
        }
    }

    fn flat_camera() -> FirstPersonCamera {
        let mut cam = FirstPersonCamera::default();
        cam.set_position(Vec3::new(0.0, 1.5, 0.0));
        cam
    }

    #[test]
    fn apply_configures_the_rig() {
        let mut rig = RigLog::default();
        CameraConfig::default().apply(&mut rig);
        assert_eq!(rig.calls, ["position", "target", "gravity", "ellipsoid"]);
        assert_eq!(rig.gravity, Some(Vec3::new(0.0, -0.75, 0.0)));
        assert_eq!(rig.ellipsoid, Some(Vec3::new(1.0, 1.5, 1.0)));
    }

    #[test]
    fn default_setup_looks_at_origin() {
        let cam = FirstPersonCamera::from_config(&CameraConfig::default());
        let to_origin = (Vec3::ZERO - cam.position).normalize();
        assert!(cam.forward().dot(to_origin) > 0.999);
    }

    #[test]
    fn forward_key_moves_along_view() {
        let mut cam = flat_camera();
        cam.integrate(
            MoveIntent {
                forward: 1.0,
                strafe: 0.0,
            },
            0.5,
        );
        // Default yaw faces +Z.
        assert!((cam.position.z - 5.0).abs() < 1e-4);
        assert!(cam.position.x.abs() < 1e-4);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let mut cam = flat_camera();
        cam.integrate(
            MoveIntent {
                forward: 1.0,
                strafe: 1.0,
            },
            1.0,
        );
        let moved = Vec3::new(cam.position.x, 0.0, cam.position.z).length();
        assert!((moved - cam.speed).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FirstPersonCamera::default();
        cam.rotate(0.0, -100_000.0);
        assert!(cam.pitch <= 89.0_f32.to_radians());
        cam.rotate(0.0, 100_000.0);
        assert!(cam.pitch >= -89.0_f32.to_radians());
    }

    #[test]
    fn gravity_settles_on_the_ground() {
        let mut cam = FirstPersonCamera::from_config(&CameraConfig::default());
        for _ in 0..600 {
            cam.integrate(MoveIntent::default(), 1.0 / 60.0);
        }
        assert!(cam.is_grounded());
        assert!((cam.position.y - 1.5).abs() < 1e-4);
        assert_eq!(cam.velocity().y, 0.0);
    }

    #[test]
    fn no_gravity_means_no_fall() {
        let mut cam = FirstPersonCamera::default();
        cam.set_position(Vec3::new(0.0, 10.0, 0.0));
        cam.integrate(MoveIntent::default(), 1.0);
        assert_eq!(cam.position.y, 10.0);
    }

    #[test]
    fn walls_stop_motion_on_that_axis_only() {
        let mut cam = flat_camera();
        cam.set_colliders([Aabb::from_center(
            Vec3::new(0.0, 5.0, 3.0),
            Extents::new(20.0, 10.0, 1.0),
        )]);
        // Face +Z and walk diagonally into the wall.
        cam.integrate(
            MoveIntent {
                forward: 1.0,
                strafe: 1.0,
            },
            0.5,
        );
        assert_eq!(cam.position.z, 0.0);
        assert!(cam.position.x.abs() > 1.0);
    }

    #[test]
    fn lands_on_top_of_a_building() {
        let mut cam = FirstPersonCamera::default();
        cam.enable_gravity(Vec3::new(0.0, -9.8, 0.0));
        cam.set_colliders([Aabb::from_center(
            Vec3::new(0.0, 2.0, 0.0),
            Extents::new(4.0, 4.0, 4.0),
        )]);
        cam.set_position(Vec3::new(0.0, 8.0, 0.0));
        for _ in 0..300 {
            cam.integrate(MoveIntent::default(), 1.0 / 60.0);
        }
        assert!(cam.is_grounded());
        assert!((cam.position.y - 5.5).abs() < 1e-3);
    }

    #[test]
    fn zero_dt_is_ignored() {
        let mut cam = flat_camera();
        cam.enable_gravity(Vec3::new(0.0, -1.0, 0.0));
        let before = cam.position;
        cam.integrate(
            MoveIntent {
                forward: 1.0,
                strafe: 0.0,
            },
            0.0,
        );
        assert_eq!(cam.position, before);
    }

    #[test]
    fn config_reads_partial_yaml() {
        let config: CameraConfig = serde_yaml::from_str("speed: 4.0\n").unwrap();
        assert_eq!(config.speed, 4.0);
        assert_eq!(config.position, Vec3::new(0.0, 3.0, -20.0));
    }
}
