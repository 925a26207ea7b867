//! Interactive camera manipulation: pan, zoom, orbit, roll, recenter.
//!
//! Every operation mutates the pose directly, commits the touched
//! attributes into their keyframe tracks, and settles through
//! [`Camera::update_position`].

use glam::{Mat3, Mat4, Vec3};

use crate::animation::Step;
use crate::camera::{Camera, CameraSection};
use crate::defaults::CameraDefaults;

impl Camera {
    /// Translate position and target equally by `delta`.
    pub fn pan(&mut self, delta: Vec3, step: Step, add_key: bool) {
        self.position += delta;
        self.target_position += delta;

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);

        self.update_position(step);
    }

    /// Move along the viewing direction by `amount` scaled through the
    /// configured distance factor. Perspective cameras dolly the whole rig
    /// (target included); orthographic cameras move the eye only.
    pub fn zoom(
        &mut self,
        amount: f32,
        defaults: &CameraDefaults,
        step: Step,
        add_key: bool,
    ) {
        let front = (self.position - self.target_position).normalize()
            * defaults.distance_scale()
            * amount;

        if self.is_ortho() {
            // Don't zoom in past the ortho focal plane.
            let crossed = (self.position + front - self.target_position)
                .dot(self.position - self.target_position)
                <= 0.0;
            if amount > 0.0 && crossed {
                return;
            }

            self.position += front;
        } else {
            self.position += front;
            self.target_position += front;
        }

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);

        self.update_position(step);
    }

    /// Translate position and target by a view-space `delta`, mapped
    /// through the inverse view rotation and scaled by five.
    pub fn move_relative(&mut self, delta: Vec3, step: Step, add_key: bool) {
        let relative =
            self.world_view().transpose().transform_vector3(delta) * 5.0;

        self.position += relative;
        self.target_position += relative;

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);

        self.update_position(step);
    }

    /// Rotate position and target about `center` by `dx` (yaw) and `dy`
    /// (pitch) radians, carrying the up vector along.
    ///
    /// The pitch axis comes from the horizontal projection of the viewing
    /// direction, so orbiting keeps the horizon level; when the camera
    /// looks straight up or down the up vector's horizontal projection is
    /// used instead.
    pub fn orbit(
        &mut self,
        dx: f32,
        dy: f32,
        center: Vec3,
        step: Step,
        add_key: bool,
    ) {
        let front = self.position - self.target_position;

        let mut yaw = Vec3::new(front.x, front.y, 0.0)
            .try_normalize()
            .or_else(|| {
                Vec3::new(self.up_vector.x, self.up_vector.y, 0.0)
                    .try_normalize()
            })
            .unwrap_or(Vec3::X);

        if self.up_vector.z < 0.0 {
            yaw.x = -yaw.x;
            yaw.y = -yaw.y;
        }

        let yaw_frame = Mat3::from_cols(
            Vec3::new(yaw.x, yaw.y, 0.0),
            Vec3::new(-yaw.y, yaw.x, 0.0),
            Vec3::Z,
        );
        let transform = Mat3::from_rotation_z(-dx)
            * yaw_frame
            * Mat3::from_rotation_y(dy)
            * yaw_frame.transpose();

        self.position = transform * (self.position - center) + center;
        self.target_position =
            transform * (self.target_position - center) + center;
        self.up_vector = transform * self.up_vector;

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);
        self.commit_up(step, add_key);

        self.update_position(step);
    }

    /// Rotate the up vector around the viewing direction by `angle`
    /// radians.
    pub fn roll(&mut self, angle: f32, step: Step, add_key: bool) {
        let axis = (self.position - self.target_position).normalize();
        self.up_vector = Mat3::from_axis_angle(axis, angle) * self.up_vector;

        self.commit_up(step, add_key);

        self.update_position(step);
    }

    /// Retarget the camera at `new_center`, keeping the eye fixed and
    /// preserving the current on-screen roll.
    pub fn center_on(&mut self, new_center: Vec3, step: Step, add_key: bool) {
        let inverse = self.world_view().inverse();
        let direction = -inverse.z_axis.truncate();

        let roll = if direction.z.abs() < 0.9999 {
            inverse.x_axis.z.atan2(inverse.y_axis.z)
        } else {
            inverse.x_axis.y.atan2(inverse.y_axis.y)
        };

        self.target_position = new_center;

        let front = (self.position - self.target_position).normalize();
        let side = if front.dot(Vec3::Z).abs() > 0.99 {
            Vec3::NEG_X
        } else {
            front.cross(Vec3::Z)
        };
        let up = side.cross(front).normalize();

        self.up_vector = Mat3::from_axis_angle(front, roll) * up;

        self.commit_target(step, add_key);
        self.commit_up(step, add_key);

        self.update_position(step);
    }

    /// Translate the selected sections by `delta`.
    ///
    /// Target and up-vector moves are mutually exclusive in one call
    /// (target wins); moving the up vector renormalizes it. The up vector
    /// is re-orthonormalized inline and the view matrix rebuilt without
    /// resampling the tracks.
    pub fn move_selected(&mut self, delta: Vec3, step: Step, add_key: bool) {
        if self.is_section_selected(CameraSection::Position) {
            self.position += delta;
            self.commit_position(step, add_key);
        }

        if self.is_section_selected(CameraSection::Target) {
            self.target_position += delta;
            self.commit_target(step, add_key);
        } else if self.is_section_selected(CameraSection::UpVector) {
            self.up_vector = (self.up_vector + delta).normalize();
            self.commit_up(step, add_key);
        }

        let front = self.target_position - self.position;
        let mut side = front.cross(self.up_vector);
        if side.length_squared() < f32::EPSILON {
            side = Vec3::X;
        }
        self.up_vector = side.cross(front).normalize();

        self.world_view =
            Mat4::look_at_rh(self.position, self.target_position, self.up_vector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Convention;

    fn near(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn vec_near(a: Vec3, b: Vec3, eps: f32) -> bool {
        near(a.x, b.x, eps) && near(a.y, b.y, eps) && near(a.z, b.z, eps)
    }

    fn side_camera(defaults: &CameraDefaults) -> Camera {
        Camera::from_look_at(Vec3::new(0.0, -100.0, 0.0), Vec3::ZERO, defaults)
    }

    fn up_dot_front(camera: &Camera) -> f32 {
        let front =
            (camera.position - camera.target_position).normalize();
        camera.up_vector.dot(front)
    }

    #[test]
    fn pan_translates_rig() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.pan(Vec3::new(10.0, 5.0, -2.0), 1, false);

        assert!(vec_near(camera.position, Vec3::new(10.0, -95.0, -2.0), 1e-4));
        assert!(vec_near(
            camera.target_position,
            Vec3::new(10.0, 5.0, -2.0),
            1e-4
        ));
        assert!(near(up_dot_front(&camera), 0.0, 1e-4));
    }

    #[test]
    fn zoom_perspective_dollies_rig() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.zoom(1.0, &defaults, 1, false);

        // distance_scale is -8, front is -Y: the rig moves +Y as a unit.
        assert!(vec_near(camera.position, Vec3::new(0.0, -92.0, 0.0), 1e-4));
        assert!(vec_near(
            camera.target_position,
            Vec3::new(0.0, 8.0, 0.0),
            1e-4
        ));
        let span = camera.position - camera.target_position;
        assert!(near(span.length(), 100.0, 1e-3));
    }

    #[test]
    fn zoom_ortho_moves_eye_only() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        camera.set_ortho(true);

        camera.zoom(1.0, &defaults, 1, false);

        assert!(vec_near(camera.position, Vec3::new(0.0, -92.0, 0.0), 1e-4));
        assert!(vec_near(camera.target_position, Vec3::ZERO, 1e-4));
    }

    #[test]
    fn zoom_ortho_refuses_to_cross_focal_plane() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        camera.set_ortho(true);

        // 20 * 8 = 160 units of travel would jump past the target.
        camera.zoom(20.0, &defaults, 1, false);
        assert!(vec_near(camera.position, Vec3::new(0.0, -100.0, 0.0), 1e-4));

        // Zooming out from the same spot is always allowed.
        camera.zoom(-1.0, &defaults, 1, false);
        assert!(vec_near(camera.position, Vec3::new(0.0, -108.0, 0.0), 1e-4));
    }

    #[test]
    fn move_relative_maps_view_axes() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        // View-space +Z points from the target back toward the eye.
        camera.move_relative(Vec3::new(0.0, 0.0, 1.0), 1, false);

        assert!(vec_near(camera.position, Vec3::new(0.0, -105.0, 0.0), 1e-4));
        assert!(vec_near(
            camera.target_position,
            Vec3::new(0.0, -5.0, 0.0),
            1e-4
        ));
    }

    #[test]
    fn orbit_zero_is_identity() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        let position = camera.position;
        let up = camera.up_vector;

        camera.orbit(0.0, 0.0, Vec3::ZERO, 1, false);

        assert!(vec_near(camera.position, position, 1e-4));
        assert!(vec_near(camera.target_position, Vec3::ZERO, 1e-4));
        assert!(vec_near(camera.up_vector, up, 1e-4));
    }

    #[test]
    fn orbit_yaw_rotates_about_center() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.orbit(
            std::f32::consts::FRAC_PI_2,
            0.0,
            Vec3::ZERO,
            1,
            false,
        );

        assert!(vec_near(camera.position, Vec3::new(-100.0, 0.0, 0.0), 1e-3));
        assert!(vec_near(camera.target_position, Vec3::ZERO, 1e-4));
        assert!(vec_near(camera.up_vector, Vec3::Z, 1e-4));
        assert!(near(camera.position.length(), 100.0, 1e-3));
    }

    #[test]
    fn orbit_pitch_keeps_distance() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.orbit(
            0.0,
            std::f32::consts::FRAC_PI_4,
            Vec3::ZERO,
            1,
            false,
        );

        let expected = 100.0 / std::f32::consts::SQRT_2;
        assert!(vec_near(
            camera.position,
            Vec3::new(0.0, -expected, -expected),
            1e-2
        ));
        assert!(near(camera.position.length(), 100.0, 1e-3));
        assert!(near(up_dot_front(&camera), 0.0, 1e-4));
    }

    #[test]
    fn roll_spins_up_vector_in_place() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.roll(std::f32::consts::FRAC_PI_2, 1, false);

        assert!(vec_near(camera.up_vector, Vec3::new(-1.0, 0.0, 0.0), 1e-4));
        assert!(vec_near(camera.position, Vec3::new(0.0, -100.0, 0.0), 1e-4));
        assert!(vec_near(camera.target_position, Vec3::ZERO, 1e-4));
    }

    #[test]
    fn center_on_retargets_without_moving_eye() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.center_on(Vec3::new(50.0, 0.0, 0.0), 1, false);

        assert!(vec_near(camera.position, Vec3::new(0.0, -100.0, 0.0), 1e-4));
        assert!(vec_near(
            camera.target_position,
            Vec3::new(50.0, 0.0, 0.0),
            1e-4
        ));
        assert!(near(up_dot_front(&camera), 0.0, 1e-4));
    }

    #[test]
    fn center_on_preserves_roll() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.roll(0.5, 1, false);
        let rolled = camera.up_vector;

        camera.center_on(Vec3::ZERO, 1, false);

        assert!(vec_near(camera.up_vector, rolled, 1e-3));
    }

    #[test]
    fn move_selected_translates_position_section() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        camera.set_section_selected(CameraSection::Position, true);

        camera.move_selected(Vec3::new(0.0, 0.0, 10.0), 1, false);

        assert!(vec_near(camera.position, Vec3::new(0.0, -100.0, 10.0), 1e-4));
        assert!(vec_near(camera.target_position, Vec3::ZERO, 1e-4));
        assert!(near(up_dot_front(&camera), 0.0, 1e-4));
    }

    #[test]
    fn move_selected_target_wins_over_up() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        camera.set_section_selected(CameraSection::Target, true);
        camera.set_section_selected(CameraSection::UpVector, true);
        let up = camera.up_vector;

        camera.move_selected(Vec3::new(20.0, 0.0, 0.0), 1, false);

        assert!(vec_near(
            camera.target_position,
            Vec3::new(20.0, 0.0, 0.0),
            1e-4
        ));
        // The up section did not take the raw delta; only the inline
        // re-orthonormalization adjusted it.
        assert!(near(camera.up_vector.dot(up), 1.0, 1e-2));
    }

    #[test]
    fn move_selected_up_section_renormalizes() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);
        camera.set_section_selected(CameraSection::UpVector, true);

        camera.move_selected(Vec3::new(0.4, 0.0, 0.0), 1, false);

        assert!(near(camera.up_vector.length(), 1.0, 1e-5));
        assert!(near(up_dot_front(&camera), 0.0, 1e-4));
        assert!(camera.up_vector.x > 0.3);
    }

    #[test]
    fn simple_camera_never_grows_tracks() {
        let defaults = CameraDefaults::default();
        let mut camera = Camera::new(true, Convention::Extended, &defaults);

        camera.pan(Vec3::X, 7, true);
        camera.zoom(1.0, &defaults, 7, true);
        camera.orbit(0.2, 0.1, Vec3::ZERO, 7, true);
        camera.roll(0.3, 7, true);
        camera.center_on(Vec3::Y, 7, true);

        assert_eq!(camera.position_keys().keys().len(), 1);
        assert_eq!(camera.target_keys().keys().len(), 1);
        assert_eq!(camera.up_keys().keys().len(), 1);
    }

    #[test]
    fn animated_camera_records_keys() {
        let defaults = CameraDefaults::default();
        let mut camera = side_camera(&defaults);

        camera.pan(Vec3::X, 5, true);

        assert_eq!(camera.position_keys().keys().len(), 2);
        assert_eq!(camera.position_keys().keys()[1].step, 5);
    }
}
