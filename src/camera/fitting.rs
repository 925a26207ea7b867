//! Framing operations that move the camera to fit a set of points.

use glam::{Mat4, Vec2, Vec3};

use crate::animation::Step;
use crate::camera::Camera;
use crate::picking::frustum_planes;

/// View-space bounding rectangle of `points`.
fn projected_bounds(view: &Mat4, points: &[Vec3]) -> (Vec2, Vec2) {
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);

    for point in points {
        let projected = view.transform_vector3(*point);
        min = min.min(Vec2::new(projected.x, projected.y));
        max = max.max(Vec2::new(projected.x, projected.y));
    }

    (min, max)
}

/// Widen `height` to honor `aspect` when the rectangle is wider than the
/// viewport.
fn clamped_height(width: f32, height: f32, aspect: f32) -> f32 {
    if width > height * aspect {
        width / aspect
    } else {
        height
    }
}

/// Height of the view-space rectangle spanned by `points` around the
/// projected `center`: the larger center-to-edge distance per axis,
/// doubled, then aspect-clamped.
fn centered_height(
    view: &Mat4,
    aspect: f32,
    center: Vec3,
    points: &[Vec3],
) -> f32 {
    let (min, max) = projected_bounds(view, points);
    let view_center = view.transform_vector3(center);

    let width = (max.x - view_center.x)
        .abs()
        .max((view_center.x - min.x).abs())
        * 2.0;
    let height = (max.y - view_center.y)
        .abs()
        .max((view_center.y - min.y).abs())
        * 2.0;

    clamped_height(width, height, aspect)
}

/// Raw height of the view-space bounding rectangle of `points`,
/// aspect-clamped.
fn fitted_height(view: &Mat4, aspect: f32, points: &[Vec3]) -> f32 {
    let (min, max) = projected_bounds(view, points);
    clamped_height(max.x - min.x, max.y - min.y, aspect)
}

/// Slide `position` along the viewing direction until every point sits
/// inside the side planes of the frustum, with the tightest plane
/// touching its nearest point.
fn fit_to_frustum(
    position: Vec3,
    view: Mat4,
    projection: Mat4,
    points: &[Vec3],
) -> Vec3 {
    if points.is_empty() {
        return position;
    }

    let planes = frustum_planes(projection * view);
    let front = Vec3::new(view.x_axis.z, view.y_axis.z, view.z_axis.z);

    let mut smallest = f32::MAX;

    for plane in &planes[..4] {
        for point in points {
            let distance = (plane.normal.dot(position)
                - plane.normal.dot(*point))
                / plane.normal.dot(front);

            smallest = smallest.min(distance);
        }
    }

    position - front * smallest
}

impl Camera {
    /// Reposition the camera so all of `points` fill the viewport, then
    /// retarget it at `center`.
    ///
    /// Orthographic cameras are placed on the current viewing axis at a
    /// distance derived from the projected bounds around `center` (the
    /// larger center-to-edge distance per axis, doubled); perspective
    /// cameras dolly until the frustum side planes touch the points. Does
    /// nothing when `points` is empty.
    pub fn zoom_extents(
        &mut self,
        aspect: f32,
        center: Vec3,
        points: &[Vec3],
        step: Step,
        add_key: bool,
    ) {
        if points.is_empty() {
            return;
        }

        if self.is_ortho() {
            let height =
                centered_height(&self.world_view(), aspect, center, points);
            let distance = height / self.fov.to_radians();

            let front = (self.target_position - self.position).normalize();
            self.position = center - front * distance;
        } else {
            let projection = Mat4::perspective_rh(
                self.fov.to_radians(),
                aspect,
                self.z_near,
                self.z_far,
            );
            self.position = fit_to_frustum(
                self.position + center - self.target_position,
                self.world_view(),
                projection,
                points,
            );
        }

        self.target_position = center;

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);

        self.update_position(step);
    }

    /// Move the camera to the prospective `position`/`target` pose and fit
    /// the two world-space `corners` of a dragged rectangle into view.
    pub fn zoom_region(
        &mut self,
        aspect: f32,
        position: Vec3,
        target: Vec3,
        corners: &[Vec3; 2],
        step: Step,
        add_key: bool,
    ) {
        if self.is_ortho() {
            let height = fitted_height(&self.world_view(), aspect, corners);
            let distance = height / self.fov.to_radians();

            let front = (self.target_position - self.position).normalize();
            self.position = target - front * distance;
        } else {
            let view = Mat4::look_at_rh(position, target, self.up_vector);
            let projection = Mat4::perspective_rh(
                self.fov.to_radians(),
                aspect,
                self.z_near,
                self.z_far,
            );
            self.position = fit_to_frustum(position, view, projection, corners);
        }

        self.target_position = target;

        self.commit_position(step, add_key);
        self.commit_target(step, add_key);

        self.update_position(step);
    }
}
