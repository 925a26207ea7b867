//! Geometric picking and culling primitives.
//!
//! Camera sections are hit-tested as small axis-aligned cube glyphs in
//! view-local frames. This module provides the shared pieces: frustum
//! plane extraction, segment/box intersection, and box/volume overlap.

use glam::{Mat4, Vec3, Vec4};

use crate::camera::CameraSection;

/// Half edge length of the cube glyphs drawn for camera sections.
pub const GLYPH_HALF_EDGE: f32 = 7.5;

/// View-space distance from the eye to the up-vector glyph.
pub const UP_GLYPH_OFFSET: f32 = 25.0;

/// A plane in 3D space, represented as (normal.x, normal.y, normal.z,
/// distance) where the plane equation is: ax + by + cz + d = 0
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed distance from origin (`n · p + d = 0`).
    pub distance: f32,
}

impl Plane {
    /// Create a plane from coefficients and normalize it.
    #[must_use]
    pub fn from_coefficients(a: f32, b: f32, c: f32, d: f32) -> Self {
        let len = (a * a + b * b + c * c).sqrt();
        if len > 0.0 {
            Self {
                normal: Vec3::new(a / len, b / len, c / len),
                distance: d / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from point to plane (positive = in front, negative =
    /// behind).
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Extract frustum planes from a view-projection matrix using the
/// Gribb/Hartmann method.
///
/// Planes point inward (positive half-space is inside the frustum) and are
/// ordered left, right, bottom, top, near, far.
#[must_use]
pub fn frustum_planes(vp: Mat4) -> [Plane; 6] {
    // Get matrix rows (glam stores column-major, so we transpose
    // conceptually)
    let row0 = Vec4::new(vp.x_axis.x, vp.y_axis.x, vp.z_axis.x, vp.w_axis.x);
    let row1 = Vec4::new(vp.x_axis.y, vp.y_axis.y, vp.z_axis.y, vp.w_axis.y);
    let row2 = Vec4::new(vp.x_axis.z, vp.y_axis.z, vp.z_axis.z, vp.w_axis.z);
    let row3 = Vec4::new(vp.x_axis.w, vp.y_axis.w, vp.z_axis.w, vp.w_axis.w);

    // For right-handed projections with [0,1] depth range the near plane
    // is just row2
    let left = row3 + row0;
    let right = row3 - row0;
    let bottom = row3 + row1;
    let top = row3 - row1;
    let near = row2;
    let far = row3 - row2;

    [left, right, bottom, top, near, far]
        .map(|row| Plane::from_coefficients(row.x, row.y, row.z, row.w))
}

/// Distance from `start` to the point where the segment `start..end`
/// enters the box `min..max`, or `None` when the segment misses it.
///
/// A segment starting inside the box reports a distance of zero.
#[must_use]
pub fn segment_box_distance(
    min: Vec3,
    max: Vec3,
    start: Vec3,
    end: Vec3,
) -> Option<f32> {
    let direction = end - start;

    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for (d, s, slab_min, slab_max) in [
        (direction.x, start.x, min.x, max.x),
        (direction.y, start.y, min.y, max.y),
        (direction.z, start.z, min.z, max.z),
    ] {
        if d.abs() < f32::EPSILON {
            // Parallel to this slab; reject unless already between the
            // faces.
            if s < slab_min || s > slab_max {
                return None;
            }
        } else {
            let mut t1 = (slab_min - s) / d;
            let mut t2 = (slab_max - s) / d;

            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_min = t_min.max(t1);
            t_max = t_max.min(t2);

            if t_min > t_max {
                return None;
            }
        }
    }

    Some(t_min * direction.length())
}

/// Whether the box `min..max` overlaps the volume bounded by `planes`
/// (inward-facing normals).
///
/// Conservative: a box with all corners behind a single plane is rejected;
/// anything else is reported as intersecting.
#[must_use]
pub fn box_intersects_volume(
    min: Vec3,
    max: Vec3,
    planes: &[Plane; 6],
) -> bool {
    let corners = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ];

    for plane in planes {
        if corners
            .iter()
            .all(|&corner| plane.distance_to_point(corner) < 0.0)
        {
            return false;
        }
    }

    true
}

/// Accumulator for picking along a world-space segment, carried across
/// every object tested so only the nearest hit survives.
#[derive(Debug, Clone)]
pub struct RayTest {
    /// Segment start (typically the unprojected near-plane point).
    pub start: Vec3,
    /// Segment end (typically the unprojected far-plane point).
    pub end: Vec3,
    /// Distance from `start` to the nearest hit found so far.
    pub distance: f32,
    /// Camera section of the nearest hit found so far.
    pub section: Option<CameraSection>,
}

impl RayTest {
    /// Start a test over the segment from `start` to `end` with no hit
    /// recorded yet.
    #[must_use]
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            distance: f32::MAX,
            section: None,
        }
    }
}
