//! Preset viewpoints and spherical (latitude/longitude/distance) placement.

use glam::{Mat3, Vec3};

use crate::animation::Step;
use crate::camera::Camera;
use crate::defaults::{CameraDefaults, SceneContext};

/// A named standard viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewpoint {
    /// Looking along +Y from in front of the scene.
    Front,
    /// Looking along -Y from behind the scene.
    Back,
    /// Looking straight down.
    Top,
    /// Looking straight up.
    Bottom,
    /// Looking along -X from the left side.
    Left,
    /// Looking along +X from the right side.
    Right,
    /// Three-quarter overview.
    Home,
}

impl Viewpoint {
    /// Look up a viewpoint by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "front" => Some(Self::Front),
            "back" => Some(Self::Back),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "home" => Some(Self::Home),
            _ => None,
        }
    }

    /// The viewpoint's name as accepted by [`Self::from_name`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Home => "home",
        }
    }

    /// Eye position of the viewpoint, with the axis-aligned presets placed
    /// `default_position` units from the origin.
    #[must_use]
    pub fn position(self, default_position: f32) -> Vec3 {
        match self {
            Self::Front => Vec3::new(0.0, -default_position, 0.0),
            Self::Back => Vec3::new(0.0, default_position, 0.0),
            Self::Top => Vec3::new(0.0, 0.0, default_position),
            Self::Bottom => Vec3::new(0.0, 0.0, -default_position),
            Self::Left => Vec3::new(default_position, 0.0, 0.0),
            Self::Right => Vec3::new(-default_position, 0.0, 0.0),
            Self::Home => Vec3::new(375.0, -375.0, 187.5),
        }
    }

    /// Up vector paired with the viewpoint.
    #[must_use]
    pub fn up(self) -> Vec3 {
        match self {
            Self::Top => Vec3::new(0.0, 1.0, 0.0),
            Self::Bottom => Vec3::new(0.0, -1.0, 0.0),
            Self::Home => Vec3::new(0.2357, -0.2357, 0.942_81),
            _ => Vec3::Z,
        }
    }
}

/// Spherical camera placement: latitude and longitude in degrees plus a
/// distance in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngles {
    /// Elevation above the horizon in degrees.
    pub latitude: f32,
    /// Rotation around world-up in degrees, zero at the front viewpoint.
    pub longitude: f32,
    /// Distance from the origin in document units.
    pub distance: f32,
}

impl Camera {
    /// Snap the camera to a preset viewpoint, targeting the origin.
    pub fn set_viewpoint(
        &mut self,
        viewpoint: Viewpoint,
        defaults: &CameraDefaults,
    ) {
        self.position = viewpoint.position(defaults.default_position);
        self.target_position = Vec3::ZERO;
        self.up_vector = viewpoint.up();

        self.commit_position(1, false);
        self.commit_target(1, false);
        self.commit_up(1, false);

        self.update_position(1);
    }

    /// Place the eye at `position` looking at the origin, deriving the up
    /// vector from world-up.
    pub fn look_from(&mut self, position: Vec3) {
        self.position = position;
        self.target_position = Vec3::ZERO;

        let front = position.normalize();
        let side = if front.dot(Vec3::Z).abs() > 0.99 {
            Vec3::NEG_X
        } else {
            front.cross(Vec3::Z)
        };
        self.up_vector = side.cross(front).normalize();

        self.commit_position(1, false);
        self.commit_target(1, false);
        self.commit_up(1, false);

        self.update_position(1);
    }

    /// Place the eye and target explicitly, orthonormalizing `up` against
    /// the viewing direction.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.position = position;
        self.target_position = target;

        let direction = target - position;
        let side = direction.cross(up);
        self.up_vector = side.cross(direction).normalize();

        self.commit_position(1, false);
        self.commit_target(1, false);
        self.commit_up(1, false);

        self.update_position(1);
    }

    /// Place the camera on a sphere around the origin from latitude,
    /// longitude, and a document-unit distance, then aim it at `target`.
    ///
    /// The distance converts to internal units through `scene`. When the
    /// target is away from the origin the up vector is re-derived from the
    /// new viewing direction.
    pub fn set_angles(
        &mut self,
        angles: ViewAngles,
        target: Vec3,
        scene: &SceneContext,
        step: Step,
        add_key: bool,
    ) {
        self.position = Vec3::new(0.0, -1.0, 0.0);
        self.target_position = Vec3::ZERO;
        self.up_vector = Vec3::Z;

        let longitude = Mat3::from_rotation_z(angles.longitude.to_radians());
        self.position = longitude * self.position;

        let side = longitude * Vec3::NEG_X;
        let latitude =
            Mat3::from_axis_angle(side, angles.latitude.to_radians());

        let distance = scene.internal_distance(angles.distance);

        self.position = latitude * self.position * distance;
        self.up_vector = latitude * self.up_vector;

        if target != self.target_position {
            self.target_position = target;

            let direction = target - self.position;
            let side = direction.cross(self.up_vector);
            self.up_vector = side.cross(direction).normalize();
        }

        self.commit_position(1, add_key);
        self.commit_target(1, add_key);
        self.commit_up(1, add_key);

        self.update_position(step);
    }

    /// The camera's current spherical placement.
    ///
    /// Latitude comes from the angle between the viewing direction and
    /// world-up, longitude from the horizontal projection of the viewing
    /// direction measured against world north, and the distance is the
    /// document-unit conversion of the eye's distance from the origin.
    #[must_use]
    pub fn angles(&self, scene: &SceneContext) -> ViewAngles {
        let front = (self.position - self.target_position).normalize();

        let latitude =
            (-front).dot(Vec3::Z).clamp(-1.0, 1.0).acos().to_degrees() - 90.0;

        let horizontal = -Vec3::new(front.x, front.y, 0.0).normalize();
        let mut longitude =
            horizontal.dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees();

        if horizontal.dot(Vec3::X) > 0.0 {
            longitude = -longitude;
        }

        ViewAngles {
            latitude,
            longitude,
            distance: scene.external_distance(self.position.length()),
        }
    }
}
