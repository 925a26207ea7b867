//! Camera entity for 3D scene editing.
//!
//! A [`Camera`] owns its pose (position, target, up vector, cached view
//! matrix), lens parameters, per-attribute keyframe tracks, and per-section
//! selection state. Every mutation settles through
//! [`Camera::update_position`], which resamples the tracks when the camera
//! is animated, re-orthonormalizes the up vector, and rebuilds the view
//! matrix.

mod fitting;
mod interact;
mod spherical;

use glam::{Mat4, Vec3};

use crate::animation::{KeyframeTrack, Step};
use crate::defaults::CameraDefaults;
use crate::picking::{
    box_intersects_volume, segment_box_distance, Plane, RayTest,
    GLYPH_HALF_EDGE, UP_GLYPH_OFFSET,
};

pub use spherical::{ViewAngles, Viewpoint};

/// Front and world-up are treated as parallel past this dot-product limit.
const PARALLEL_LIMIT: f32 = 0.9999;

/// One movable section of a camera: the eye, the look-at target, or the
/// up-vector handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSection {
    /// The eye position.
    Position,
    /// The look-at target position.
    Target,
    /// The up-vector handle.
    UpVector,
}

/// A set of [`CameraSection`] values, used for selection state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSet {
    position: bool,
    target: bool,
    up_vector: bool,
}

impl SectionSet {
    /// The set holding no sections.
    pub const EMPTY: Self = Self {
        position: false,
        target: false,
        up_vector: false,
    };

    /// The set holding every section.
    pub const ALL: Self = Self {
        position: true,
        target: true,
        up_vector: true,
    };

    /// Whether `section` is in the set.
    #[must_use]
    pub fn contains(self, section: CameraSection) -> bool {
        match section {
            CameraSection::Position => self.position,
            CameraSection::Target => self.target,
            CameraSection::UpVector => self.up_vector,
        }
    }

    /// Add `section` to the set.
    pub fn insert(&mut self, section: CameraSection) {
        match section {
            CameraSection::Position => self.position = true,
            CameraSection::Target => self.target = true,
            CameraSection::UpVector => self.up_vector = true,
        }
    }

    /// Remove `section` from the set.
    pub fn remove(&mut self, section: CameraSection) {
        match section {
            CameraSection::Position => self.position = false,
            CameraSection::Target => self.target = false,
            CameraSection::UpVector => self.up_vector = false,
        }
    }

    /// Whether the set holds no sections.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.position || self.target || self.up_vector)
    }
}

/// Axis convention a camera was authored under. Affects how plain pose
/// vectors are swapped between document axes and the native Z-up frame by
/// the text codec, nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Convention {
    /// Documents store pose vectors Y-up; they are swapped to the native
    /// Z-up frame on load and back on save.
    #[default]
    Extended,
    /// Documents already store pose vectors in the native Z-up frame.
    Legacy,
}

/// An editor camera: pose, lens, animation tracks, and selection state.
///
/// Pose and lens fields are public and may be read freely; mutate them
/// through the operations so the keyframe tracks and the cached view
/// matrix stay consistent.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Look-at target position.
    pub target_position: Vec3,
    /// Up direction, kept orthogonal to the viewing direction.
    pub up_vector: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clipping plane distance.
    pub z_near: f32,
    /// Far clipping plane distance.
    pub z_far: f32,

    name: String,
    world_view: Mat4,
    simple: bool,
    ortho: bool,
    hidden: bool,
    convention: Convention,
    selection: SectionSet,
    focus: Option<CameraSection>,
    position_keys: KeyframeTrack<Vec3>,
    target_keys: KeyframeTrack<Vec3>,
    up_keys: KeyframeTrack<Vec3>,
}

impl Camera {
    /// Create a camera at the default placement.
    ///
    /// A simple camera never animates: every subsequent operation collapses
    /// its tracks back to a single key. The mode is fixed for the lifetime
    /// of the camera.
    #[must_use]
    pub fn new(
        simple: bool,
        convention: Convention,
        defaults: &CameraDefaults,
    ) -> Self {
        let offset = defaults.eye_offset();
        let position = Vec3::new(offset, offset, 75.0);
        let up = Vec3::new(-0.2357, -0.2357, 0.942_81);

        let mut camera = Self {
            position,
            target_position: Vec3::ZERO,
            up_vector: up,
            fov: defaults.fov,
            z_near: defaults.z_near,
            z_far: defaults.z_far,
            name: String::new(),
            world_view: Mat4::IDENTITY,
            simple,
            ortho: false,
            hidden: false,
            convention,
            selection: SectionSet::EMPTY,
            focus: None,
            position_keys: KeyframeTrack::new(position),
            target_keys: KeyframeTrack::new(Vec3::ZERO),
            up_keys: KeyframeTrack::new(up),
        };

        camera.update_position(1);
        camera
    }

    /// Create an animated camera looking from `position` toward `target`,
    /// deriving the up vector from world-up.
    #[must_use]
    pub fn from_look_at(
        position: Vec3,
        target: Vec3,
        defaults: &CameraDefaults,
    ) -> Self {
        let front = (position - target).normalize();
        let side = if front.dot(Vec3::Z).abs() > PARALLEL_LIMIT {
            Vec3::X
        } else {
            front.cross(Vec3::Z)
        };
        let up = side.cross(front).normalize();

        let mut camera = Self {
            position,
            target_position: target,
            up_vector: up,
            fov: defaults.fov,
            z_near: defaults.z_near,
            z_far: defaults.z_far,
            name: String::new(),
            world_view: Mat4::IDENTITY,
            simple: false,
            ortho: false,
            hidden: false,
            convention: Convention::default(),
            selection: SectionSet::EMPTY,
            focus: None,
            position_keys: KeyframeTrack::new(position),
            target_keys: KeyframeTrack::new(target),
            up_keys: KeyframeTrack::new(up),
        };

        camera.update_position(1);
        camera
    }

    // -- Settling -----------------------------------------------------------

    /// Settle the camera at `step`.
    ///
    /// Animated cameras resample position, target, and up from their
    /// tracks. The up vector is then re-orthonormalized against the viewing
    /// direction and the view matrix is rebuilt. Every mutating operation
    /// ends here.
    pub fn update_position(&mut self, step: Step) {
        if !self.simple {
            self.position = self.position_keys.sample(step);
            self.target_position = self.target_keys.sample(step);
            self.up_vector = self.up_keys.sample(step);
        }

        let front = self.position - self.target_position;
        let mut side = front.cross(self.up_vector);
        // Degenerate when the up vector is parallel to the viewing
        // direction; substitute a fixed side axis.
        if side.length_squared() < f32::EPSILON {
            side = Vec3::X;
        }
        self.up_vector = side.cross(front).normalize();

        self.world_view =
            Mat4::look_at_rh(self.position, self.target_position, self.up_vector);
    }

    fn commit_position(&mut self, step: Step, add_key: bool) {
        let add_key = add_key && !self.simple;
        self.position_keys.change_key(self.position, step, add_key);
    }

    fn commit_target(&mut self, step: Step, add_key: bool) {
        let add_key = add_key && !self.simple;
        self.target_keys.change_key(self.target_position, step, add_key);
    }

    fn commit_up(&mut self, step: Step, add_key: bool) {
        let add_key = add_key && !self.simple;
        self.up_keys.change_key(self.up_vector, step, add_key);
    }

    // -- Identity and flags -------------------------------------------------

    /// The camera's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the camera.
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Keep the current name if it is non-empty and not used by any camera
    /// in `cameras`; otherwise assign `Camera N`, one past the highest
    /// numbered `Camera ` name already present.
    pub fn create_name(&mut self, cameras: &[Self]) {
        if !self.name.is_empty()
            && !cameras.iter().any(|camera| camera.name == self.name)
        {
            return;
        }

        let max_number = cameras
            .iter()
            .filter_map(|camera| camera.name.strip_prefix("Camera "))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        self.name = format!("Camera {}", max_number + 1);
    }

    /// Whether the camera is simple (animation disabled).
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Whether the camera projects orthographically.
    #[must_use]
    pub fn is_ortho(&self) -> bool {
        self.ortho
    }

    /// Switch between orthographic and perspective projection.
    pub fn set_ortho(&mut self, ortho: bool) {
        self.ortho = ortho;
    }

    /// Whether the camera is hidden in the editor.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hide or show the camera in the editor.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// The axis convention the camera was authored under.
    #[must_use]
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// The cached view matrix, consistent with the last
    /// [`update_position`](Self::update_position) call.
    #[must_use]
    pub fn world_view(&self) -> Mat4 {
        self.world_view
    }

    // -- Keyframe tracks ----------------------------------------------------

    /// The eye position track.
    #[must_use]
    pub fn position_keys(&self) -> &KeyframeTrack<Vec3> {
        &self.position_keys
    }

    /// The target position track.
    #[must_use]
    pub fn target_keys(&self) -> &KeyframeTrack<Vec3> {
        &self.target_keys
    }

    /// The up vector track.
    #[must_use]
    pub fn up_keys(&self) -> &KeyframeTrack<Vec3> {
        &self.up_keys
    }

    pub(crate) fn position_keys_mut(&mut self) -> &mut KeyframeTrack<Vec3> {
        &mut self.position_keys
    }

    pub(crate) fn target_keys_mut(&mut self) -> &mut KeyframeTrack<Vec3> {
        &mut self.target_keys
    }

    pub(crate) fn up_keys_mut(&mut self) -> &mut KeyframeTrack<Vec3> {
        &mut self.up_keys
    }

    /// Shift every key at or after `start` in all three tracks up by
    /// `count` steps.
    pub fn insert_time(&mut self, start: Step, count: Step) {
        self.position_keys.insert_time(start, count);
        self.target_keys.insert_time(start, count);
        self.up_keys.insert_time(start, count);
    }

    /// Delete keys inside the removed window and shift every later key in
    /// all three tracks down by `count` steps.
    pub fn remove_time(&mut self, start: Step, count: Step) {
        self.position_keys.remove_time(start, count);
        self.target_keys.remove_time(start, count);
        self.up_keys.remove_time(start, count);
    }

    /// Collapse all three tracks to a single key holding the camera's
    /// current pose.
    pub fn remove_keyframes(&mut self) {
        self.position_keys.reset(self.position);
        self.target_keys.reset(self.target_position);
        self.up_keys.reset(self.up_vector);
    }

    // -- Selection and focus ------------------------------------------------

    /// Whether any section is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Whether `section` is selected.
    #[must_use]
    pub fn is_section_selected(&self, section: CameraSection) -> bool {
        self.selection.contains(section)
    }

    /// Select or deselect the whole camera. Deselecting also drops focus.
    pub fn set_selected(&mut self, selected: bool) {
        if selected {
            self.selection = SectionSet::ALL;
        } else {
            self.selection = SectionSet::EMPTY;
            self.focus = None;
        }
    }

    /// Select or deselect one section. Deselecting a focused section also
    /// drops its focus.
    pub fn set_section_selected(
        &mut self,
        section: CameraSection,
        selected: bool,
    ) {
        if selected {
            self.selection.insert(section);
        } else {
            self.selection.remove(section);
            if self.focus == Some(section) {
                self.focus = None;
            }
        }
    }

    /// Whether any section is focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    /// Whether `section` is focused.
    #[must_use]
    pub fn is_section_focused(&self, section: CameraSection) -> bool {
        self.focus == Some(section)
    }

    /// Focus a section (which also selects it), or drop its focus and
    /// selection.
    pub fn set_focused(&mut self, section: CameraSection, focused: bool) {
        if focused {
            self.selection.insert(section);
            self.focus = Some(section);
        } else {
            self.selection.remove(section);
            if self.focus == Some(section) {
                self.focus = None;
            }
        }
    }

    /// The currently focused section, if any.
    #[must_use]
    pub fn focus_section(&self) -> Option<CameraSection> {
        self.focus
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> SectionSet {
        self.selection
    }

    /// World-space position of `section`'s glyph.
    #[must_use]
    pub fn section_position(&self, section: CameraSection) -> Vec3 {
        match section {
            CameraSection::Position => self.position,
            CameraSection::Target => self.target_position,
            CameraSection::UpVector => self.up_glyph_position(),
        }
    }

    fn up_glyph_position(&self) -> Vec3 {
        self.world_view
            .inverse()
            .transform_point3(Vec3::new(0.0, UP_GLYPH_OFFSET, 0.0))
    }

    // -- Copy helpers -------------------------------------------------------

    /// Copy lens parameters, pose, and view matrix from `other`.
    /// Orthographic mode is turned on if `other` uses it, never off.
    pub fn copy_position(&mut self, other: &Self) {
        self.fov = other.fov;
        self.z_near = other.z_near;
        self.z_far = other.z_far;

        self.world_view = other.world_view;
        self.position = other.position;
        self.target_position = other.target_position;
        self.up_vector = other.up_vector;

        if other.is_ortho() {
            self.set_ortho(true);
        }
    }

    /// Copy lens parameters from `other`. Orthographic mode is turned on
    /// if `other` uses it, never off.
    pub fn copy_settings(&mut self, other: &Self) {
        self.fov = other.fov;
        self.z_near = other.z_near;
        self.z_far = other.z_far;

        if other.is_ortho() {
            self.set_ortho(true);
        }
    }

    // -- Queries ------------------------------------------------------------

    /// Reciprocal of the camera's distance from the origin in
    /// camera-distance-factor units.
    #[must_use]
    pub fn scale(&self, defaults: &CameraDefaults) -> f32 {
        1.0 / (self.position.length() / defaults.camera_distance_factor())
    }

    /// Grow `min`/`max` to cover the camera's position and target.
    pub fn extend_bounding_box(&self, min: &mut Vec3, max: &mut Vec3) {
        for point in [self.position, self.target_position] {
            *min = min.min(point);
            *max = max.max(point);
        }
    }

    // -- Hit testing --------------------------------------------------------

    /// Intersect a world-space ray against the three camera glyphs,
    /// recording the nearest hit in `test`.
    pub fn ray_test(&self, test: &mut RayTest) {
        let min = Vec3::splat(-GLYPH_HALF_EDGE);
        let max = Vec3::splat(GLYPH_HALF_EDGE);

        for (section, frame) in self.glyph_frames() {
            let start = frame.transform_point3(test.start);
            let end = frame.transform_point3(test.end);

            if let Some(distance) = segment_box_distance(min, max, start, end)
            {
                if distance < test.distance {
                    test.distance = distance;
                    test.section = Some(section);
                }
            }
        }
    }

    /// Whether any camera glyph intersects the volume bounded by `planes`
    /// (inward-facing, in world space).
    #[must_use]
    pub fn box_test(&self, planes: &[Plane; 6]) -> bool {
        let min = Vec3::splat(-GLYPH_HALF_EDGE);
        let max = Vec3::splat(GLYPH_HALF_EDGE);

        for (_, frame) in self.glyph_frames() {
            let local = planes.map(|plane| {
                let normal = frame.transform_vector3(plane.normal);
                Plane {
                    normal,
                    distance: plane.distance
                        - frame.w_axis.truncate().dot(normal),
                }
            });

            if box_intersects_volume(min, max, &local) {
                return true;
            }
        }

        false
    }

    /// Local frame per glyph: the view matrix re-translated so the glyph
    /// sits at the local origin.
    fn glyph_frames(&self) -> [(CameraSection, Mat4); 3] {
        let mut target_frame = self.world_view;
        target_frame.w_axis = self
            .world_view
            .transform_vector3(-self.target_position)
            .extend(1.0);

        let mut up_frame = self.world_view;
        up_frame.w_axis = self
            .world_view
            .transform_vector3(-self.up_glyph_position())
            .extend(1.0);

        [
            (CameraSection::Position, self.world_view),
            (CameraSection::Target, target_frame),
            (CameraSection::UpVector, up_frame),
        ]
    }
}
