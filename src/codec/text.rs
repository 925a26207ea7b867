//! Line-oriented text codec for the current camera save format.
//!
//! A camera is one block of token lines terminated by a `NAME` line. The
//! reader walks the stream token by token, skipping tokens it does not
//! know, until `NAME` ends the record; a stream that runs out first is an
//! incomplete record. When `LATITUDE` and `LONGITUDE` were both seen the
//! camera is finalized through spherical placement instead of the raw
//! pose tokens.

use std::io::{BufRead, Write};

use glam::Vec3;

use crate::animation::KeyframeTrack;
use crate::camera::{Camera, Convention, ViewAngles};
use crate::codec::CodecError;
use crate::defaults::SceneContext;

/// Latitude used when a spherical block leaves it unspecified.
const DEFAULT_LATITUDE: f32 = 23.0;

/// Longitude used when a spherical block leaves it unspecified.
const DEFAULT_LONGITUDE: f32 = 45.0;

/// Distance used when a spherical block leaves it unspecified.
const DEFAULT_DISTANCE: f32 = 1.0;

/// Swap a document-axis (Y-up) vector into the native Z-up frame.
fn document_to_native(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Swap a native Z-up vector into the document (Y-up) frame.
fn native_to_document(v: Vec3) -> Vec3 {
    Vec3::new(v.x, -v.z, v.y)
}

/// Write one camera block.
///
/// The lens line comes first, then one line per pose attribute: a plain
/// token with a single vector when the track holds one key, or one `*_KEY`
/// line per key when it holds several. Plain vectors of a camera authored
/// under the extended convention are converted to document axes; key
/// vectors never are. The final line carries the state flags and the
/// terminal `NAME`.
pub fn write_camera(
    camera: &Camera,
    writer: &mut impl Write,
) -> Result<(), CodecError> {
    writeln!(
        writer,
        "FOV {} ZNEAR {} ZFAR {}",
        camera.fov, camera.z_near, camera.z_far
    )?;

    let convention = camera.convention();
    write_track(writer, "POSITION", camera.position_keys(), convention)?;
    write_track(writer, "TARGET_POSITION", camera.target_keys(), convention)?;
    write_track(writer, "UP_VECTOR", camera.up_keys(), convention)?;

    if camera.is_hidden() {
        write!(writer, "HIDDEN ")?;
    }
    if camera.is_ortho() {
        write!(writer, "ORTHOGRAPHIC ")?;
    }
    writeln!(writer, "NAME {}", camera.name())?;

    Ok(())
}

fn write_track(
    writer: &mut impl Write,
    token: &str,
    track: &KeyframeTrack<Vec3>,
    convention: Convention,
) -> Result<(), CodecError> {
    if track.keys().len() > 1 {
        for key in track.keys() {
            let v = key.value;
            writeln!(
                writer,
                "{token}_KEY {} {} {} {}",
                key.step, v.x, v.y, v.z
            )?;
        }
    } else {
        let v = match convention {
            Convention::Extended => native_to_document(track.keys()[0].value),
            Convention::Legacy => track.keys()[0].value,
        };
        writeln!(writer, "{token} {} {} {}", v.x, v.y, v.z)?;
    }

    Ok(())
}

/// Read one camera block into `camera`.
///
/// Unknown tokens are skipped; a stream that ends before the terminal
/// `NAME` line is an incomplete record and fails. On success the camera is
/// settled at step 1.
pub fn read_camera(
    camera: &mut Camera,
    reader: &mut impl BufRead,
    scene: &SceneContext,
) -> Result<(), CodecError> {
    let mut latitude = None;
    let mut longitude = None;
    let mut distance = None;
    let mut target_seen = false;

    for line in reader.lines() {
        let line = line?;
        let mut rest = line.as_str();

        while let Some(token) = next_token(&mut rest) {
            match token {
                "HIDDEN" => camera.set_hidden(true),
                "ORTHOGRAPHIC" => camera.set_ortho(true),
                "FOV" => {
                    if let Some(v) = next_f32(&mut rest) {
                        camera.fov = v;
                    }
                }
                "ZNEAR" => {
                    if let Some(v) = next_f32(&mut rest) {
                        camera.z_near = v;
                    }
                }
                "ZFAR" => {
                    if let Some(v) = next_f32(&mut rest) {
                        camera.z_far = v;
                    }
                }
                "LATITUDE" => {
                    latitude =
                        Some(next_f32(&mut rest).unwrap_or(DEFAULT_LATITUDE));
                }
                "LONGITUDE" => {
                    longitude =
                        Some(next_f32(&mut rest).unwrap_or(DEFAULT_LONGITUDE));
                }
                "DISTANCE" => {
                    distance =
                        Some(next_f32(&mut rest).unwrap_or(DEFAULT_DISTANCE));
                }
                "POSITION" => {
                    if let Some(v) = load_plain(&mut rest, camera.convention())
                    {
                        camera.position = v;
                        camera.position_keys_mut().change_key(v, 1, true);
                    }
                }
                "TARGET_POSITION" => {
                    if let Some(v) = load_plain(&mut rest, camera.convention())
                    {
                        camera.target_position = v;
                        camera.target_keys_mut().change_key(v, 1, true);
                        target_seen = true;
                    }
                }
                "UP_VECTOR" => {
                    if let Some(v) = load_plain(&mut rest, camera.convention())
                    {
                        camera.up_vector = v;
                        camera.up_keys_mut().change_key(v, 1, true);
                    }
                }
                "POSITION_KEY" => {
                    load_key(&mut rest, camera.position_keys_mut());
                }
                "TARGET_POSITION_KEY" => {
                    load_key(&mut rest, camera.target_keys_mut());
                }
                "UP_VECTOR_KEY" => {
                    load_key(&mut rest, camera.up_keys_mut());
                }
                "NAME" => {
                    camera.set_name(rest.trim().to_owned());
                    finalize(
                        camera,
                        Angles {
                            latitude,
                            longitude,
                            distance,
                        },
                        target_seen,
                        scene,
                    );
                    return Ok(());
                }
                unknown => {
                    log::debug!("skipping unknown camera token {unknown:?}");
                }
            }
        }
    }

    Err(CodecError::IncompleteRecord)
}

/// Spherical tokens seen so far, each `Some` once its token was parsed.
struct Angles {
    latitude: Option<f32>,
    longitude: Option<f32>,
    distance: Option<f32>,
}

fn finalize(
    camera: &mut Camera,
    angles: Angles,
    target_seen: bool,
    scene: &SceneContext,
) {
    let (Some(latitude), Some(longitude)) = (angles.latitude, angles.longitude)
    else {
        camera.update_position(1);
        return;
    };

    let target = if target_seen {
        camera.target_position
    } else {
        Vec3::ZERO
    };

    camera.set_angles(
        ViewAngles {
            latitude,
            longitude,
            distance: angles.distance.unwrap_or(DEFAULT_DISTANCE),
        },
        target,
        scene,
        1,
        false,
    );
}

fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }

    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let (token, tail) = trimmed.split_at(end);
    *rest = tail;
    Some(token)
}

fn next_f32(rest: &mut &str) -> Option<f32> {
    next_token(rest)?.parse().ok()
}

fn next_vec3(rest: &mut &str) -> Option<Vec3> {
    let x = next_f32(rest)?;
    let y = next_f32(rest)?;
    let z = next_f32(rest)?;
    Some(Vec3::new(x, y, z))
}

fn load_plain(rest: &mut &str, convention: Convention) -> Option<Vec3> {
    let v = next_vec3(rest)?;
    Some(match convention {
        Convention::Extended => document_to_native(v),
        Convention::Legacy => v,
    })
}

fn load_key(rest: &mut &str, track: &mut KeyframeTrack<Vec3>) {
    let Some(step) = next_token(rest).and_then(|token| token.parse().ok())
    else {
        return;
    };
    if let Some(v) = next_vec3(rest) {
        track.change_key(v, step, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::CameraDefaults;

    fn near(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn vec_near(a: Vec3, b: Vec3, eps: f32) -> bool {
        near(a.x, b.x, eps) && near(a.y, b.y, eps) && near(a.z, b.z, eps)
    }

    fn legacy_camera(defaults: &CameraDefaults) -> Camera {
        Camera::new(false, Convention::Legacy, defaults)
    }

    fn save(camera: &Camera) -> String {
        let mut buffer = Vec::new();
        write_camera(camera, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn load(camera: &mut Camera, text: &str) -> Result<(), CodecError> {
        read_camera(camera, &mut text.as_bytes(), &SceneContext::default())
    }

    #[test]
    fn round_trip_preserves_pose_and_lens() {
        let defaults = CameraDefaults::default();
        let mut source = legacy_camera(&defaults);
        source.look_at(
            Vec3::new(0.0, -150.0, 80.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::Z,
        );
        source.fov = 42.0;
        source.z_near = 5.0;
        source.z_far = 12_000.0;
        source.set_ortho(true);
        source.set_hidden(true);
        source.set_name("Overview".into());

        let mut loaded = legacy_camera(&defaults);
        load(&mut loaded, &save(&source)).unwrap();

        assert_eq!(loaded.name(), "Overview");
        assert!(loaded.is_ortho());
        assert!(loaded.is_hidden());
        assert!(near(loaded.fov, 42.0, 1e-4));
        assert!(near(loaded.z_near, 5.0, 1e-4));
        assert!(near(loaded.z_far, 12_000.0, 1e-3));
        assert!(vec_near(loaded.position, source.position, 1e-3));
        assert!(vec_near(loaded.target_position, source.target_position, 1e-3));
        assert!(vec_near(loaded.up_vector, source.up_vector, 1e-3));
    }

    #[test]
    fn extended_convention_swaps_plain_vectors() {
        let defaults = CameraDefaults::default();
        let mut source = Camera::new(false, Convention::Extended, &defaults);
        source.look_at(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::ZERO,
            Vec3::Z,
        );
        source.set_name("Swapped".into());

        let text = save(&source);
        assert!(text.contains("POSITION 1 -3 2\n"));

        // The swap is its own inverse through a load into the same
        // convention.
        let mut loaded = Camera::new(false, Convention::Extended, &defaults);
        load(&mut loaded, &text).unwrap();
        assert!(vec_near(loaded.position, source.position, 1e-4));
    }

    #[test]
    fn multi_key_tracks_write_key_lines_unconverted() {
        let defaults = CameraDefaults::default();
        let mut source = Camera::new(false, Convention::Extended, &defaults);
        source.pan(Vec3::ZERO, 1, true);
        source.pan(Vec3::new(0.0, 0.0, 40.0), 8, true);
        source.set_name("Tracked".into());

        let text = save(&source);
        assert!(text.contains("POSITION_KEY 1 "));
        assert!(text.contains("POSITION_KEY 8 "));
        assert!(!text.contains("\nPOSITION "));

        let mut loaded = Camera::new(false, Convention::Extended, &defaults);
        load(&mut loaded, &text).unwrap();

        assert_eq!(loaded.position_keys().keys().len(), 2);
        assert!(vec_near(
            loaded.position_keys().sample(8),
            source.position_keys().sample(8),
            1e-3
        ));
    }

    #[test]
    fn unknown_tokens_are_skipped() {
        let defaults = CameraDefaults::default();
        let mut camera = legacy_camera(&defaults);

        let text = "FOV 50 SPARKLE 1 2 3\nPOSITION 0 -90 0\nNAME Tolerant\n";
        load(&mut camera, text).unwrap();

        assert_eq!(camera.name(), "Tolerant");
        assert!(near(camera.fov, 50.0, 1e-4));
        assert!(vec_near(camera.position, Vec3::new(0.0, -90.0, 0.0), 1e-4));
    }

    #[test]
    fn missing_name_is_incomplete() {
        let defaults = CameraDefaults::default();
        let mut camera = legacy_camera(&defaults);

        let result = load(&mut camera, "FOV 50\nPOSITION 0 -90 0\n");
        assert!(matches!(result, Err(CodecError::IncompleteRecord)));
    }

    #[test]
    fn name_runs_to_end_of_line() {
        let defaults = CameraDefaults::default();
        let mut camera = legacy_camera(&defaults);

        load(&mut camera, "NAME Second Floor View \n").unwrap();
        assert_eq!(camera.name(), "Second Floor View");
    }

    #[test]
    fn spherical_block_finalizes_through_set_angles() {
        let defaults = CameraDefaults::default();
        let scene = SceneContext::default();
        let mut camera = legacy_camera(&defaults);

        let text = "LATITUDE 30 LONGITUDE 45 DISTANCE 1250\nNAME Globe\n";
        read_camera(&mut camera, &mut text.as_bytes(), &scene).unwrap();

        let angles = camera.angles(&scene);
        assert!(near(angles.latitude, 30.0, 0.01));
        assert!(near(angles.longitude, 45.0, 0.01));
        assert!(near(angles.distance, 1250.0, 0.1));
    }

    #[test]
    fn partial_spherical_block_uses_defaults() {
        let defaults = CameraDefaults::default();
        let scene = SceneContext::default();
        let mut camera = legacy_camera(&defaults);

        let text = "LATITUDE 10 LONGITUDE -60\nNAME Partial\n";
        read_camera(&mut camera, &mut text.as_bytes(), &scene).unwrap();

        let angles = camera.angles(&scene);
        assert!(near(angles.latitude, 10.0, 0.01));
        assert!(near(angles.longitude, -60.0, 0.01));
        assert!(near(angles.distance, DEFAULT_DISTANCE, 1e-3));
    }

    #[test]
    fn spherical_block_aims_at_parsed_target() {
        let defaults = CameraDefaults::default();
        let scene = SceneContext::default();
        let mut camera = legacy_camera(&defaults);

        let text = "LATITUDE 30 LONGITUDE 45 DISTANCE 1250\n\
                    TARGET_POSITION 100 0 0\nNAME Aimed\n";
        read_camera(&mut camera, &mut text.as_bytes(), &scene).unwrap();

        assert!(vec_near(
            camera.target_position,
            Vec3::new(100.0, 0.0, 0.0),
            1e-3
        ));
        let front = (camera.position - camera.target_position).normalize();
        assert!(near(camera.up_vector.dot(front), 0.0, 1e-4));
    }

    #[test]
    fn loaded_camera_is_settled() {
        let defaults = CameraDefaults::default();
        let mut camera = legacy_camera(&defaults);

        load(&mut camera, "POSITION 0 -100 0\nNAME Settled\n").unwrap();

        let eye = camera.world_view().transform_point3(camera.position);
        assert!(vec_near(eye, Vec3::ZERO, 1e-3));
    }
}
