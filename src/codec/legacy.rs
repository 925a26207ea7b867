//! Version-dispatched reader for legacy binary camera records.
//!
//! A record starts with a single version byte (1 through 7); everything
//! after it is version-gated. Which fields exist in which version is kept
//! as data: each version maps to a list of [`DecodeStep`]s, and every step
//! either populates the current camera representation or is an explicit
//! discard of a field the current representation no longer carries. All
//! multi-byte fields are little-endian.

use std::io::Read;

use glam::Vec3;

use crate::animation::Step;
use crate::camera::{Camera, Convention};
use crate::codec::CodecError;
use crate::defaults::CameraDefaults;

/// Newest binary record version this reader accepts.
pub const NEWEST_VERSION: u8 = 7;

/// One field group of a legacy record.
#[derive(Debug, Clone, Copy)]
enum DecodeStep {
    /// Marker byte that must equal 1 (versions 6-7).
    Marker,
    /// Two discarded bulk animation-track blocks: a 32-bit count, then per
    /// entry a 16-bit time, four floats, and a type tag (versions 6-7).
    DiscardQuadKeyBlocks,
    /// Fixed 80-byte name buffer (version 4).
    NameFixed,
    /// Length-prefixed name; a length byte of 0xFF is corrupt data (all
    /// versions except 4).
    NamePrefixed,
    /// Position, target, and up as double-precision vectors (versions <3).
    Pose,
    /// Per-step pose table, loaded as keyframes (version 3).
    PoseTable,
    /// Discarded double-precision lens parameters (versions <4).
    DiscardLensDoubles,
    /// Two discarded legacy float keyframe blocks: a signed 32-bit count,
    /// then per entry a 16-bit time, three floats, and a type tag
    /// (versions 4-5).
    DiscardTripleKeyBlocks,
    /// Single-precision fov, zFar, zNear (versions 4-7).
    Lens,
    /// Discarded 32-bit lens trailer (version 4).
    DiscardInt,
    /// Discarded byte-pair lens trailer (versions 5-7).
    DiscardBytePair,
    /// Discarded visibility flag and user integer (versions 2-3).
    DiscardVisibility,
}

/// Field layout of each record version. Versions below 1 never shipped but
/// decode like version 1, matching the original reader's fallthrough.
fn layout(version: u8) -> &'static [DecodeStep] {
    match version {
        2 => &[
            DecodeStep::NamePrefixed,
            DecodeStep::Pose,
            DecodeStep::DiscardLensDoubles,
            DecodeStep::DiscardVisibility,
        ],
        3 => &[
            DecodeStep::NamePrefixed,
            DecodeStep::PoseTable,
            DecodeStep::DiscardLensDoubles,
            DecodeStep::DiscardVisibility,
        ],
        4 => &[
            DecodeStep::NameFixed,
            DecodeStep::DiscardTripleKeyBlocks,
            DecodeStep::Lens,
            DecodeStep::DiscardInt,
        ],
        5 => &[
            DecodeStep::NamePrefixed,
            DecodeStep::DiscardTripleKeyBlocks,
            DecodeStep::Lens,
            DecodeStep::DiscardBytePair,
        ],
        6 | 7 => &[
            DecodeStep::Marker,
            DecodeStep::DiscardQuadKeyBlocks,
            DecodeStep::NamePrefixed,
            DecodeStep::Lens,
            DecodeStep::DiscardBytePair,
        ],
        _ => &[
            DecodeStep::NamePrefixed,
            DecodeStep::Pose,
            DecodeStep::DiscardLensDoubles,
        ],
    }
}

/// Read one legacy binary camera record.
///
/// Produces an animated camera under the legacy axis convention. Fields
/// the record version stores but the current representation has no home
/// for are read and dropped; any structural failure is fatal for the
/// containing load.
pub fn load_camera(
    reader: &mut impl Read,
    defaults: &CameraDefaults,
) -> Result<Camera, CodecError> {
    let version = read_u8(reader)?;

    if version > NEWEST_VERSION {
        log::warn!("rejecting camera record version {version}");
        return Err(CodecError::UnsupportedVersion(version));
    }

    let mut camera = Camera::new(false, Convention::Legacy, defaults);

    for step in layout(version) {
        apply(*step, reader, &mut camera)?;
    }

    camera.update_position(1);
    Ok(camera)
}

fn apply(
    step: DecodeStep,
    reader: &mut impl Read,
    camera: &mut Camera,
) -> Result<(), CodecError> {
    match step {
        DecodeStep::Marker => {
            let marker = read_u8(reader)?;
            if marker != 1 {
                return Err(CodecError::BadMarker(marker));
            }
        }
        DecodeStep::DiscardQuadKeyBlocks => {
            for _ in 0..2 {
                let count = read_u32(reader)?;
                for _ in 0..count {
                    // time, four params, type tag
                    let mut entry = [0_u8; 19];
                    reader.read_exact(&mut entry)?;
                }
            }
        }
        DecodeStep::NameFixed => {
            let mut buffer = [0_u8; 80];
            reader.read_exact(&mut buffer)?;
            camera.set_name(name_from_bytes(&buffer));
        }
        DecodeStep::NamePrefixed => {
            let length = read_u8(reader)?;
            if length == 0xFF {
                return Err(CodecError::CorruptName);
            }
            let mut buffer = vec![0_u8; usize::from(length)];
            reader.read_exact(&mut buffer)?;
            camera.set_name(name_from_bytes(&buffer));
        }
        DecodeStep::Pose => {
            let position = read_dvec3(reader)?;
            let target = read_dvec3(reader)?;
            let up = read_dvec3(reader)?;

            camera.position = position;
            camera.target_position = target;
            camera.up_vector = up;

            camera.position_keys_mut().change_key(position, 1, false);
            camera.target_keys_mut().change_key(target, 1, false);
            camera.up_keys_mut().change_key(up, 1, false);
        }
        DecodeStep::PoseTable => {
            let count = read_u8(reader)?;
            for _ in 0..count {
                let eye = read_dvec3(reader)?;
                let target = read_dvec3(reader)?;
                let up = read_dvec3(reader)?;
                let step = Step::from(read_u8(reader)?);
                let _snapshot = read_i32(reader)?;
                let _user = read_i32(reader)?;

                camera.position_keys_mut().change_key(eye, step, true);
                camera.target_keys_mut().change_key(target, step, true);
                camera.up_keys_mut().change_key(up, step, true);
            }
        }
        DecodeStep::DiscardLensDoubles => {
            for _ in 0..3 {
                let _ = read_f64(reader)?;
            }
        }
        DecodeStep::DiscardTripleKeyBlocks => {
            for _ in 0..2 {
                let count = read_i32(reader)?;
                for _ in 0..count.max(0) {
                    // time, three params, type tag
                    let mut entry = [0_u8; 15];
                    reader.read_exact(&mut entry)?;
                }
            }
        }
        DecodeStep::Lens => {
            camera.fov = read_f32(reader)?;
            camera.z_far = read_f32(reader)?;
            camera.z_near = read_f32(reader)?;
        }
        DecodeStep::DiscardInt => {
            let _ = read_i32(reader)?;
        }
        DecodeStep::DiscardBytePair => {
            let mut pair = [0_u8; 2];
            reader.read_exact(&mut pair)?;
        }
        DecodeStep::DiscardVisibility => {
            let _show = read_u32(reader)?;
            let _user = read_i32(reader)?;
        }
    }

    Ok(())
}

fn name_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim().to_owned()
}

fn read_u8(reader: &mut impl Read) -> Result<u8, CodecError> {
    let mut buffer = [0_u8; 1];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

fn read_u32(reader: &mut impl Read) -> Result<u32, CodecError> {
    let mut buffer = [0_u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

fn read_i32(reader: &mut impl Read) -> Result<i32, CodecError> {
    let mut buffer = [0_u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(i32::from_le_bytes(buffer))
}

fn read_f32(reader: &mut impl Read) -> Result<f32, CodecError> {
    let mut buffer = [0_u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(f32::from_le_bytes(buffer))
}

fn read_f64(reader: &mut impl Read) -> Result<f64, CodecError> {
    let mut buffer = [0_u8; 8];
    reader.read_exact(&mut buffer)?;
    Ok(f64::from_le_bytes(buffer))
}

fn read_dvec3(reader: &mut impl Read) -> Result<Vec3, CodecError> {
    let x = read_f64(reader)? as f32;
    let y = read_f64(reader)? as f32;
    let z = read_f64(reader)? as f32;
    Ok(Vec3::new(x, y, z))
}
