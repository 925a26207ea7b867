// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Camera and viewpoint core for a 3D scene editor.
//!
//! Vantage owns everything about an editor camera except drawing it: pose
//! (position/target/up plus the cached view matrix), per-attribute keyframe
//! animation over discrete steps, interactive manipulation (pan, orbit,
//! zoom, roll, recenter), spherical and preset placement, extents fitting
//! under both projections, glyph hit-testing, and the save-format codecs
//! (the current text format and seven generations of legacy binary).
//!
//! # Key entry points
//!
//! - [`camera::Camera`] - the camera entity and all of its operations
//! - [`animation::KeyframeTrack`] - step-indexed keyframe storage
//! - [`defaults::CameraDefaults`] - injected construction/zoom defaults
//! - [`codec`] - text and legacy binary serialization
//!
//! # Architecture
//!
//! Every mutation funnels through [`camera::Camera::update_position`]: the
//! operation edits position/target/up (and the keyframe tracks when the
//! camera is animated), then `update_position` re-orthonormalizes the up
//! vector and rebuilds the view matrix. Consumers only ever read settled
//! state. Nothing here touches a window, a GPU, or global configuration;
//! defaults and scene unit conversions are passed in explicitly.

pub mod animation;
pub mod camera;
pub mod codec;
pub mod defaults;
pub mod error;
pub mod picking;
