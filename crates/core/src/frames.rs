//! Frame addressing for extracted video frames.
//!
//! Frame images are stored in a two-level directory fan-out so no single
//! directory holds more than 100 files:
//!
//! ```text
//! {base}/{frame / 10000}/{frame / 100}/{frame}.jpg
//! ```
//!
//! The layout is an on-disk contract shared with the extraction and image
//! serving tools, so the output must stay byte-for-byte stable.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Frames sharing one leaf directory.
pub const FRAMES_PER_LEAF: u64 = 100;

/// Frames sharing one top-level directory (100 leaf directories).
pub const FRAMES_PER_TOP: u64 = 10_000;

/// File extension of extracted frames.
pub const FRAME_EXTENSION: &str = "jpg";

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Return the `(top, leaf)` directory numbers holding `frame`.
pub fn frame_dirs(frame: u64) -> (u64, u64) {
    (frame / FRAMES_PER_TOP, frame / FRAMES_PER_LEAF)
}

/// Build the relative storage path of a frame, optionally rooted at `base`.
///
/// `base` is prepended verbatim followed by a single `/`.
pub fn frame_path(frame: u64, base: Option<&str>) -> String {
    let (top, leaf) = frame_dirs(frame);
    let path = format!("{top}/{leaf}/{frame}.{FRAME_EXTENSION}");
    match base {
        Some(base) => format!("{base}/{path}"),
        None => path,
    }
}

/// Convert a stored (signed) frame number into a frame index.
pub fn frame_index(frame: i64) -> Result<u64, CoreError> {
    u64::try_from(frame)
        .map_err(|_| CoreError::Validation(format!("frame must be >= 0, got {frame}")))
}

/// Resolve the path of `frame` for a video with `total_frames` frames.
///
/// Frames past the end of the video are rejected rather than addressed.
pub fn video_frame_path(
    frame: i64,
    total_frames: i32,
    base: Option<&str>,
) -> Result<String, CoreError> {
    let index = frame_index(frame)?;
    if frame >= i64::from(total_frames) {
        return Err(CoreError::Validation(format!(
            "frame {frame} is outside the video (total frames: {total_frames})"
        )));
    }
    Ok(frame_path(index, base))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
