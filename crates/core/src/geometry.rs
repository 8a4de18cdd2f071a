//! Annotation geometry: per-frame bounding boxes and the paths built from them.
//!
//! Boxes are opaque geometric records. No tracking or interpolation happens
//! here; the rules below only keep stored annotations well-formed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;
use crate::video::FrameRange;

/// One bounding box of a tracked object on a single frame.
///
/// Edges are inclusive pixel coordinates: `xtl`/`ytl` is the top-left corner,
/// `xbr`/`ybr` the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub frame: i32,
    pub xtl: i32,
    pub ytl: i32,
    pub xbr: i32,
    pub ybr: i32,
    #[serde(default)]
    pub occluded: bool,
    /// The object has left the visible frame (the track continues past it).
    #[serde(default)]
    pub outside: bool,
}

impl BoundingBox {
    /// Check frame sign and edge ordering.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.frame < 0 {
            return Err(CoreError::Validation(format!(
                "box frame must be >= 0, got {}",
                self.frame
            )));
        }
        if self.xtl > self.xbr || self.ytl > self.ybr {
            return Err(CoreError::Validation(format!(
                "box edges on frame {} are inverted: ({}, {}) -> ({}, {})",
                self.frame, self.xtl, self.ytl, self.xbr, self.ybr
            )));
        }
        Ok(())
    }
}

/// Normalize and validate the boxes of one path.
///
/// Boxes are sorted by frame. Each frame may appear once and must fall inside
/// the job's segment.
pub fn prepare_path_boxes(
    mut boxes: Vec<BoundingBox>,
    segment: FrameRange,
) -> Result<Vec<BoundingBox>, CoreError> {
    if boxes.is_empty() {
        return Err(CoreError::Validation("a path needs at least one box".to_string()));
    }

    boxes.sort_by_key(|b| b.frame);

    for pair in boxes.windows(2) {
        if pair[0].frame == pair[1].frame {
            return Err(CoreError::Validation(format!(
                "duplicate box for frame {}",
                pair[0].frame
            )));
        }
    }

    for b in &boxes {
        b.validate()?;
        if !segment.contains(b.frame) {
            return Err(CoreError::Validation(format!(
                "box frame {} is outside segment [{}, {})",
                b.frame, segment.start, segment.stop
            )));
        }
    }

    Ok(boxes)
}

/// Whether `label_id` is one of the labels declared on the video.
pub fn validate_path_label(label_id: DbId, video_labels: &[DbId]) -> Result<(), CoreError> {
    if video_labels.contains(&label_id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "label {label_id} is not declared for this video"
        )))
    }
}
