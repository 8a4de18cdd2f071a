//! Segment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::types::{DbId, Timestamp};
use vatic_core::video::FrameRange;

/// A row from the `segments` table. Covers frames `[start_frame, stop_frame)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Segment {
    pub id: DbId,
    pub video_id: DbId,
    pub start_frame: i32,
    pub stop_frame: i32,
    pub created_at: Timestamp,
}

impl Segment {
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: self.start_frame,
            stop: self.stop_frame,
        }
    }
}

/// DTO for creating a new segment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSegment {
    /// Overridden by the URL path in the API.
    #[serde(default)]
    pub video_id: DbId,
    pub start_frame: i32,
    pub stop_frame: i32,
}
