//! Annotation path and box models.
//!
//! A path is one tracked object within a job, tagged with a label, and owns
//! one box per annotated frame.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::geometry::BoundingBox;
use vatic_core::types::{DbId, Timestamp};

/// A row from the `paths` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObjectPath {
    pub id: DbId,
    pub job_id: DbId,
    pub label_id: DbId,
    pub created_at: Timestamp,
}

/// A row from the `boxes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PathBox {
    pub id: DbId,
    pub path_id: DbId,
    pub frame: i32,
    pub xtl: i32,
    pub ytl: i32,
    pub xbr: i32,
    pub ybr: i32,
    pub occluded: bool,
    pub outside: bool,
}

/// DTO for writing a path with its boxes.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePath {
    pub label_id: DbId,
    pub boxes: Vec<BoundingBox>,
}

/// A path together with its boxes ordered by frame.
#[derive(Debug, Clone, Serialize)]
pub struct PathWithBoxes {
    #[serde(flatten)]
    pub path: ObjectPath,
    pub boxes: Vec<PathBox>,
}
