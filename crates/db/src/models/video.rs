//! Video entity model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::error::CoreError;
use vatic_core::frames;
use vatic_core::qc::VideoPairing;
use vatic_core::types::{DbId, Timestamp};
use vatic_core::video::{self, TrainingTarget};

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub slug: String,
    pub width: i32,
    pub height: i32,
    pub total_frames: i32,
    /// Root directory of the extracted frames.
    pub location: String,
    pub skip: i32,
    pub per_object_bonus: Decimal,
    pub completion_bonus: Decimal,
    pub train_with_id: Option<DbId>,
    pub is_for_training: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    pub fn pairing(&self) -> VideoPairing {
        VideoPairing {
            video_id: self.id,
            is_for_training: self.is_for_training,
            train_with: self.train_with_id,
        }
    }

    pub fn training_target(&self) -> TrainingTarget {
        TrainingTarget {
            id: self.id,
            is_for_training: self.is_for_training,
            train_with: self.train_with_id,
        }
    }

    /// Storage path of `frame` under this video's location.
    pub fn frame_path(&self, frame: i64) -> Result<String, CoreError> {
        frames::video_frame_path(frame, self.total_frames, Some(&self.location))
    }
}

/// DTO for ingesting a new video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub slug: String,
    pub width: i32,
    pub height: i32,
    pub total_frames: i32,
    pub location: String,
    /// Defaults to 0 (every frame sampled).
    pub skip: Option<i32>,
    /// Defaults to 0.
    pub per_object_bonus: Option<Decimal>,
    /// Defaults to 0.
    pub completion_bonus: Option<Decimal>,
    pub train_with_id: Option<DbId>,
    /// Defaults to `false`.
    pub is_for_training: Option<bool>,
}

impl CreateVideo {
    /// Check the fields that need no database lookup.
    pub fn validate(&self) -> Result<(), CoreError> {
        video::validate_slug(&self.slug)?;
        video::validate_video_shape(
            self.width,
            self.height,
            self.total_frames,
            self.skip.unwrap_or(0),
        )?;
        if self.location.trim().is_empty() {
            return Err(CoreError::Validation("location must not be empty".to_string()));
        }
        if let Some(rate) = self.per_object_bonus {
            video::validate_rate(rate)?;
        }
        if let Some(rate) = self.completion_bonus {
            video::validate_rate(rate)?;
        }
        if self.is_for_training.unwrap_or(false) && self.train_with_id.is_some() {
            return Err(CoreError::Validation(
                "a training video cannot itself be trained with another video".to_string(),
            ));
        }
        Ok(())
    }
}

/// One `video -> training video` edge, used to build the pair index.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TrainingEdge {
    pub id: DbId,
    pub train_with_id: Option<DbId>,
}
