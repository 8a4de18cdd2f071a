//! Video and segment rules.
//!
//! Videos are split into half-open segments `[start, stop)` by the ingestion
//! tooling. A production video may be paired with a hidden training video
//! (`train_with`) whose first segment's first job is the ground truth used
//! for quality control.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a video slug or label text (matches `VARCHAR(250)`).
pub const MAX_SLUG_LEN: usize = 250;

/// Largest value a `NUMERIC(10,2)` money column holds: 99,999,999.99.
///
/// `9_999_999_999 = 2 * 2^32 + 1_410_065_407`, at scale 2.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Decimal places stored for money columns.
pub const MONEY_SCALE: u32 = 2;

// ---------------------------------------------------------------------------
// Segment ranges
// ---------------------------------------------------------------------------

/// A half-open frame range `[start, stop)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: i32,
    pub stop: i32,
}

impl FrameRange {
    /// Build a range, checking `0 <= start < stop <= total_frames`.
    pub fn new(start: i32, stop: i32, total_frames: i32) -> Result<Self, CoreError> {
        validate_segment_range(start, stop, total_frames)?;
        Ok(Self { start, stop })
    }

    pub fn contains(&self, frame: i32) -> bool {
        (self.start..self.stop).contains(&frame)
    }

    /// Whether `frame` is sampled for annotation given the video's `skip`.
    ///
    /// With `skip = 0` every frame is sampled; otherwise every `skip + 1`-th
    /// frame counting from `start`.
    pub fn is_sampled(&self, frame: i32, skip: i32) -> bool {
        let step = i64::from(skip.max(0)) + 1;
        self.contains(frame) && (i64::from(frame) - i64::from(self.start)) % step == 0
    }
}

/// Validate a segment range against its video's length.
pub fn validate_segment_range(start: i32, stop: i32, total_frames: i32) -> Result<(), CoreError> {
    if start < 0 {
        return Err(CoreError::Validation(format!(
            "segment start must be >= 0, got {start}"
        )));
    }
    if start >= stop {
        return Err(CoreError::Validation(format!(
            "segment start ({start}) must be < stop ({stop})"
        )));
    }
    if stop > total_frames {
        return Err(CoreError::Validation(format!(
            "segment stop ({stop}) exceeds total frames ({total_frames})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Video ingestion validation
// ---------------------------------------------------------------------------

/// Validate the shape fields of a new video.
pub fn validate_video_shape(
    width: i32,
    height: i32,
    total_frames: i32,
    skip: i32,
) -> Result<(), CoreError> {
    if width <= 0 || height <= 0 {
        return Err(CoreError::Validation(format!(
            "video dimensions must be positive, got {width}x{height}"
        )));
    }
    if total_frames <= 0 {
        return Err(CoreError::Validation(format!(
            "total_frames must be > 0, got {total_frames}"
        )));
    }
    if skip < 0 {
        return Err(CoreError::Validation(format!("skip must be >= 0, got {skip}")));
    }
    Ok(())
}

/// Validate a slug or label text: non-blank and within the column limit.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.trim().is_empty() {
        return Err(CoreError::Validation("slug must not be empty".to_string()));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a bonus rate (non-negative money amount).
pub fn validate_rate(rate: Decimal) -> Result<(), CoreError> {
    if rate < Decimal::ZERO {
        return Err(CoreError::Validation(format!("bonus rate must be >= 0, got {rate}")));
    }
    validate_money("bonus rate", rate)
}

/// Check that `amount` fits a money column without rounding or overflow.
pub fn validate_money(field: &str, amount: Decimal) -> Result<(), CoreError> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(CoreError::Validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places, got {amount}"
        )));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_AMOUNT}, got {amount}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Training pairs
// ---------------------------------------------------------------------------

/// The pieces of a video row needed to check a `train_with` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingTarget {
    pub id: DbId,
    pub is_for_training: bool,
    pub train_with: Option<DbId>,
}

/// Validate pairing a video with a training video.
///
/// The target must be flagged `is_for_training` and must not itself be
/// paired, which keeps the relation acyclic. A training video is never
/// paired with another one.
pub fn validate_train_with(
    video_id: Option<DbId>,
    is_for_training: bool,
    target: &TrainingTarget,
) -> Result<(), CoreError> {
    if is_for_training {
        return Err(CoreError::Validation(
            "a training video cannot itself be trained with another video".to_string(),
        ));
    }
    if video_id == Some(target.id) {
        return Err(CoreError::Validation("a video cannot be trained with itself".to_string()));
    }
    if !target.is_for_training {
        return Err(CoreError::Validation(format!(
            "video {} is not marked for training",
            target.id
        )));
    }
    if target.train_with.is_some() {
        return Err(CoreError::Validation(format!(
            "training video {} must not reference another training video",
            target.id
        )));
    }
    Ok(())
}

/// Directed `video -> training video` edges with a reverse index.
///
/// Built from `(video_id, train_with)` rows; answers lookups in both
/// directions without the videos pointing at each other.
#[derive(Debug, Clone, Default)]
pub struct TrainingPairs {
    forward: HashMap<DbId, DbId>,
    reverse: HashMap<DbId, Vec<DbId>>,
}

impl TrainingPairs {
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (DbId, Option<DbId>)>,
    {
        let mut pairs = Self::default();
        for (video_id, train_with) in edges {
            if let Some(training_id) = train_with {
                pairs.forward.insert(video_id, training_id);
                pairs.reverse.entry(training_id).or_default().push(video_id);
            }
        }
        for trained in pairs.reverse.values_mut() {
            trained.sort_unstable();
        }
        pairs
    }

    /// The training video paired with `video_id`, if any.
    pub fn training_for(&self, video_id: DbId) -> Option<DbId> {
        self.forward.get(&video_id).copied()
    }

    /// Production videos that use `training_id` as their ground truth.
    pub fn trained_by(&self, training_id: DbId) -> &[DbId] {
        self.reverse
            .get(&training_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
