//! Shared fixtures for repository and workflow tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use vatic_core::collaborators::{BonusPayment, PaymentService, WorkerAccounts};
use vatic_core::error::CoreError;
use vatic_core::types::DbId;
use vatic_db::models::job::{CreateJob, Job};
use vatic_db::models::label::CreateLabel;
use vatic_db::models::segment::{CreateSegment, Segment};
use vatic_db::models::video::{CreateVideo, Video};
use vatic_db::models::worker::{CreateWorker, Worker};
use vatic_db::repositories::{JobRepo, LabelRepo, SegmentRepo, VideoRepo, WorkerRepo};
use vatic_db::workflow;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn new_video(slug: &str) -> CreateVideo {
    CreateVideo {
        slug: slug.to_string(),
        width: 720,
        height: 480,
        total_frames: 1000,
        location: format!("/srv/frames/{slug}"),
        skip: None,
        per_object_bonus: None,
        completion_bonus: None,
        train_with_id: None,
        is_for_training: None,
    }
}

pub fn new_training_video(slug: &str) -> CreateVideo {
    CreateVideo {
        is_for_training: Some(true),
        ..new_video(slug)
    }
}

pub async fn create_segment(pool: &PgPool, video_id: DbId, start: i32, stop: i32) -> Segment {
    SegmentRepo::create(
        pool,
        &CreateSegment {
            video_id,
            start_frame: start,
            stop_frame: stop,
        },
    )
    .await
    .unwrap()
}

pub async fn create_job(
    pool: &PgPool,
    segment_id: DbId,
    group_id: DbId,
    worker_id: Option<DbId>,
) -> Job {
    JobRepo::create(
        pool,
        &CreateJob {
            segment_id,
            group_id,
            worker_id,
        },
    )
    .await
    .unwrap()
}

pub async fn create_worker(pool: &PgPool, external_id: &str) -> Worker {
    WorkerRepo::create(
        pool,
        &CreateWorker {
            external_id: external_id.to_string(),
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// QC fixture
// ---------------------------------------------------------------------------

/// A production video paired with a training video, one submitted job on
/// the production video, and the canonical ground-truth job.
pub struct QcFixture {
    pub training_video: Video,
    pub training_segment: Segment,
    pub canonical_job: Job,
    pub video: Video,
    pub segment: Segment,
    pub worker: Worker,
    pub job: Job,
    pub label_id: DbId,
}

pub async fn qc_fixture(pool: &PgPool) -> QcFixture {
    let training_video = VideoRepo::create(pool, &new_training_video("gt-parking"))
        .await
        .unwrap();
    let training_segment = create_segment(pool, training_video.id, 0, 100).await;
    let canonical_job = create_job(pool, training_segment.id, 900, None).await;
    // A second training segment that must never be picked as canonical.
    let later = create_segment(pool, training_video.id, 100, 200).await;
    create_job(pool, later.id, 901, None).await;

    let video = VideoRepo::create(
        pool,
        &CreateVideo {
            train_with_id: Some(training_video.id),
            per_object_bonus: Some(Decimal::new(200, 2)),
            completion_bonus: Some(Decimal::new(500, 2)),
            ..new_video("parking-lot")
        },
    )
    .await
    .unwrap();
    let segment = create_segment(pool, video.id, 300, 400).await;
    let worker = create_worker(pool, "A1B2C3").await;
    let job = create_job(pool, segment.id, 42, Some(worker.id)).await;

    let label = LabelRepo::create(
        pool,
        &CreateLabel {
            text: "car".to_string(),
        },
    )
    .await
    .unwrap();
    VideoRepo::attach_label(pool, video.id, label.id).await.unwrap();
    VideoRepo::attach_label(pool, training_video.id, label.id)
        .await
        .unwrap();

    QcFixture {
        training_video,
        training_segment,
        canonical_job,
        video,
        segment,
        worker,
        job,
        label_id: label.id,
    }
}

/// Fixture with the production job already submitted.
pub async fn submitted_fixture(pool: &PgPool) -> QcFixture {
    let mut fx = qc_fixture(pool).await;
    fx.job = workflow::submit_job(pool, fx.job.id).await.unwrap();
    fx
}

// ---------------------------------------------------------------------------
// Recording collaborators
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingAccounts {
    pub verified: Mutex<Vec<(DbId, bool)>>,
    pub blocked: Mutex<Vec<DbId>>,
    pub fail_block: bool,
}

#[async_trait]
impl WorkerAccounts for RecordingAccounts {
    async fn set_verified(&self, worker_id: DbId, verified: bool) -> Result<(), CoreError> {
        self.verified.lock().unwrap().push((worker_id, verified));
        Ok(())
    }

    async fn block(&self, worker_id: DbId) -> Result<(), CoreError> {
        if self.fail_block {
            return Err(CoreError::Internal("marketplace unavailable".to_string()));
        }
        self.blocked.lock().unwrap().push(worker_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPayments {
    pub payments: Mutex<Vec<BonusPayment>>,
}

#[async_trait]
impl PaymentService for RecordingPayments {
    async fn award_bonus(&self, payment: &BonusPayment) -> Result<(), CoreError> {
        self.payments.lock().unwrap().push(payment.clone());
        Ok(())
    }
}
