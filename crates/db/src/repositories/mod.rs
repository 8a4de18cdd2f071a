//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods that only serve request handlers take `&PgPool`; methods that
//! also run inside a workflow transaction accept any `PgExecutor` or a
//! `&mut PgConnection` borrowed from the transaction.

pub mod bonus_award_repo;
pub mod bonus_schedule_repo;
pub mod job_repo;
pub mod label_repo;
pub mod path_repo;
pub mod segment_repo;
pub mod video_repo;
pub mod worker_repo;

pub use bonus_award_repo::BonusAwardRepo;
pub use bonus_schedule_repo::BonusScheduleRepo;
pub use job_repo::JobRepo;
pub use label_repo::LabelRepo;
pub use path_repo::PathRepo;
pub use segment_repo::SegmentRepo;
pub use video_repo::VideoRepo;
pub use worker_repo::WorkerRepo;
