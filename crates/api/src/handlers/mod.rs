//! Request handlers.
//!
//! Handlers delegate single-table reads and writes to the repositories in
//! `vatic_db`, multi-entity operations to `vatic_db::workflow`, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod jobs;
pub mod labels;
pub mod segments;
pub mod videos;
pub mod workers;
