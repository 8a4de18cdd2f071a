//! Domain core for the video annotation pipeline.
//!
//! Pure logic only: entity shapes, validation rules, the quality-control
//! state transitions and the bonus policy. Persistence lives in `vatic-db`.

pub mod bonus;
pub mod collaborators;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod job;
pub mod qc;
pub mod types;
pub mod video;
