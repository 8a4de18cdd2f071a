//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod bonus;
pub mod job;
pub mod label;
pub mod path;
pub mod segment;
pub mod video;
pub mod worker;
