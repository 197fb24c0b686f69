//! Domain model: candidates, proposals with their positions, and assignments.
//!
//! Every entity is created locally from a validated Gateway response and carries a
//! locally generated v4 UUID. Relations between assignments and the other entities are
//! weak (by id) and resolved by lookup against the live session collections.

pub mod assignment;
pub mod candidate;
pub mod level;
pub mod proposal;

use uuid::Uuid;

pub use assignment::Assignment;
pub use candidate::Candidate;
pub use level::LcatLevel;
pub use proposal::{Position, Proposal};

/// Process-wide identity generator. Random 128-bit ids, no collision recovery.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}
