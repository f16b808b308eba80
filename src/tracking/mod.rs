// src/tracking/mod.rs
//
// Per-object state owned by the frame driver: a bounded box history per
// tracked id and the table that creates and prunes those entries.

mod object_table;
mod position_history;

pub use object_table::{retain_seen, ObjectTable, TrackedObject};
pub use position_history::{PositionHistory, MAX_HISTORY_FRAMES};
