// Slot pipeline: normalization of upstream records and the listing stage

pub mod listing;
pub mod processing;

// Re-export key types and functions from each stage
pub use listing::{list_slots, SlotPage, SlotQuery};
pub use processing::normalize;
