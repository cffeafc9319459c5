//! Trading range state machine.
//!
//! See [`RangeManager`] for the save/apply/reset protocol.

pub mod manager;

pub use manager::{Bounds, RangeManager, RangeState};
