//! Decode fan-out and merge stages

pub mod dispatcher;
pub mod merger;

pub use dispatcher::{DispatchOutcome, SkippedFile};
pub use merger::MergedBuffer;
