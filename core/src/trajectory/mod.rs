//! Execution trajectory recording

pub mod entry;
pub mod recorder;

pub use entry::{Event, TrajectoryEntry};
pub use recorder::{Trajectory, TrajectoryRecorder};
