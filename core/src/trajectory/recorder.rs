//! Trajectory recorder implementation
//!
//! The external logging collaborator: the controller hands it events and
//! the caller decides whether and where the trajectory lands on disk. The
//! control loop itself owns no file format.

use crate::error::{Result, TrajectoryError};
use crate::trajectory::TrajectoryEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records execution trajectories for debugging and analysis
pub struct TrajectoryRecorder {
    entries: RwLock<Vec<TrajectoryEntry>>,
    started_at: DateTime<Utc>,
    file_path: Option<PathBuf>,
}

/// Complete trajectory data as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// Unique identifier for this trajectory
    pub id: String,

    /// When recording started
    pub started_at: DateTime<Utc>,

    /// When the trajectory was saved
    pub saved_at: DateTime<Utc>,

    /// All recorded entries
    pub entries: Vec<TrajectoryEntry>,
}

impl TrajectoryRecorder {
    /// Create a recorder that only keeps entries in memory
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            started_at: Utc::now(),
            file_path: None,
        }
    }

    /// Create a recorder that saves to a file on every entry
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            started_at: Utc::now(),
            file_path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Record an entry, persisting if a file path is configured
    pub async fn record(&self, entry: TrajectoryEntry) -> Result<()> {
        {
            let mut entries = self.entries.write().await;
            entries.push(entry);
        }

        if self.file_path.is_some() {
            self.save().await?;
        }
        Ok(())
    }

    /// Number of recorded entries
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Snapshot of all recorded entries
    pub async fn entries(&self) -> Vec<TrajectoryEntry> {
        self.entries.read().await.clone()
    }

    /// Save the trajectory to the configured file
    pub async fn save(&self) -> Result<()> {
        let path = match &self.file_path {
            Some(path) => path,
            None => return Ok(()),
        };

        let trajectory = Trajectory {
            id: Uuid::new_v4().to_string(),
            started_at: self.started_at,
            saved_at: Utc::now(),
            entries: self.entries.read().await.clone(),
        };

        let json = serde_json::to_string_pretty(&trajectory)?;
        fs::write(path, json)
            .await
            .map_err(|e| TrajectoryError::RecordingFailed {
                message: format!("{}: {}", path.display(), e),
            })?;
        Ok(())
    }

    /// Load a previously saved trajectory
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Trajectory> {
        let content =
            fs::read_to_string(path.as_ref())
                .await
                .map_err(|_| TrajectoryError::LoadFailed {
                    path: path.as_ref().display().to_string(),
                })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for TrajectoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{AnswerKind, FinalAnswer};

    #[tokio::test]
    async fn records_entries_in_order() {
        let recorder = TrajectoryRecorder::new();
        recorder
            .record(TrajectoryEntry::task_start("What is 7 times 6?"))
            .await
            .unwrap();
        recorder
            .record(TrajectoryEntry::engine_reply(1, "Thought: multiply"))
            .await
            .unwrap();
        assert_eq!(recorder.entry_count().await, 2);
    }

    #[tokio::test]
    async fn saves_and_loads_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.json");

        let recorder = TrajectoryRecorder::with_file(&path);
        recorder
            .record(TrajectoryEntry::task_start("q"))
            .await
            .unwrap();
        recorder
            .record(TrajectoryEntry::task_complete(
                FinalAnswer::new("42", AnswerKind::Number),
                1,
                10,
            ))
            .await
            .unwrap();

        let loaded = TrajectoryRecorder::load(&path).await.unwrap();
        assert_eq!(loaded.entries.len(), 2);
    }
}
