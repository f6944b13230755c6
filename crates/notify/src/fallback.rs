use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use intake::CanonicalSubmission;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::channel::{ChannelKind, NotifyChannel};
use crate::content::NotificationContent;
use crate::error::NotifyError;

/// Note recorded with every queued submission.
pub const MANUAL_PROCESSING_NOTE: &str = "Email delivery failed - requires manual processing";

/// A submission that could not be emailed through any channel, persisted for
/// manual follow-up. Append-only: nothing in this system mutates or deletes
/// these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedSubmissionRecord {
    pub timestamp: String,
    pub data: CanonicalSubmission,
    pub note: String,
}

/// Tertiary delivery channel: one JSON line appended to a per-calendar-day
/// file under the fallback directory.
///
/// The append holds an exclusive lock on the day file so concurrent requests
/// cannot interleave records; the lock is released as soon as the line is
/// flushed (implicit unlock on handle drop covers the error paths).
pub struct FileQueueChannel {
    dir: PathBuf,
}

impl FileQueueChannel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The queue file for a given calendar day.
    pub fn day_file(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("failed-submissions-{}.json", date.format("%Y-%m-%d")))
    }

    fn append(path: &Path, record: &FailedSubmissionRecord) -> Result<(), NotifyError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| NotifyError::Queue(format!("create {}: {err}", parent.display())))?;
        }

        let mut line = serde_json::to_string(record)
            .map_err(|err| NotifyError::Queue(format!("serialize record: {err}")))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| NotifyError::Queue(format!("open {}: {err}", path.display())))?;
        file.lock_exclusive()
            .map_err(|err| NotifyError::Queue(format!("lock {}: {err}", path.display())))?;

        let written = file.write_all(line.as_bytes()).and_then(|()| file.flush());
        let unlocked = FileExt::unlock(&file);
        written.map_err(|err| NotifyError::Queue(format!("append {}: {err}", path.display())))?;
        unlocked.map_err(|err| NotifyError::Queue(format!("unlock {}: {err}", path.display())))?;
        Ok(())
    }
}

#[async_trait]
impl NotifyChannel for FileQueueChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::FileQueue
    }

    async fn send(
        &self,
        submission: &CanonicalSubmission,
        _content: &NotificationContent,
    ) -> Result<(), NotifyError> {
        let record = FailedSubmissionRecord {
            timestamp: Utc::now().to_rfc3339(),
            data: submission.clone(),
            note: MANUAL_PROCESSING_NOTE.to_string(),
        };
        let path = self.day_file(Utc::now().date_naive());

        let id = submission.id.clone();
        let queued_path = path.clone();
        tokio::task::spawn_blocking(move || Self::append(&path, &record))
            .await
            .map_err(|err| NotifyError::Queue(format!("append task failed: {err}")))??;

        info!(id = %id, path = %queued_path.display(), "submission queued for manual follow-up");
        Ok(())
    }
}
