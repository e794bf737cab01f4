//! Status snapshot as reported by the persistence service `/api/status`.
//!
//! One `StatusSnapshot` = one poll cycle. Snapshots are read-only once
//! decoded; every cycle produces a new one.

use std::collections::HashSet;

use serde::Deserialize;

/// Top-level status payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub topics: Vec<TopicInfo>,
    /// Monotonically increasing version of the queue snapshot.
    pub queues_snapshot_id: i64,
    pub system: SystemStatus,
    /// Backend is still warming up. The backend spells it `initialing`
    /// and omits it once initialized.
    #[serde(rename = "initialing", default)]
    pub initializing: bool,
    #[serde(default)]
    pub active_operations: Vec<PersistentOperation>,
    #[serde(default)]
    pub awaiting_operations: Vec<PersistentOperation>,
}

/// Host memory, in KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SystemStatus {
    pub usedmem: u64,
    pub totalmem: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInfo {
    pub topic_id: String,
    pub message_id: i64,
    pub saved_message_id: i64,
    #[serde(default)]
    pub last_save_chunk: u64,
    pub last_save_dur: String,
    pub last_save_moment: String,
    pub queue_size: u64,
    pub loaded_pages: Vec<LoadedPage>,
    pub active_pages: Vec<i64>,
    pub queues: Vec<TopicQueue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPage {
    pub page_id: i64,
    /// Messages held by the page.
    pub count: u64,
    #[serde(default)]
    pub size: Option<u64>,
    pub write_position: u64,
    /// Fill percentage, 0..=100.
    pub percent: u32,
    pub has_skipped: bool,
    /// Sub-page fill markers, in sub-page units.
    #[serde(default)]
    pub sub_pages: Vec<u32>,
}

impl LoadedPage {
    /// Bytes held by the page: the reported size, or the write position
    /// when the backend does not report one.
    pub fn byte_size(&self) -> u64 {
        self.size.unwrap_or(self.write_position)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicQueue {
    pub queue_id: String,
    pub ranges: Vec<QueueRange>,
}

/// Contiguous message id interval held by a queue, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRange {
    pub from_id: i64,
    pub to_id: i64,
}

/// Pending or running page persistence operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentOperation {
    pub name: String,
    pub topic_id: String,
    pub page_id: i64,
    pub dur: String,
}

/// Contract violation in a decoded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    DuplicateTopic(String),
    DuplicatePage { topic_id: String, page_id: i64 },
    InvertedRange {
        topic_id: String,
        queue_id: String,
        from_id: i64,
        to_id: i64,
    },
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::DuplicateTopic(topic_id) => {
                write!(f, "duplicate topic {}", topic_id)
            }
            SnapshotError::DuplicatePage { topic_id, page_id } => {
                write!(f, "duplicate page {} in topic {}", page_id, topic_id)
            }
            SnapshotError::InvertedRange {
                topic_id,
                queue_id,
                from_id,
                to_id,
            } => write!(
                f,
                "range {}-{} of queue {}/{} is inverted",
                from_id, to_id, topic_id, queue_id
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl StatusSnapshot {
    /// Checks id uniqueness and range ordering. The first violation wins.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut topic_ids = HashSet::with_capacity(self.topics.len());
        for topic in &self.topics {
            if !topic_ids.insert(topic.topic_id.as_str()) {
                return Err(SnapshotError::DuplicateTopic(topic.topic_id.clone()));
            }

            let mut page_ids = HashSet::with_capacity(topic.loaded_pages.len());
            for page in &topic.loaded_pages {
                if !page_ids.insert(page.page_id) {
                    return Err(SnapshotError::DuplicatePage {
                        topic_id: topic.topic_id.clone(),
                        page_id: page.page_id,
                    });
                }
            }

            for queue in &topic.queues {
                if let Some(range) = queue.ranges.iter().find(|r| r.from_id > r.to_id) {
                    return Err(SnapshotError::InvertedRange {
                        topic_id: topic.topic_id.clone(),
                        queue_id: queue.queue_id.clone(),
                        from_id: range.from_id,
                        to_id: range.to_id,
                    });
                }
            }
        }
        Ok(())
    }
}
