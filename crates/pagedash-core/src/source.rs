//! Snapshot source abstraction.
//!
//! A source yields one `StatusSnapshot` per call or fails. The dashboard
//! treats every failure the same way: the backend is offline.

use crate::model::{SnapshotError, StatusSnapshot};

/// Fetch failure.
#[derive(Debug)]
pub enum FetchError {
    /// Connection refused, timeout, DNS, broken body.
    Transport(String),
    /// Backend answered with a non-success HTTP status.
    Status(u16),
    /// Body is not a status payload.
    Decode(serde_json::Error),
    /// Payload decoded but breaks snapshot invariants.
    Invalid(SnapshotError),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {}", msg),
            FetchError::Status(code) => write!(f, "backend returned HTTP {}", code),
            FetchError::Decode(e) => write!(f, "decode error: {}", e),
            FetchError::Invalid(e) => write!(f, "invalid snapshot: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Decode(e) => Some(e),
            FetchError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

impl From<SnapshotError> for FetchError {
    fn from(e: SnapshotError) -> Self {
        FetchError::Invalid(e)
    }
}

/// Anything that produces status snapshots.
pub trait SnapshotSource {
    /// Blocks until a snapshot is available or the fetch fails.
    fn fetch(&mut self) -> Result<StatusSnapshot, FetchError>;
}

/// Decode and validate a `/api/status` body.
pub fn decode_snapshot(body: &str) -> Result<StatusSnapshot, FetchError> {
    let snapshot: StatusSnapshot = serde_json::from_str(body)?;
    snapshot.validate()?;
    Ok(snapshot)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_body() {
        let body = r#"{"queuesSnapshotId": 3, "topics": [], "system": {"usedmem": 1, "totalmem": 2}}"#;
        let snapshot = decode_snapshot(body).unwrap();
        assert_eq!(snapshot.queues_snapshot_id, 3);
        assert!(snapshot.topics.is_empty());
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let err = decode_snapshot("<html>502</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().starts_with("decode error:"));
    }

    #[test]
    fn test_decode_duplicate_topics_is_invalid() {
        let topic = r#"{"topicId": "t", "messageId": 1, "savedMessageId": 1, "lastSaveDur": "",
            "lastSaveMoment": "", "queueSize": 0, "loadedPages": [], "activePages": [], "queues": []}"#;
        let body = format!(
            r#"{{"queuesSnapshotId": 3, "topics": [{topic}, {topic}], "system": {{"usedmem": 1, "totalmem": 2}}}}"#
        );
        let err = decode_snapshot(&body).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Invalid(SnapshotError::DuplicateTopic(ref id)) if id == "t"
        ));
    }

    #[test]
    fn test_status_error_display() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "backend returned HTTP 503"
        );
    }
}
