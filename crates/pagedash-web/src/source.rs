//! HTTP snapshot source: `GET {backend}/api/status`.

use std::time::Duration;

use pagedash_core::model::StatusSnapshot;
use pagedash_core::source::{FetchError, SnapshotSource, decode_snapshot};

/// Blocking client; run it off the async runtime.
#[derive(Clone)]
pub(crate) struct HttpSource {
    agent: ureq::Agent,
    url: String,
}

impl HttpSource {
    pub(crate) fn new(backend: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: status_url(backend),
        }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSource {
    fn fetch(&mut self) -> Result<StatusSnapshot, FetchError> {
        let response = self.agent.get(&self.url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            ureq::Error::Transport(t) => FetchError::Transport(t.to_string()),
        })?;
        let body = response
            .into_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        decode_snapshot(&body)
    }
}

fn status_url(backend: &str) -> String {
    format!("{}/api/status", backend.trim_end_matches('/'))
}
