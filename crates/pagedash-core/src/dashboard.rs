//! One dashboard instance: status-bar state plus the regions it paints.

use tracing::{debug, warn};

use crate::document::{Document, Region, RegionUpdate, Surface};
use crate::fmt::format_bytes;
use crate::model::StatusSnapshot;
use crate::render::render_main_content;
use crate::source::{FetchError, SnapshotSource};
use crate::statusbar::{Connectivity, StatusBar};

/// Result of applying one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Applied { snapshot_id: i64 },
    Offline,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    status_bar: StatusBar,
    document: Document,
    failures: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn connectivity(&self) -> Connectivity {
        self.status_bar.connectivity()
    }

    pub fn last_snapshot_id(&self) -> Option<i64> {
        self.status_bar.last_snapshot_id()
    }

    /// Consecutive failed cycles since the last applied snapshot.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Status-bar markup filled with the current region contents.
    pub fn status_bar_layout(&self) -> String {
        StatusBar::layout(&self.document)
    }

    /// Regions changed since the previous call.
    pub fn take_changes(&mut self) -> Vec<RegionUpdate> {
        self.document.take_changes()
    }

    /// Fetch once from `source` and apply the outcome.
    pub fn poll_once<S: SnapshotSource + ?Sized>(&mut self, source: &mut S) -> Cycle {
        let result = source.fetch();
        self.apply(result)
    }

    pub fn apply(&mut self, result: Result<StatusSnapshot, FetchError>) -> Cycle {
        match result {
            Ok(snapshot) => {
                self.apply_snapshot(&snapshot);
                Cycle::Applied {
                    snapshot_id: snapshot.queues_snapshot_id,
                }
            }
            Err(e) => {
                self.apply_failure(&e);
                Cycle::Offline
            }
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        self.failures = 0;
        self.status_bar.update(snapshot, &mut self.document);

        let content = render_main_content(snapshot);
        // The table is the bulk of the page; skip the write when nothing moved.
        if self.document.html(Region::MainContent) != content.markup {
            self.document.write(Region::MainContent, content.markup);
        }
        self.document
            .write(Region::TotalPagesSize, format_bytes(content.total_page_bytes));

        debug!(
            snapshot_id = snapshot.queues_snapshot_id,
            topics = snapshot.topics.len(),
            total_page_bytes = content.total_page_bytes,
            "snapshot applied"
        );
    }

    pub fn apply_failure(&mut self, error: &FetchError) {
        self.failures += 1;
        warn!(error = %error, failures = self.failures, "status fetch failed");
        self.status_bar.mark_offline(&mut self.document);
    }
}
