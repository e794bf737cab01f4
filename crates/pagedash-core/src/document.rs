//! Named display regions holding the rendered markup.
//!
//! A `Region` id is stable across updates; the browser looks regions up by
//! that id. Every write bumps the region's revision and marks it changed
//! until the next `take_changes`.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Connected,
    SnapshotId,
    CpuMem,
    PagesSize,
    QueueSize,
    TotalPagesSize,
    MainContent,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Connected,
        Region::SnapshotId,
        Region::CpuMem,
        Region::PagesSize,
        Region::QueueSize,
        Region::TotalPagesSize,
        Region::MainContent,
    ];

    /// Element id of the region in the page markup.
    pub fn id(self) -> &'static str {
        match self {
            Region::Connected => "connected",
            Region::SnapshotId => "snapshot-id",
            Region::CpuMem => "cpu-mem",
            Region::PagesSize => "pages-size",
            Region::QueueSize => "q-size",
            Region::TotalPagesSize => "total-pages-size",
            Region::MainContent => "main-content",
        }
    }

    pub fn from_id(id: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.id() == id)
    }
}

/// Write target for rendered markup.
pub trait Surface {
    /// Replaces the markup of `region`.
    fn write(&mut self, region: Region, html: String);
}

/// Latest markup of a region after a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUpdate {
    pub region: Region,
    pub html: String,
    pub revision: u64,
}

#[derive(Debug, Default, Clone)]
struct RegionState {
    html: String,
    revision: u64,
}

/// In-memory set of all regions.
#[derive(Debug, Clone)]
pub struct Document {
    regions: BTreeMap<Region, RegionState>,
    changed: BTreeSet<Region>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// All regions empty, revision 0.
    pub fn new() -> Self {
        Self {
            regions: Region::ALL
                .into_iter()
                .map(|r| (r, RegionState::default()))
                .collect(),
            changed: BTreeSet::new(),
        }
    }

    pub fn html(&self, region: Region) -> &str {
        self.regions
            .get(&region)
            .map(|s| s.html.as_str())
            .unwrap_or_default()
    }

    /// Number of writes the region has received.
    pub fn revision(&self, region: Region) -> u64 {
        self.regions.get(&region).map(|s| s.revision).unwrap_or(0)
    }

    /// Current state of every region, in `Region` order.
    pub fn snapshot(&self) -> Vec<RegionUpdate> {
        self.regions
            .iter()
            .map(|(&region, state)| RegionUpdate {
                region,
                html: state.html.clone(),
                revision: state.revision,
            })
            .collect()
    }

    /// Drains the regions written since the last call. A region written
    /// several times is reported once with its latest markup.
    pub fn take_changes(&mut self) -> Vec<RegionUpdate> {
        let changed = std::mem::take(&mut self.changed);
        changed
            .into_iter()
            .map(|region| RegionUpdate {
                region,
                html: self.html(region).to_string(),
                revision: self.revision(region),
            })
            .collect()
    }
}

impl Surface for Document {
    fn write(&mut self, region: Region, html: String) {
        let state = self.regions.entry(region).or_default();
        state.html = html;
        state.revision += 1;
        self.changed.insert(region);
    }
}
