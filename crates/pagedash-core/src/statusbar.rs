//! Status bar: connectivity, snapshot id, memory and aggregate totals.
//!
//! The controller remembers what it last painted and only rewrites the
//! snapshot id and connectivity regions when their backing value changes.
//! Totals and memory are repainted on every update.

use tracing::info;

use crate::document::{Document, Region, Surface};
use crate::fmt::{format_kb, format_number};
use crate::model::StatusSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Disconnected,
    Initializing,
    Online,
}

impl Connectivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Connectivity::Disconnected => "offline",
            Connectivity::Initializing => "initializing",
            Connectivity::Online => "online",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Connectivity::Disconnected => "red",
            Connectivity::Initializing => "yellow",
            Connectivity::Online => "green",
        }
    }

    fn label(self) -> String {
        format!(
            r#"<span style="color: {}">{}</span>"#,
            self.color(),
            self.as_str()
        )
    }
}

/// Aggregates shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub page_bytes: u64,
    pub queue_size: u64,
}

impl Totals {
    pub fn of(snapshot: &StatusSnapshot) -> Self {
        let mut totals = Totals::default();
        for topic in &snapshot.topics {
            totals.queue_size = totals.queue_size.saturating_add(topic.queue_size);
            for page in &topic.loaded_pages {
                totals.page_bytes = totals.page_bytes.saturating_add(page.byte_size());
            }
        }
        totals
    }
}

/// Status-bar controller state carried between poll cycles.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    last_snapshot_id: Option<i64>,
    connected: bool,
    last_initializing: Option<bool>,
}

impl StatusBar {
    /// Disconnected, nothing painted yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connectivity(&self) -> Connectivity {
        match (self.connected, self.last_initializing) {
            (false, _) => Connectivity::Disconnected,
            (true, Some(true)) => Connectivity::Initializing,
            (true, _) => Connectivity::Online,
        }
    }

    pub fn last_snapshot_id(&self) -> Option<i64> {
        self.last_snapshot_id
    }

    /// Status-bar markup. Each region element carries its stable id and the
    /// markup currently held by `doc`.
    pub fn layout(doc: &Document) -> String {
        const SEPARATOR: &str = r#"<td><div class="statusbar-separator"></div></td>"#;
        const GLOW: &str = "text-shadow: 0 0 2px white;";

        let cell = |td_style: &str, caption: &str, tag: &str, region: Region| {
            format!(
                r#"<td style="{td_style}">{caption}<{tag} id="{id}" style="{GLOW}">{html}</{tag}></td>"#,
                id = region.id(),
                html = doc.html(region),
            )
        };

        let cells = [
            cell("padding-left: 5px", "Connected: ", "b", Region::Connected),
            cell(
                "padding-left: 5px; min-width:250px",
                "Queue snapshotId: ",
                "b",
                Region::SnapshotId,
            ),
            cell("padding-left: 5px; min-width:270px", "", "span", Region::CpuMem),
            cell(
                "padding-left: 5px; min-width:270px",
                "Total pages size: ",
                "b",
                Region::PagesSize,
            ),
            cell("padding-left: 5px", "Queues size: ", "b", Region::QueueSize),
        ]
        .join(SEPARATOR);

        format!(r#"<div id="status-bar"><table><tr>{cells}</tr></table></div>"#)
    }

    /// Apply a freshly fetched snapshot.
    pub fn update(&mut self, snapshot: &StatusSnapshot, surface: &mut impl Surface) {
        if self.last_snapshot_id != Some(snapshot.queues_snapshot_id) {
            self.last_snapshot_id = Some(snapshot.queues_snapshot_id);
            surface.write(Region::SnapshotId, snapshot.queues_snapshot_id.to_string());
        }

        if !self.connected || self.last_initializing != Some(snapshot.initializing) {
            self.connected = true;
            self.last_initializing = Some(snapshot.initializing);
            let state = self.connectivity();
            info!(
                state = state.as_str(),
                snapshot_id = snapshot.queues_snapshot_id,
                "connectivity changed"
            );
            surface.write(Region::Connected, state.label());
        }

        let totals = Totals::of(snapshot);
        surface.write(
            Region::PagesSize,
            format!(
                r#"<span style="color: green">{}</span>"#,
                format_number(totals.page_bytes)
            ),
        );
        surface.write(
            Region::QueueSize,
            format!(
                r#"<span style="color: green">{}</span>"#,
                format_number(totals.queue_size)
            ),
        );
        surface.write(
            Region::CpuMem,
            format!(
                "Mem: <span>{} of {}</span>",
                format_kb(snapshot.system.usedmem),
                format_kb(snapshot.system.totalmem)
            ),
        );
    }

    /// Switch to offline after a failed fetch. Returns `false` when already
    /// offline; nothing is repainted then.
    pub fn mark_offline(&mut self, surface: &mut impl Surface) -> bool {
        if !self.connected {
            return false;
        }
        self.connected = false;
        info!(state = Connectivity::Disconnected.as_str(), "connectivity changed");
        surface.write(Region::Connected, Connectivity::Disconnected.label());
        true
    }
}
