//! Full HTML page: status bar, total pages size, main content.

use pagedash_core::dashboard::Dashboard;
use pagedash_core::document::Region;
use pagedash_core::fmt::html_escape;

/// Page with every region filled with its current markup. The client script
/// keeps it current from the change stream.
pub(crate) fn render_page(dashboard: &Dashboard, backend: &str) -> String {
    let doc = dashboard.document();
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>{version} pagedash</title><link href="/assets/dashboard.css" type="text/css" rel="stylesheet" /><script src="/assets/dashboard.js" defer></script></head><body>{status_bar}<div class="content"><div class="summary">Backend: {backend} | Loaded pages size: <b id="{total_id}">{total}</b></div><div id="{main_id}">{main}</div></div></body></html>"#,
        version = pagedash_core::VERSION,
        status_bar = dashboard.status_bar_layout(),
        backend = html_escape(backend),
        total_id = Region::TotalPagesSize.id(),
        total = doc.html(Region::TotalPagesSize),
        main_id = Region::MainContent.id(),
        main = doc.html(Region::MainContent),
    )
}
