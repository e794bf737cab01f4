//! Main content area: topic table, initialization banner, operations panel.

use crate::fmt::html_escape;
use crate::model::{PersistentOperation, StatusSnapshot};

use super::split_page;
use super::table::render_table;

const INITIALIZING_BANNER: &str = r#"<h1 style="color:red">Application is being initialized</h1>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainContent {
    pub markup: String,
    pub total_page_bytes: u64,
}

/// Render everything below the status bar for one snapshot.
pub fn render_main_content(snapshot: &StatusSnapshot) -> MainContent {
    let table = render_table(&snapshot.topics);

    let body = if snapshot.active_operations.is_empty() && snapshot.awaiting_operations.is_empty() {
        table.markup
    } else {
        let operations = format!(
            "{}{}",
            render_operations("Active operations", &snapshot.active_operations),
            render_operations("Awaiting operations", &snapshot.awaiting_operations),
        );
        split_page(&table.markup, &operations)
    };

    let markup = if snapshot.initializing {
        format!(r#"{INITIALIZING_BANNER}<div style="color:gray">{body}</div>"#)
    } else {
        body
    };

    MainContent {
        markup,
        total_page_bytes: table.total_page_bytes,
    }
}

/// Table of persistence operations under a heading.
pub fn render_operations(header: &str, operations: &[PersistentOperation]) -> String {
    let mut result = format!(
        r#"<h1>{}</h1><table class="table table-striped"><tr><th>Topic</th><th>Action</th></tr>"#,
        html_escape(header)
    );
    for op in operations {
        result.push_str(&format!(
            r#"<tr><td style="font-size:10px">{}<div>{}</div></td><td style="font-size:10px">{}<div>{}</div></td></tr>"#,
            html_escape(&op.topic_id),
            op.page_id,
            html_escape(&op.name),
            html_escape(&op.dur),
        ));
    }
    result.push_str("</table>");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{page, snapshot, topic};

    fn op(name: &str, topic_id: &str, page_id: i64) -> PersistentOperation {
        PersistentOperation {
            name: name.to_string(),
            topic_id: topic_id.to_string(),
            page_id,
            dur: "00:00:02".to_string(),
        }
    }

    #[test]
    fn test_ready_snapshot_renders_table_only() {
        let snap = snapshot(1, vec![topic("a", vec![page(0, 10)])]);
        let content = render_main_content(&snap);
        assert_eq!(content.markup, render_table(&snap.topics).markup);
        assert_eq!(content.total_page_bytes, 10);
    }

    #[test]
    fn test_initializing_snapshot_gets_banner_and_gray_table() {
        let mut snap = snapshot(1, vec![topic("a", vec![])]);
        snap.initializing = true;
        let content = render_main_content(&snap);
        let table = render_table(&snap.topics).markup;
        assert_eq!(
            content.markup,
            format!(r#"{INITIALIZING_BANNER}<div style="color:gray">{table}</div>"#)
        );
    }

    #[test]
    fn test_operations_panel_beside_table() {
        let mut snap = snapshot(1, vec![topic("a", vec![])]);
        snap.awaiting_operations = vec![op("SavePage", "a", 3)];
        let content = render_main_content(&snap);

        assert!(content.markup.starts_with(r#"<table style="width: 100%"><tr><td style="vertical-align: top"><table class="table table-striped">"#));
        assert!(content.markup.contains("<h1>Active operations</h1>"));
        assert!(content.markup.contains("<h1>Awaiting operations</h1>"));
        assert!(content.markup.contains(
            r#"<td style="font-size:10px">a<div>3</div></td><td style="font-size:10px">SavePage<div>00:00:02</div></td>"#
        ));
    }

    #[test]
    fn test_render_operations_empty() {
        assert_eq!(
            render_operations("Active operations", &[]),
            r#"<h1>Active operations</h1><table class="table table-striped"><tr><th>Topic</th><th>Action</th></tr></table>"#
        );
    }
}
