//! Main topic table: one row per topic, sorted by topic id.

use crate::fmt::{format_bytes, format_number, html_escape};
use crate::model::{LoadedPage, TopicInfo, TopicQueue};

use super::compile_table;
use super::widget::render_occupancy_widget;

const TABLE_HEADER: &str =
    r#"<table class="table table-striped"><tr><th>Topic</th><th>Queues</th><th>MessageId</th></tr>"#;

/// Rendered table plus the page byte total gathered while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRender {
    pub markup: String,
    pub total_page_bytes: u64,
}

/// Render all topics as a table.
///
/// Rows are ordered by topic id (byte-wise, case sensitive). The input slice
/// is not reordered; identical input always yields identical markup.
pub fn render_table(topics: &[TopicInfo]) -> TableRender {
    let mut sorted: Vec<&TopicInfo> = topics.iter().collect();
    sorted.sort_by(|a, b| a.topic_id.cmp(&b.topic_id));

    let mut markup = String::from(TABLE_HEADER);
    let mut total_page_bytes: u64 = 0;

    for topic in sorted {
        for page in &topic.loaded_pages {
            total_page_bytes = total_page_bytes.saturating_add(page.byte_size());
        }
        render_topic_row(&mut markup, topic);
    }

    markup.push_str("</table>");

    TableRender {
        markup,
        total_page_bytes,
    }
}

fn render_topic_row(out: &mut String, topic: &TopicInfo) {
    let mut active_badges = String::new();
    for page_id in &topic.active_pages {
        active_badges.push_str(&format!(
            r#"<span class="badge badge-warning" style="margin-left: 5px">{page_id}</span>"#
        ));
    }

    let mut loaded = String::new();
    for page in &topic.loaded_pages {
        render_loaded_page(&mut loaded, page);
    }

    out.push_str(&format!(
        r#"<tr style="font-size: 12px"><td>{topic_id}<div>Active:</div>{active_badges}<hr/><div>Loaded:</div>{loaded}</td><td>{queues}</td><td>{info}</td></tr>"#,
        topic_id = html_escape(&topic.topic_id),
        queues = render_queues(&topic.queues),
        info = render_message_info(topic),
    ));
}

fn render_loaded_page(out: &mut String, page: &LoadedPage) {
    let badge_class = if page.has_skipped {
        "badge-danger"
    } else {
        "badge-success"
    };
    let badge = format!(
        r#"<div><span class="badge {badge_class}" style="margin-left: 5px">{}</span></div>"#,
        page.page_id
    );
    let write_pos = format!("WritePos: {}", format_number(page.write_position));
    let size = format!("Size: {}", format_bytes(page.byte_size()));

    out.push_str("<div>");
    out.push_str(&compile_table(&[&badge, &write_pos, &size]));
    out.push_str(&format!(
        r#"<div class="progress"><div class="progress-bar" role="progressbar" style="width: {p}%;" aria-valuenow="{p}" aria-valuemin="0" aria-valuemax="100">{count}</div></div>"#,
        p = page.percent,
        count = page.count,
    ));
    out.push_str(&render_occupancy_widget(&page.sub_pages));
    out.push_str("</div>");
}

fn render_queues(queues: &[TopicQueue]) -> String {
    let mut result = String::new();
    for queue in queues {
        result.push_str(&format!("<div><b>{}</b></div>", html_escape(&queue.queue_id)));
        for range in &queue.ranges {
            result.push_str(&format!(
                r#"<div style="margin-left: 10px">{} - {}</div>"#,
                range.from_id, range.to_id
            ));
        }
        result.push_str("<hr/>");
    }
    result
}

fn render_message_info(topic: &TopicInfo) -> String {
    format!(
        "<div>Current Id:{}</div><div>Last Saved:{}</div><div>Last Save Chunk:{}</div>\
         <div>Last Save Duration:{}</div><div>Saved ago:{}</div><div>QSize:{}</div>",
        topic.message_id,
        topic.saved_message_id,
        topic.last_save_chunk,
        html_escape(&topic.last_save_dur),
        html_escape(&topic.last_save_moment),
        format_number(topic.queue_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QueueRange;
    use crate::model::fixtures::{page, topic};

    fn row_order(markup: &str, ids: &[&str]) -> Vec<usize> {
        ids.iter()
            .map(|id| {
                markup
                    .find(&format!(r#"<tr style="font-size: 12px"><td>{id}<div>"#))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_rows_sorted_by_topic_id() {
        let topics = vec![topic("b", vec![]), topic("a", vec![]), topic("c", vec![])];
        let rendered = render_table(&topics);
        let pos = row_order(&rendered.markup, &["a", "b", "c"]);
        assert!(pos[0] < pos[1] && pos[1] < pos[2]);
        // Input untouched.
        assert_eq!(topics[0].topic_id, "b");
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let topics = vec![topic("b", vec![]), topic("B", vec![]), topic("a", vec![])];
        let rendered = render_table(&topics);
        let pos = row_order(&rendered.markup, &["B", "a", "b"]);
        assert!(pos[0] < pos[1] && pos[1] < pos[2]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let topics = vec![
            topic("z", vec![page(1, 300)]),
            topic("m", vec![page(0, 10), page(2, 20)]),
        ];
        assert_eq!(render_table(&topics), render_table(&topics));
    }

    #[test]
    fn test_empty_topics_render_header_only() {
        let rendered = render_table(&[]);
        assert_eq!(rendered.markup, format!("{TABLE_HEADER}</table>"));
        assert_eq!(rendered.total_page_bytes, 0);
    }

    #[test]
    fn test_total_page_bytes_across_topics() {
        let topics = vec![
            topic("a", vec![page(0, 100), page(1, 200)]),
            topic("b", vec![page(0, 50)]),
        ];
        assert_eq!(render_table(&topics).total_page_bytes, 350);
    }

    #[test]
    fn test_loaded_page_summary() {
        let mut p = page(5, 2048);
        p.write_position = 1_500_000;
        p.count = 77;
        p.percent = 33;
        p.sub_pages = vec![3];
        let markup = render_table(&[topic("t", vec![p])]).markup;

        assert!(markup.contains(r#"<span class="badge badge-success" style="margin-left: 5px">5</span>"#));
        assert!(markup.contains("WritePos: 1,500,000"));
        assert!(markup.contains("Size: 2.00Kb"));
        assert!(markup.contains(r#"style="width: 33%;" aria-valuenow="33""#));
        assert!(markup.contains(">77</div>"));
        assert!(markup.contains(r#"<line x1="12""#));
    }

    #[test]
    fn test_skipped_page_badge_is_danger() {
        let mut p = page(9, 1);
        p.has_skipped = true;
        let markup = render_table(&[topic("t", vec![p])]).markup;
        assert!(markup.contains(r#"<span class="badge badge-danger" style="margin-left: 5px">9</span>"#));
    }

    #[test]
    fn test_active_pages_and_queues() {
        let mut t = topic("t", vec![]);
        t.active_pages = vec![4, 5];
        t.queues[0].ranges.push(QueueRange {
            from_id: 1100,
            to_id: 1200,
        });
        let markup = render_table(&[t]).markup;

        assert!(markup.contains(r#"<span class="badge badge-warning" style="margin-left: 5px">4</span><span class="badge badge-warning" style="margin-left: 5px">5</span>"#));
        assert!(markup.contains(
            r#"<div><b>q1</b></div><div style="margin-left: 10px">900 - 1000</div><div style="margin-left: 10px">1100 - 1200</div><hr/>"#
        ));
    }

    #[test]
    fn test_message_info_cell() {
        let mut t = topic("t", vec![]);
        t.queue_size = 12345;
        let markup = render_table(&[t]).markup;
        assert!(markup.contains(
            "<div>Current Id:1000</div><div>Last Saved:990</div><div>Last Save Chunk:3</div>\
             <div>Last Save Duration:12ms</div><div>Saved ago:1s</div><div>QSize:12,345</div>"
        ));
    }

    #[test]
    fn test_topic_id_is_escaped() {
        let markup = render_table(&[topic("<script>", vec![])]).markup;
        assert!(markup.contains("&lt;script&gt;"));
        assert!(!markup.contains("<script>"));
    }
}
