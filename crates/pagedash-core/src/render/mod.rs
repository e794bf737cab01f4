//! Markup renderers. Pure functions from snapshot data to HTML text.

pub mod content;
pub mod table;
pub mod widget;

pub use content::{MainContent, render_main_content, render_operations};
pub use table::{TableRender, render_table};
pub use widget::render_occupancy_widget;

/// Single-row, full-width table with one cell per value.
pub(crate) fn compile_table(values: &[&str]) -> String {
    let mut result = String::from(r#"<table style="width: 100%"><tr>"#);
    for value in values {
        result.push_str("<td>");
        result.push_str(value);
        result.push_str("</td>");
    }
    result.push_str("</tr></table>");
    result
}

/// Two top-aligned columns side by side.
pub(crate) fn split_page(left: &str, right: &str) -> String {
    format!(
        r#"<table style="width: 100%"><tr><td style="vertical-align: top">{left}</td><td style="vertical-align: top">{right}</td></tr></table>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_table_cells_in_order() {
        assert_eq!(
            compile_table(&["a", "b"]),
            r#"<table style="width: 100%"><tr><td>a</td><td>b</td></tr></table>"#
        );
    }

    #[test]
    fn test_compile_table_empty() {
        assert_eq!(
            compile_table(&[]),
            r#"<table style="width: 100%"><tr></tr></table>"#
        );
    }
}
