//! Sub-page occupancy strip for a loaded page.

/// Strip width in SVG units.
pub const STRIP_WIDTH: u32 = 400;
/// Strip height in SVG units.
pub const STRIP_HEIGHT: u32 = 20;
/// Horizontal distance between consecutive sub-page positions.
const TICK_STEP: u64 = 4;

/// Render sub-page fill markers as vertical ticks on a fixed-width strip.
///
/// Marker `i` is drawn at `x = i * 4`. Positions past the strip width are
/// emitted as-is and fall outside the visible area.
pub fn render_occupancy_widget(markers: &[u32]) -> String {
    let mut result = format!(
        r#"<div class="page-widget"><svg style="font-size:16px" width="{w}" height="{h}"><rect width="{w}" height="{h}" style="fill:none;stroke-width:1;stroke:black"/>"#,
        w = STRIP_WIDTH,
        h = STRIP_HEIGHT,
    );

    for &marker in markers {
        let x = u64::from(marker) * TICK_STEP;
        result.push_str(&format!(
            r#"<line x1="{x}" y1="0" x2="{x}" y2="{h}" style="stroke:blue;stroke-width:2" />"#,
            h = STRIP_HEIGHT,
        ));
    }

    result.push_str("</svg></div>");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_without_markers_is_empty_strip() {
        let svg = render_occupancy_widget(&[]);
        assert!(svg.starts_with(r#"<div class="page-widget"><svg"#));
        assert!(svg.contains(r#"width="400" height="20""#));
        assert!(!svg.contains("<line"));
        assert!(svg.ends_with("</svg></div>"));
    }

    #[test]
    fn test_widget_tick_offsets() {
        let svg = render_occupancy_widget(&[0, 25, 99]);
        assert_eq!(svg.matches("<line").count(), 3);
        assert!(svg.contains(r#"<line x1="0" y1="0" x2="0" y2="20""#));
        assert!(svg.contains(r#"<line x1="100" y1="0" x2="100" y2="20""#));
        assert!(svg.contains(r#"<line x1="396" y1="0" x2="396" y2="20""#));
    }

    #[test]
    fn test_widget_does_not_clamp_overflow() {
        let svg = render_occupancy_widget(&[150]);
        assert!(svg.contains(r#"x1="600""#));
    }

    #[test]
    fn test_widget_keeps_marker_order() {
        let svg = render_occupancy_widget(&[10, 2]);
        let first = svg.find(r#"x1="40""#).unwrap();
        let second = svg.find(r#"x1="8""#).unwrap();
        assert!(first < second);
    }
}
