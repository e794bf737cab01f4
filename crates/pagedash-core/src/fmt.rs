//! Shared formatting helpers for dashboard markup.
//!
//! All functions are pure: no regions, no markup layout.

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * 1024 * 1024;

/// Format an integer with a `,` between every group of three digits.
///
/// `0` -> `"0"`, `999` -> `"999"`, `1234567` -> `"1,234,567"`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Format byte count with the smallest unit whose value stays below 1024.
///
/// `"1023.00b"`, `"1.00Kb"`, `"1.00Mb"`, `"3.50Gb"`. Gb is the largest unit.
pub fn format_bytes(bytes: u64) -> String {
    let f = bytes as f64;
    if bytes < KB {
        format!("{:.2}b", f)
    } else if bytes < MB {
        format!("{:.2}Kb", f / KB as f64)
    } else if bytes < GB {
        format!("{:.2}Mb", f / MB as f64)
    } else {
        format!("{:.2}Gb", f / GB as f64)
    }
}

/// Format a memory figure reported in KiB.
pub fn format_kb(kb: u64) -> String {
    format_bytes(kb.saturating_mul(KB))
}

/// Escape text coming from the backend before it is placed into markup.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(100_000), "100,000");
    }

    #[test]
    fn test_format_number_beyond_f64_precision() {
        assert_eq!(format_number(1 << 53), "9,007,199,254,740,992");
        assert_eq!(format_number(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_format_bytes_unit_boundaries() {
        assert_eq!(format_bytes(0), "0.00b");
        assert_eq!(format_bytes(1023), "1023.00b");
        assert_eq!(format_bytes(1024), "1.00Kb");
        assert_eq!(format_bytes(1536), "1.50Kb");
        assert_eq!(format_bytes(1024 * 1024), "1.00Mb");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00Gb");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024 * 1024), "5120.00Gb");
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(1), "1.00Kb");
        assert_eq!(format_kb(2 * 1024 * 1024), "2.00Gb");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(html_escape("plain-topic"), "plain-topic");
    }
}
