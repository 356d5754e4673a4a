use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Cuts `s` to at most `max_width` display columns, ending in "..." when cut.
/// Columns too narrow for a character plus the ellipsis get dots only.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ".".repeat(max_width);
    }
    let budget = max_width - ELLIPSIS.len();
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Left-aligns `s` in a column of `width` display columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_string(s, width);
    let fill = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(fill))
}
