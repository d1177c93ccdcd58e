// src/util/text.rs

/// First non-empty line of free text, trimmed.
///
/// # Examples
///
/// ```
/// use notehub::util::text::first_line;
///
/// assert_eq!(first_line("\n  Buy milk  \nand eggs"), "Buy milk");
/// ```
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// One-line preview of note content for list rows
pub fn preview(content: &str, max_chars: usize) -> String {
    let line = first_line(content);
    let more = content.trim().lines().filter(|l| !l.trim().is_empty()).count() > 1;
    if more && line.chars().count() < max_chars {
        format!("{}…", line)
    } else {
        truncate(line, max_chars)
    }
}
