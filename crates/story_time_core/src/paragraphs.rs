//! crates/story_time_core/src/paragraphs.rs
//!
//! Splits free-text story content into the paragraphs shown one per page.

/// Splits `content` into trimmed, non-empty paragraphs.
///
/// Paragraphs are separated by one or more blank (empty or whitespace-only)
/// lines. If that yields nothing, single newlines are tried, and as a last
/// resort the whole string becomes the only paragraph, so the result is
/// never empty.
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let by_blank_lines = split_on_blank_lines(content);
    if !by_blank_lines.is_empty() {
        return by_blank_lines;
    }

    let by_lines: Vec<String> = content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if !by_lines.is_empty() {
        return by_lines;
    }

    vec![content.to_string()]
}

fn split_on_blank_lines(content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        if line.trim().is_empty() {
            push_paragraph(&mut paragraphs, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_paragraph(&mut paragraphs, &current);

    paragraphs
}

fn push_paragraph(paragraphs: &mut Vec<String>, lines: &[&str]) {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
}
