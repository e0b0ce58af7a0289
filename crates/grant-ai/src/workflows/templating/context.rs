//! Line-window extraction used to disambiguate placeholders whose own text
//! carries no usable signal (yes/no boxes, "to be completed" markers).

/// Return the line containing the first occurrence of `token` plus up to
/// `window` lines either side, joined with newlines. `None` when the token
/// does not appear at all.
pub(crate) fn line_context(text: &str, token: &str, window: usize) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let offset = text.find(token)?;
    let line_index = text[..offset].matches('\n').count();

    let lines: Vec<&str> = text.lines().collect();
    let start = line_index.saturating_sub(window);
    let end = (line_index + window + 1).min(lines.len());

    Some(lines[start..end].join("\n"))
}
