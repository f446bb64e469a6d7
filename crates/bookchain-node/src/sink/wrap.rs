//! Ticket word wrapping.

/// Wrap `text` into lines of at most `chars_per_line` characters, padded with
/// blank lines up to `minimum_lines`.
///
/// Greedy fill over whitespace-delimited tokens. A token longer than the
/// limit cannot be split: the pending line is flushed first, then the token
/// becomes a line of its own, so token order is preserved. The padding floor
/// gives every printed ticket the same vertical footprint regardless of text
/// length.
#[must_use]
pub fn word_wrap(text: &str, chars_per_line: usize, minimum_lines: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if word.len() > chars_per_line {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.to_owned());
        } else if current.is_empty() {
            current.push_str(word);
        } else if current.len() + word.len() + 1 <= chars_per_line {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    while lines.len() < minimum_lines {
        lines.push(String::new());
    }

    lines.join("\n")
}
