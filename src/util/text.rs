use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// ```
/// use reels::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";

/// Truncates a string to at most `max_width` columns, appending "..." when cut.
///
/// Widths of three or fewer columns have no room for an ellipsis, so the
/// result is just the leading characters that fit. Strings that already fit
/// are returned borrowed.
///
/// ```
/// use reels::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Bubble Pop", 20), "Bubble Pop");
/// assert_eq!(truncate_to_width("Video Content", 8), "Video...");
/// assert_eq!(truncate_to_width("Game", 2), "Ga");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS.len() {
        max_width
    } else {
        max_width - ELLIPSIS.len()
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS.len() {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    }
}

/// Greedy word wrap to `width` columns.
///
/// Words wider than a full line are hard-split. A zero width yields no lines.
pub fn wrap_to_width(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in s.split_whitespace() {
        let mut word = word;
        let mut word_width = display_width(word);

        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }

        while word_width > width {
            let (head, tail) = split_at_width(word, width);
            lines.push(head.to_string());
            word = tail;
            word_width = display_width(word);
        }

        if word.is_empty() {
            continue;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_at_width(s: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            // Always take at least one char so a too-wide glyph cannot stall.
            let cut = if idx == 0 { c.len_utf8() } else { idx };
            return s.split_at(cut);
        }
        used += w;
    }
    (s, "")
}
