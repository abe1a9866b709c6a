//! Text shaping helpers for block rendering.

use crate::tui::settings::{THINK_CLOSE, THINK_OPEN};

/// Leading lines of a block plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview<'a> {
    pub lines: Vec<&'a str>,
    pub hidden: usize,
}

/// Single-cell width approximation.
pub fn visible_width(s: &str) -> usize {
    s.chars().count()
}

pub fn clip_to_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// First `max_lines` lines of `text`, or every line when `max_lines` is `None`.
pub fn preview(text: &str, max_lines: Option<usize>) -> Preview<'_> {
    let lines: Vec<&str> = text.lines().collect();
    let shown = max_lines.map_or(lines.len(), |max| lines.len().min(max));
    Preview {
        hidden: lines.len() - shown,
        lines: lines[..shown].to_vec(),
    }
}

/// Word-wrap one line to `max_width` columns, hard-breaking long words.
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return Vec::new();
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut width = 0usize;

    for word in line.split(' ') {
        let word_width = visible_width(word);
        let sep = usize::from(width > 0);
        if width + sep + word_width <= max_width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            width += sep + word_width;
            continue;
        }
        if width > 0 {
            rows.push(std::mem::take(&mut current));
            width = 0;
        }
        let mut chars = word.chars().peekable();
        while chars.peek().is_some() {
            let piece: String = chars.by_ref().take(max_width).collect();
            let piece_width = visible_width(&piece);
            if piece_width == max_width && chars.peek().is_some() {
                rows.push(piece);
            } else {
                current = piece;
                width = piece_width;
            }
        }
    }
    rows.push(current);
    rows
}

/// Split a reply into its `<think>` reasoning section and the answer.
///
/// Only a leading reasoning section is recognized. An unterminated
/// `<think>` is treated as reasoning to the end of the reply.
pub fn split_reasoning(reply: &str) -> (Option<&str>, &str) {
    let trimmed = reply.trim_start();
    let Some(rest) = trimmed.strip_prefix(THINK_OPEN) else {
        return (None, reply);
    };
    match rest.find(THINK_CLOSE) {
        Some(end) => (
            Some(rest[..end].trim()),
            rest[end + THINK_CLOSE.len()..].trim_start(),
        ),
        None => (Some(rest.trim()), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_hidden_lines() {
        let p = preview("1\n2\n3\n4", Some(3));
        assert_eq!(p.lines, vec!["1", "2", "3"]);
        assert_eq!(p.hidden, 1);
        assert_eq!(preview("a\nb", None).hidden, 0);
        assert!(preview("", Some(2)).lines.is_empty());
    }

    #[test]
    fn wrap_prefers_spaces() {
        assert_eq!(wrap_line("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_line("", 7), vec![""]);
    }

    #[test]
    fn wrap_hard_breaks_long_words() {
        assert_eq!(wrap_line("superlongtoken", 5), vec!["super", "longt", "oken"]);
        assert_eq!(wrap_line("ab superlong", 5), vec!["ab", "super", "long"]);
    }

    #[test]
    fn clip_counts_chars() {
        assert_eq!(clip_to_width("héllo", 2), "hé");
        assert_eq!(visible_width("héllo"), 5);
    }

    #[test]
    fn reasoning_is_split_from_answer() {
        let (thinking, answer) = split_reasoning("<think>\nhmm, easy\n</think>\n\nIt's 4.");
        assert_eq!(thinking, Some("hmm, easy"));
        assert_eq!(answer, "It's 4.");
    }

    #[test]
    fn reply_without_reasoning_is_unchanged() {
        assert_eq!(split_reasoning("plain"), (None, "plain"));
        assert_eq!(split_reasoning("<think>still going"), (Some("still going"), ""));
    }
}
