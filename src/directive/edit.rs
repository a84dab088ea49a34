//! Directive editing
//!
//! Edits only touch the directive being changed; the rest of the text is
//! copied through untouched.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::parse::{block_comments, occurrences};
use super::{format_directive, has_directive, line_ending, normalize_path};

/// Either shape of one directive. Groups: 1 comment opener, 2 bare directive,
/// 3 path, 4 comment closer.
static EDIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(/\*\s*)?(@import\s+url\(['"]?(.+?)['"]?\);)(\s*\*/)?"#)
        .expect("directive edit pattern")
});

fn matching_captures<'t>(text: &'t str, path: &str) -> impl Iterator<Item = Captures<'t>> {
    let wanted = normalize_path(path);
    EDIT_PATTERN
        .captures_iter(text)
        .filter(move |caps| caps.get(3).is_some_and(|m| normalize_path(m.as_str()) == wanted))
}

/// Add an active directive for `path`
///
/// No-op if a directive for the path already exists. The new line goes right
/// after the line holding the last existing directive; without any directive
/// it goes on top, followed by a blank line.
pub fn add_directive(text: &str, path: &str) -> String {
    if has_directive(text, path) {
        return text.to_string();
    }

    let eol = line_ending(text);
    let directive = format_directive(path);

    let Some(last_end) = occurrences(text).iter().map(|occ| occ.span.end).max() else {
        return format!("{directive}{eol}{eol}{text}");
    };

    let line_end = text[last_end..]
        .find('\n')
        .map_or(text.len(), |offset| last_end + offset);
    let insert_at = if line_end > 0 && text.as_bytes()[line_end - 1] == b'\r' {
        line_end - 1
    } else {
        line_end
    };

    format!(
        "{}{eol}{directive}{}",
        &text[..insert_at],
        &text[insert_at..]
    )
}

/// The edit flipping the first toggleable directive for `path`
///
/// A directive inside a block comment other than its own `/* */` wrapper is
/// not toggleable: wrapping it would close the outer comment early.
fn toggle_edit(text: &str, path: &str) -> Option<(Range<usize>, String)> {
    let comments = block_comments(text);
    let inside = |offset: usize, own_start: Option<usize>| {
        comments
            .iter()
            .any(|r| r.start <= offset && offset < r.end && Some(r.start) != own_start)
    };

    matching_captures(text, path).find_map(|caps| {
        let whole = caps.get(0)?;
        let bare = caps.get(2)?;
        if caps.get(1).is_some() && caps.get(4).is_some() {
            (!inside(whole.start(), Some(whole.start())))
                .then(|| (whole.range(), bare.as_str().to_string()))
        } else {
            (!inside(bare.start(), None)).then(|| (bare.range(), format!("/* {} */", bare.as_str())))
        }
    })
}

/// Whether `path` has a directive that [`toggle_directive`] can flip
pub fn is_toggleable(text: &str, path: &str) -> bool {
    toggle_edit(text, path).is_some()
}

/// Flip the directive for `path` between active and comment-wrapped
///
/// Only the first toggleable directive changes. Text without one for the
/// path is returned unchanged.
pub fn toggle_directive(text: &str, path: &str) -> String {
    let Some((range, replacement)) = toggle_edit(text, path) else {
        return text.to_string();
    };

    let mut result = String::with_capacity(text.len() + 6);
    result.push_str(&text[..range.start]);
    result.push_str(&replacement);
    result.push_str(&text[range.end..]);
    result
}

/// Remove every directive for `path`, active or disabled
///
/// The whole line holding a directive is deleted together with its line
/// terminator.
pub fn remove_directive(text: &str, path: &str) -> String {
    let mut lines: Vec<Range<usize>> = matching_captures(text, path)
        .filter_map(|caps| caps.get(0))
        .map(|m| line_span(text, m.start(), m.end()))
        .collect();
    if lines.is_empty() {
        return text.to_string();
    }

    // Several directives on one line share a span
    lines.sort_by_key(|span| span.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(lines.len());
    for span in lines {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let mut result = text.to_string();
    for span in merged.into_iter().rev() {
        result.replace_range(span, "");
    }
    result
}

fn line_span(text: &str, start: usize, end: usize) -> Range<usize> {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i + 1);
    line_start..line_end
}
