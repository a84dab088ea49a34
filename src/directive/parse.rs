//! Directive scanning

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::normalize_path;
use crate::domain::Directive;

/// Active shape: `@import url("PATH");`
pub(super) static ACTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+url\(['"]?(.+?)['"]?\);"#).expect("active directive pattern")
});

/// Disabled shape: `/* @import url("PATH"); */`
pub(super) static DISABLED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/\*\s*@import\s+url\(['"]?(.+?)['"]?\);\s*\*/"#)
        .expect("disabled directive pattern")
});

static BLOCK_COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern"));

/// Looser form used when following references between bundle files:
/// accepts `@import "x.css";` as well as `@import url(x.css);`
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\()?['"]?([^'")]+)['"]?\)?;"#).expect("reference pattern")
});

/// A directive occurrence with its byte span
#[derive(Debug, Clone)]
pub(super) struct Occurrence {
    pub span: Range<usize>,
    pub raw_path: String,
    pub enabled: bool,
}

fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn in_block_comment(comments: &[Range<usize>], offset: usize) -> bool {
    comments
        .iter()
        .any(|range| range.start <= offset && offset < range.end)
}

/// Byte ranges of every `/* ... */` block comment
pub(super) fn block_comments(text: &str) -> Vec<Range<usize>> {
    BLOCK_COMMENT_PATTERN
        .find_iter(text)
        .map(|m| m.range())
        .collect()
}

/// Every occurrence of either shape, active pattern first, without de-duplication
pub(super) fn occurrences(text: &str) -> Vec<Occurrence> {
    let comments = block_comments(text);

    let active = ACTIVE_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(Occurrence {
            span: whole.range(),
            raw_path: caps.get(1)?.as_str().to_string(),
            enabled: !in_block_comment(&comments, whole.start()),
        })
    });

    let disabled = DISABLED_PATTERN.captures_iter(text).filter_map(|caps| {
        Some(Occurrence {
            span: caps.get(0)?.range(),
            raw_path: caps.get(1)?.as_str().to_string(),
            enabled: false,
        })
    });

    active.chain(disabled).collect()
}

/// List the directives of `text`
///
/// The first occurrence of a normalized path wins (active shape scanned before
/// the disabled shape); later duplicates are dropped. The result is ordered by
/// position in the text.
pub fn list_directives(text: &str) -> Vec<Directive> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Occurrence> = occurrences(text)
        .into_iter()
        .filter(|occ| seen.insert(normalize_path(&occ.raw_path)))
        .collect();
    kept.sort_by_key(|occ| occ.span.start);

    kept.into_iter()
        .map(|occ| Directive {
            line_number: Some(line_number(text, occ.span.start)),
            raw_path: occ.raw_path,
            enabled: occ.enabled,
        })
        .collect()
}

/// Whether `text` has a directive (active or disabled) for `path`
pub fn has_directive(text: &str, path: &str) -> bool {
    directive_state(text, path).is_some()
}

/// `Some(enabled)` for the directive of `path`, `None` if absent
pub fn directive_state(text: &str, path: &str) -> Option<bool> {
    let wanted = normalize_path(path);
    list_directives(text)
        .into_iter()
        .find(|directive| directive.normalized_path() == wanted)
        .map(|directive| directive.enabled)
}

/// Paths referenced by any `@import` in a stylesheet, in order of appearance
pub fn reference_paths(text: &str) -> Vec<String> {
    REFERENCE_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|path| !path.is_empty())
        .collect()
}
