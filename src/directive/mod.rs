//! Activation directives of the root stylesheet
//!
//! The root stylesheet activates customizations with lines of the form
//! `@import url("PATH");`. A directive is disabled by wrapping it in a block
//! comment: `/* @import url("PATH"); */`. Everything else in the file is
//! opaque text that must survive every edit byte for byte.
//!
//! All functions here are pure text transformations:
//!
//! - [`list_directives`] / [`has_directive`]: query
//! - [`add_directive`] / [`toggle_directive`] / [`remove_directive`]: edit
//!
//! Paths are always compared through [`normalize_path`].

mod edit;
mod parse;

#[cfg(test)]
mod tests;

pub use edit::{add_directive, is_toggleable, remove_directive, toggle_directive};
pub use parse::{directive_state, has_directive, list_directives, reference_paths};

/// Normalize a directive path for comparison
///
/// Backslashes become forward slashes, surrounding whitespace is trimmed and a
/// single leading `./` is stripped.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.trim();
    path.strip_prefix("./").unwrap_or(path).trim().to_string()
}

/// Render an active directive for `path`
pub fn format_directive(path: &str) -> String {
    format!("@import url(\"{path}\");")
}

/// Line ending used by `text` (`\r\n` if it contains any, else `\n`)
pub(crate) fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}
