//! Directive domain type

use std::path::Path;

/// One `@import url("...")` line of a root stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Literal path inside `url(...)`, not normalized
    pub raw_path: String,
    /// False when the directive is comment-wrapped or sits inside a block comment
    pub enabled: bool,
    /// 1-based line of the directive start
    pub line_number: Option<usize>,
}

impl Directive {
    /// Path in the form used for comparisons
    pub fn normalized_path(&self) -> String {
        crate::directive::normalize_path(&self.raw_path)
    }

    /// Last path segment of the directive
    pub fn file_name(&self) -> &str {
        Path::new(&self.raw_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.raw_path)
    }

    /// First path segment, which names the bundle namespace directory
    pub fn namespace(&self) -> String {
        namespace_of(&self.raw_path)
    }
}

/// Namespace (first segment) of a directive path after normalization
pub fn namespace_of(path: &str) -> String {
    let normalized = crate::directive::normalize_path(path);
    normalized
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
