//! Placement of extracted files inside a bundle namespace

/// Top-level directory shared by every path, like `repo-main/` in a
/// repository archive
///
/// Only reported when each path lies below that directory; a lone file at
/// the top level means there is no wrapper.
pub fn common_wrapper(relative_paths: &[String]) -> Option<String> {
    let mut wrapper: Option<&str> = None;
    for path in relative_paths {
        let (first, rest) = path.split_once('/')?;
        if first.is_empty() || rest.is_empty() {
            return None;
        }
        match wrapper {
            None => wrapper = Some(first),
            Some(existing) if existing == first => {}
            Some(_) => return None,
        }
    }
    wrapper.map(str::to_string)
}

/// `relative_path` without the wrapper segment
pub fn strip_wrapper<'a>(relative_path: &'a str, wrapper: Option<&str>) -> &'a str {
    wrapper
        .and_then(|w| relative_path.strip_prefix(w))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_common_wrapper_detected() {
        let rels = paths(&["repo-main/userChrome.css", "repo-main/partials/a.css"]);
        assert_eq!(common_wrapper(&rels), Some("repo-main".to_string()));
    }

    #[test]
    fn test_no_wrapper_with_mixed_tops() {
        let rels = paths(&["a/userChrome.css", "b/a.css"]);
        assert_eq!(common_wrapper(&rels), None);
    }

    #[test]
    fn test_no_wrapper_with_top_level_file() {
        let rels = paths(&["userChrome.css", "partials/a.css"]);
        assert_eq!(common_wrapper(&rels), None);
        assert_eq!(common_wrapper(&paths(&["single.css"])), None);
        assert_eq!(common_wrapper(&[]), None);
    }

    #[test]
    fn test_strip_wrapper() {
        assert_eq!(
            strip_wrapper("repo-main/partials/a.css", Some("repo-main")),
            "partials/a.css"
        );
        assert_eq!(strip_wrapper("repo-mainx/a.css", Some("repo-main")), "repo-mainx/a.css");
        assert_eq!(strip_wrapper("a.css", None), "a.css");
    }
}
