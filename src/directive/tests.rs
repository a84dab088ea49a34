use super::*;

const SAMPLE: &str = "/* userChrome.css */\n\n@import url(\"theme/userChrome.css\");\n/* @import url(\"tabs.css\"); */\n\n#nav-bar { color: red; }\n";

#[test]
fn test_normalize_path_equivalence() {
    assert_eq!(normalize_path("a\\b.css"), "a/b.css");
    assert_eq!(normalize_path("./a/b.css"), "a/b.css");
    assert_eq!(normalize_path("a/b.css"), "a/b.css");
    assert_eq!(normalize_path("  ./a/b.css "), "a/b.css");
    assert_eq!(normalize_path(".\\a\\b.css"), "a/b.css");
}

#[test]
fn test_normalize_strips_only_one_prefix() {
    assert_eq!(normalize_path("././a.css"), "./a.css");
}

#[test]
fn test_list_directives_both_shapes() {
    let directives = list_directives(SAMPLE);
    assert_eq!(directives.len(), 2);

    assert_eq!(directives[0].raw_path, "theme/userChrome.css");
    assert!(directives[0].enabled);
    assert_eq!(directives[0].line_number, Some(3));

    assert_eq!(directives[1].raw_path, "tabs.css");
    assert!(!directives[1].enabled);
    assert_eq!(directives[1].line_number, Some(4));
}

#[test]
fn test_list_directives_single_and_double_quotes() {
    let text = "@import url('a.css');\n@import url(\"b.css\");\n@import url(c.css);\n";
    let paths: Vec<String> = list_directives(text)
        .into_iter()
        .map(|d| d.raw_path)
        .collect();
    assert_eq!(paths, vec!["a.css", "b.css", "c.css"]);
}

#[test]
fn test_list_directives_first_occurrence_wins() {
    let text = "@import url(\"./a.css\");\n/* @import url(\"a.css\"); */\n@import url(\"a.css\");\n";
    let directives = list_directives(text);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].raw_path, "./a.css");
    assert!(directives[0].enabled);
    assert_eq!(directives[0].line_number, Some(1));
}

#[test]
fn test_list_directives_inside_unrelated_comment() {
    let text = "/*\n  old setup:\n  @import url(\"legacy.css\");\n*/\n@import url(\"new.css\");\n";
    let directives = list_directives(text);
    assert_eq!(directives.len(), 2);
    assert_eq!(directives[0].raw_path, "legacy.css");
    assert!(!directives[0].enabled);
    assert_eq!(directives[0].line_number, Some(3));
    assert!(directives[1].enabled);
}

#[test]
fn test_list_directives_mid_line() {
    let text = "#a { } @import url(\"mid.css\"); #b { }\n";
    let directives = list_directives(text);
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].raw_path, "mid.css");
}

#[test]
fn test_has_directive_normalizes() {
    assert!(has_directive(SAMPLE, "./theme/userChrome.css"));
    assert!(has_directive(SAMPLE, "theme\\userChrome.css"));
    assert!(has_directive(SAMPLE, "tabs.css"));
    assert!(!has_directive(SAMPLE, "other.css"));
}

#[test]
fn test_directive_state() {
    assert_eq!(directive_state(SAMPLE, "theme/userChrome.css"), Some(true));
    assert_eq!(directive_state(SAMPLE, "tabs.css"), Some(false));
    assert_eq!(directive_state(SAMPLE, "nope.css"), None);
}

#[test]
fn test_add_directive_then_has() {
    for text in ["", SAMPLE, "#nav-bar { }\n", "a\r\nb\r\n"] {
        let updated = add_directive(text, "new/userChrome.css");
        assert!(has_directive(&updated, "new/userChrome.css"));
    }
}

#[test]
fn test_add_directive_is_idempotent() {
    assert_eq!(add_directive(SAMPLE, "theme/userChrome.css"), SAMPLE);
    assert_eq!(add_directive(SAMPLE, "./tabs.css"), SAMPLE);
}

#[test]
fn test_add_directive_after_last_directive() {
    let updated = add_directive(SAMPLE, "extra.css");
    assert_eq!(
        updated,
        "/* userChrome.css */\n\n@import url(\"theme/userChrome.css\");\n/* @import url(\"tabs.css\"); */\n@import url(\"extra.css\");\n\n#nav-bar { color: red; }\n"
    );
}

#[test]
fn test_add_directive_without_existing_directives() {
    let text = "#nav-bar { color: red; }\n";
    assert_eq!(
        add_directive(text, "a.css"),
        "@import url(\"a.css\");\n\n#nav-bar { color: red; }\n"
    );
    assert_eq!(add_directive("", "a.css"), "@import url(\"a.css\");\n\n");
}

#[test]
fn test_add_directive_at_end_without_newline() {
    let text = "@import url(\"a.css\");";
    assert_eq!(
        add_directive(text, "b.css"),
        "@import url(\"a.css\");\n@import url(\"b.css\");"
    );
}

#[test]
fn test_add_directive_preserves_crlf() {
    let text = "@import url(\"a.css\");\r\n#x { }\r\n";
    assert_eq!(
        add_directive(text, "b.css"),
        "@import url(\"a.css\");\r\n@import url(\"b.css\");\r\n#x { }\r\n"
    );
    assert_eq!(
        add_directive("#x { }\r\n", "b.css"),
        "@import url(\"b.css\");\r\n\r\n#x { }\r\n"
    );
}

#[test]
fn test_toggle_directive_disables_and_enables() {
    let disabled = toggle_directive(SAMPLE, "theme/userChrome.css");
    assert!(disabled.contains("/* @import url(\"theme/userChrome.css\"); */"));
    assert_eq!(directive_state(&disabled, "theme/userChrome.css"), Some(false));

    let enabled = toggle_directive(SAMPLE, "tabs.css");
    assert!(enabled.contains("\n@import url(\"tabs.css\");\n"));
    assert_eq!(directive_state(&enabled, "tabs.css"), Some(true));
}

#[test]
fn test_toggle_directive_twice_restores_text() {
    for path in ["theme/userChrome.css", "tabs.css", "./tabs.css", "theme\\userChrome.css"] {
        let once = toggle_directive(SAMPLE, path);
        assert_ne!(once, SAMPLE);
        assert_eq!(toggle_directive(&once, path), SAMPLE);
    }
}

#[test]
fn test_toggle_directive_single_quotes_round_trip() {
    let text = "@import url('a.css');\n";
    let once = toggle_directive(text, "a.css");
    assert_eq!(once, "/* @import url('a.css'); */\n");
    assert_eq!(toggle_directive(&once, "a.css"), text);
}

#[test]
fn test_toggle_directive_flips_only_one() {
    let text = "@import url(\"a.css\");\n@import url(\"b.css\");\n";
    let updated = toggle_directive(text, "b.css");
    assert_eq!(updated, "@import url(\"a.css\");\n/* @import url(\"b.css\"); */\n");
}

#[test]
fn test_toggle_skips_directive_inside_other_comment() {
    let text = "/*\n  old setup:\n  @import url(\"legacy.css\");\n*/\n#x { }\n";
    assert!(has_directive(text, "legacy.css"));
    assert!(!is_toggleable(text, "legacy.css"));
    assert_eq!(toggle_directive(text, "legacy.css"), text);

    let nested = "/* notes /* @import url(\"a.css\"); */ more */\n";
    assert!(!is_toggleable(nested, "a.css"));
    assert_eq!(toggle_directive(nested, "a.css"), nested);
}

#[test]
fn test_toggle_uses_first_toggleable_directive() {
    let text = "/* was: @import url(\"a.css\"); */\n@import url(\"a.css\");\n";
    let updated = toggle_directive(text, "a.css");
    assert_eq!(
        updated,
        "/* was: @import url(\"a.css\"); */\n/* @import url(\"a.css\"); */\n"
    );
    assert!(is_toggleable(SAMPLE, "tabs.css"));
}

#[test]
fn test_toggle_missing_directive_is_noop() {
    assert_eq!(toggle_directive(SAMPLE, "missing.css"), SAMPLE);
}

#[test]
fn test_remove_directive_active() {
    let updated = remove_directive(SAMPLE, "theme/userChrome.css");
    assert_eq!(
        updated,
        "/* userChrome.css */\n\n/* @import url(\"tabs.css\"); */\n\n#nav-bar { color: red; }\n"
    );
}

#[test]
fn test_remove_directive_disabled() {
    let updated = remove_directive(SAMPLE, "./tabs.css");
    assert!(!has_directive(&updated, "tabs.css"));
    assert!(has_directive(&updated, "theme/userChrome.css"));
    assert!(updated.ends_with("\n\n#nav-bar { color: red; }\n"));
}

#[test]
fn test_remove_directive_removes_duplicates() {
    let text = "@import url(\"a.css\");\n#x { }\n@import url(\"./a.css\");\n/* @import url(\"a\\\\..\"); */\n";
    let updated = remove_directive(text, "a.css");
    assert!(
        list_directives(&updated)
            .iter()
            .all(|d| d.normalized_path() != "a.css")
    );
    assert!(updated.starts_with("#x { }\n"));
}

#[test]
fn test_remove_directive_last_line_without_newline() {
    let text = "#x { }\n@import url(\"a.css\");";
    assert_eq!(remove_directive(text, "a.css"), "#x { }\n");
}

#[test]
fn test_remove_directive_two_on_one_line() {
    let text = "@import url(\"a.css\"); @import url(\"./a.css\");\nrest\n";
    assert_eq!(remove_directive(text, "a.css"), "rest\n");
}

#[test]
fn test_remove_missing_directive_is_noop() {
    assert_eq!(remove_directive(SAMPLE, "missing.css"), SAMPLE);
}

#[test]
fn test_reference_paths_loose_forms() {
    let text = "@import \"partials/a.css\";\n@import url(partials/b.css);\n@import url('c.css');\n";
    assert_eq!(
        reference_paths(text),
        vec!["partials/a.css", "partials/b.css", "c.css"]
    );
}
