//! `{Placeholder}` binding
//!
//! Binding replaces every `{Name}` whose name is present in the
//! [`ProjectContext`] and leaves every other token verbatim, so a later pass
//! (prompt values) or the user can still see what was not filled in. It never
//! fails and has no side effects.
//!
//! # Syntax
//!
//! - `{Name}` - substitutes the value of `Name`
//! - `\{` - renders a literal `{`
//! - `{A}/{B}` - the `/` between two variables becomes the platform separator

use crate::context::{self, ProjectContext};
use regex::Regex;
use std::path::MAIN_SEPARATOR;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^\\])\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Every placeholder name the engine knows how to fill, for completion menus
pub const PLACEHOLDER_NAMES: &[&str] = &[
    context::FILE_PATH,
    context::FILE_NAME,
    context::FILE_EXT,
    context::FILE_EXT_LC,
    context::FILE_NAME_NO_EXT,
    context::FILE_DIR_PATH,
    context::FILE_DIR,
    context::FILE_DIR_PROJ_REL,
    context::PROJ_PATH,
    context::PROJ_NAME,
    context::BUILD_DIR,
    context::BUILD_TARGET,
    context::RUN_EXEC,
    context::RUN_EXEC_DIR_PATH,
    crate::prompt::PROMPT_STRING_1,
    crate::prompt::PROMPT_STRING_2,
];

/// Replace every resolvable `{Name}` in `input` with its context value
pub fn bind(input: &str, context: &ProjectContext) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    // True while the last thing written was a substituted variable
    let mut after_var = false;

    while let Some(ch) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("\\{") {
            out.push('{');
            rest = tail;
            after_var = false;
            continue;
        }

        if ch == '{' {
            if let Some((name, tail)) = split_token(rest) {
                match context.get(name) {
                    Some(value) => {
                        out.push_str(value);
                        after_var = true;
                    }
                    None => {
                        out.push_str(&rest[..name.len() + 2]);
                        after_var = false;
                    }
                }
                rest = tail;
                continue;
            }
        }

        let next_resolves = || split_token(&rest[1..]).is_some_and(|(name, _)| context.get(name).is_some());
        if ch == '/' && after_var && next_resolves() {
            out.push(MAIN_SEPARATOR);
        } else {
            out.push(ch);
        }
        after_var = false;
        rest = &rest[ch.len_utf8()..];
    }

    out
}

/// Names referenced as `{Name}` in `input`, in order of appearance, escaped braces excluded
pub fn placeholders_in(input: &str) -> Vec<String> {
    let mut names = Vec::new();
    // Matches consume the preceding character, so scan from each match's token start
    let mut offset = 0;
    while let Some(caps) = PLACEHOLDER_RE.captures(&input[offset..]) {
        let Some(name) = caps.get(1) else { break };
        names.push(name.as_str().to_string());
        offset += name.end() + 1;
    }
    names
}

/// Split `{Name}rest` into `Name` and `rest` when `Name` is an identifier
fn split_token(input: &str) -> Option<(&str, &str)> {
    let body = input.strip_prefix('{')?;
    let end = body.find('}')?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());
    valid.then(|| (name, &body[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ProjectContext {
        let mut ctx = ProjectContext::new();
        ctx.set("FilePath", "/src/app/main.go");
        ctx.set("FileDirPath", "/src/app");
        ctx.set("FileName", "main.go");
        ctx.set("Empty", "");
        ctx
    }

    #[test]
    fn test_resolves_known_tokens() {
        assert_eq!(bind("gofmt -w {FilePath}", &ctx()), "gofmt -w /src/app/main.go");
        assert_eq!(bind("{FileName}{FileName}", &ctx()), "main.gomain.go");
        assert_eq!(bind("before{Empty}after", &ctx()), "beforeafter");
    }

    #[test]
    fn test_unknown_tokens_stay_verbatim() {
        assert_eq!(bind("{PromptString1}", &ctx()), "{PromptString1}");
        assert_eq!(
            bind("commit -m {PromptString1} {FileName}", &ctx()),
            "commit -m {PromptString1} main.go"
        );
    }

    #[test]
    fn test_non_identifier_braces_untouched() {
        assert_eq!(bind("awk '{print $1}'", &ctx()), "awk '{print $1}'");
        assert_eq!(bind("{}", &ctx()), "{}");
        assert_eq!(bind("open { brace", &ctx()), "open { brace");
        assert_eq!(bind("{1abc}", &ctx()), "{1abc}");
    }

    #[test]
    fn test_escaped_brace() {
        assert_eq!(bind(r"\{FilePath}", &ctx()), "{FilePath}");
        assert_eq!(bind(r"a \{ b", &ctx()), "a { b");
    }

    #[test]
    fn test_separator_between_variables() {
        let expected = format!("/src/app{}main.go", MAIN_SEPARATOR);
        assert_eq!(bind("{FileDirPath}/{FileName}", &ctx()), expected);
        // Only a separator directly between two variables is rewritten
        assert_eq!(bind("{FileDirPath}/x/{FileName}", &ctx()), "/src/app/x/main.go");
    }

    #[test]
    fn test_separator_kept_before_unresolved_token() {
        assert_eq!(bind("{FileDirPath}/{PromptString1}", &ctx()), "/src/app/{PromptString1}");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(bind("été {FileName} ✓", &ctx()), "été main.go ✓");
    }

    #[test]
    fn test_binding_resolves_all_known_occurrences() {
        let input = "{FilePath} {FileDirPath} {Other} {FilePath}";
        let bound = bind(input, &ctx());
        assert!(!bound.contains("{FilePath}"));
        assert!(!bound.contains("{FileDirPath}"));
        assert!(bound.contains("{Other}"));
    }

    #[test]
    fn test_placeholders_in() {
        assert_eq!(
            placeholders_in("{A} x {B_2}{A} \\{C} {}"),
            vec!["A".to_string(), "B_2".to_string(), "A".to_string()]
        );
        assert!(placeholders_in("no tokens").is_empty());
    }
}
