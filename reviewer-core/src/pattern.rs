//! File path patterns used by the `files` section.
//!
//! Patterns are brace-expanded (`{a,b}`, nested groups and `{1..3}` ranges)
//! and each alternative is then compiled as a shell glob with the `glob`
//! crate. `*` and `?` never cross a `/`, `**` as a whole component matches any
//! number of directories, and a leading `.` must be matched literally.

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled `files` key.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    alternatives: Vec<Pattern>,
}

impl FilePattern {
    pub fn new(source: &str) -> Result<Self> {
        let alternatives = expand_braces(source)
            .with_context(|| format!("Invalid glob pattern '{}'", source))?
            .iter()
            .map(|alternative| {
                Pattern::new(alternative)
                    .with_context(|| format!("Invalid glob pattern '{}'", alternative))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The pattern as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.alternatives
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }

    /// True if any of `paths` matches.
    pub fn matches_any<S: AsRef<str>>(&self, paths: &[S]) -> bool {
        paths.iter().any(|path| self.matches(path.as_ref()))
    }
}

/// Upper bound on the alternatives a single pattern may expand to.
pub const MAX_ALTERNATIVES: usize = 1024;

/// Expand shell-style braces into the list of alternatives they describe.
///
/// Braces without a top-level comma or a numeric range are kept literally.
/// Unbalanced braces are kept literally as well. Fails once the expansion
/// would exceed `MAX_ALTERNATIVES`.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    expand_into(pattern, &mut expanded)?;
    Ok(expanded)
}

fn expand_into(pattern: &str, out: &mut Vec<String>) -> Result<()> {
    let Some((open, close)) = find_brace_pair(pattern) else {
        return push_alternative(out, pattern.to_string());
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    let alternatives = split_alternatives(body);
    if alternatives.len() > 1 {
        for alternative in alternatives {
            expand_into(&format!("{}{}{}", prefix, alternative, suffix), out)?;
        }
        return Ok(());
    }

    if let Some((from, to)) = numeric_range(body) {
        if from.abs_diff(to) >= MAX_ALTERNATIVES as u64 {
            bail!(
                "Range {{{}}} expands to more than {} alternatives",
                body,
                MAX_ALTERNATIVES
            );
        }
        let values: Vec<i64> = if from <= to {
            (from..=to).collect()
        } else {
            (to..=from).rev().collect()
        };
        for value in values {
            expand_into(&format!("{}{}{}", prefix, value, suffix), out)?;
        }
        return Ok(());
    }

    // Literal braces: expand inside and after them, but keep the braces.
    let inner = expand_braces(body)?;
    let rest = expand_braces(suffix)?;
    for inner in &inner {
        for rest in &rest {
            push_alternative(out, format!("{}{{{}}}{}", prefix, inner, rest))?;
        }
    }
    Ok(())
}

fn push_alternative(out: &mut Vec<String>, alternative: String) -> Result<()> {
    if out.len() >= MAX_ALTERNATIVES {
        bail!("Pattern expands to more than {} alternatives", MAX_ALTERNATIVES);
    }
    out.push(alternative);
    Ok(())
}

/// Byte offsets of the first `{` that has a matching `}`.
fn find_brace_pair(pattern: &str) -> Option<(usize, usize)> {
    let bytes = pattern.as_bytes();
    for (open, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'{') {
        let mut depth = 0usize;
        for (offset, byte) in bytes[open..].iter().enumerate() {
            match byte {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((open, open + offset));
                    }
                }
                _ => {}
            }
        }
    }
    None
}

fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&body[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn numeric_range(body: &str) -> Option<(i64, i64)> {
    let (from, to) = body.split_once("..")?;
    Some((from.parse().ok()?, to.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        FilePattern::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        assert!(matches("*.md", "README.md"));
        assert!(!matches("*.md", "docs/README.md"));
    }

    #[test]
    fn test_double_star_spans_directories() {
        assert!(matches("docs/**/*.md", "docs/guide/setup/install.md"));
        assert!(matches("docs/**/*.md", "docs/index.md"));
        assert!(matches("**/*.rs", "src/main.rs"));
        assert!(!matches("docs/**/*.md", "src/index.md"));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(matches("src/?.rs", "src/a.rs"));
        assert!(!matches("src/?.rs", "src/ab.rs"));
        assert!(matches("[abc].txt", "b.txt"));
        assert!(!matches("[abc].txt", "d.txt"));
        assert!(matches("[!abc].txt", "d.txt"));
    }

    #[test]
    fn test_brace_alternatives() {
        assert!(matches("src/{api,core}/*.rs", "src/api/routes.rs"));
        assert!(matches("src/{api,core}/*.rs", "src/core/lib.rs"));
        assert!(!matches("src/{api,core}/*.rs", "src/cli/main.rs"));
        assert!(matches("*.{yml,yaml}", "config.yaml"));
    }

    #[test]
    fn test_leading_dot_must_be_literal() {
        assert!(!matches("*", ".gitignore"));
        assert!(matches(".github/**/*.yml", ".github/workflows/ci.yml"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("*.MD", "README.md"));
    }

    #[test]
    fn test_expand_nested_braces() {
        assert_eq!(
            expand_braces("a{b,c{d,e}}f").unwrap(),
            vec!["abf", "acdf", "acef"]
        );
    }

    #[test]
    fn test_expand_multiple_groups() {
        assert_eq!(
            expand_braces("{a,b}/{c,d}").unwrap(),
            vec!["a/c", "a/d", "b/c", "b/d"]
        );
    }

    #[test]
    fn test_expand_numeric_range() {
        assert_eq!(
            expand_braces("v{1..3}.txt").unwrap(),
            vec!["v1.txt", "v2.txt", "v3.txt"]
        );
        assert_eq!(expand_braces("{3..1}").unwrap(), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_literal_braces_are_kept() {
        assert_eq!(expand_braces("a{b}c").unwrap(), vec!["a{b}c"]);
        assert_eq!(expand_braces("a{b").unwrap(), vec!["a{b"]);
        assert_eq!(expand_braces("a}b{c,d}").unwrap(), vec!["a}bc", "a}bd"]);
    }

    #[test]
    fn test_oversized_range_is_refused() {
        assert!(expand_braces("logs/{1..2000000}.txt").is_err());
        assert!(expand_braces("{-9223372036854775808..9223372036854775807}").is_err());
        assert!(FilePattern::new("logs/{1..2000000}.txt").is_err());
        assert_eq!(expand_braces("v{1..1024}").unwrap().len(), 1024);
        assert!(expand_braces("v{0..1024}").is_err());
    }

    #[test]
    fn test_exponential_alternatives_are_refused() {
        let pattern = "{a,b}".repeat(20);
        assert!(expand_braces(&pattern).is_err());
        assert_eq!(expand_braces(&"{a,b}".repeat(10)).unwrap().len(), 1024);
        assert!(expand_braces(&"{a,b}".repeat(11)).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(FilePattern::new("src/a**b").is_err());
    }
}
