use std::fmt;

use crate::config::Options;

/// Why no review is requested for a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The pull request is a draft and drafts are ignored.
    Draft,
    /// The title contains an ignored keyword.
    IgnoredKeyword(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "pull request is a draft"),
            Self::IgnoredKeyword(keyword) => {
                write!(f, "title contains ignored keyword '{}'", keyword)
            }
        }
    }
}

/// Check whether a review should be requested, returning the reason if not.
///
/// Keywords are matched as case-sensitive substrings of the title.
pub fn check_eligibility(title: &str, is_draft: bool, options: &Options) -> Result<(), SkipReason> {
    if options.ignore_draft && is_draft {
        return Err(SkipReason::Draft);
    }

    if let Some(keyword) = options
        .ignored_keywords
        .iter()
        .find(|keyword| title.contains(keyword.as_str()))
    {
        return Err(SkipReason::IgnoredKeyword(keyword.clone()));
    }

    Ok(())
}

pub fn should_request_review(title: &str, is_draft: bool, options: &Options) -> bool {
    check_eligibility(title, is_draft, options).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_pull_request_is_eligible() {
        assert!(should_request_review("Add caching", false, &Options::default()));
    }

    #[test]
    fn test_draft_is_skipped_by_default() {
        assert_eq!(
            check_eligibility("Add caching", true, &Options::default()),
            Err(SkipReason::Draft)
        );
    }

    #[test]
    fn test_draft_is_eligible_when_drafts_are_not_ignored() {
        let options = Options {
            ignore_draft: false,
            ..Options::default()
        };
        assert!(should_request_review("Add caching", true, &options));
    }

    #[test]
    fn test_default_keyword_suppresses_review() {
        assert_eq!(
            check_eligibility("[DO NOT REVIEW] experiment", false, &Options::default()),
            Err(SkipReason::IgnoredKeyword("DO NOT REVIEW".to_string()))
        );
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        assert!(should_request_review(
            "do not review yet",
            false,
            &Options::default()
        ));
    }

    #[test]
    fn test_custom_keywords_replace_the_default() {
        let options = Options {
            ignored_keywords: vec!["WIP".to_string(), "DRAFT".to_string()],
            ..Options::default()
        };
        assert!(!should_request_review("WIP: refactor", false, &options));
        assert!(should_request_review("DO NOT REVIEW", false, &options));
    }

    #[test]
    fn test_empty_keyword_list_never_matches() {
        let options = Options {
            ignored_keywords: Vec::new(),
            ..Options::default()
        };
        assert!(should_request_review("DO NOT REVIEW", false, &options));
    }
}
