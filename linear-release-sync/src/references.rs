//! Pull request reference extraction from release text.
//!
//! Release bodies and generated release notes mention pull requests in three
//! shapes, all of which are recognized and normalized to canonical URLs:
//!
//! - full URLs: `https://github.com/acme/widgets/pull/47`
//! - bare references: `#45` (not glued to a word, so `issue#123abc` is ignored)
//! - qualified references: `acme/widgets#45`, optionally in parentheses
//!
//! Only references to the configured repository are kept.

use crate::pull_requests::{canonical_pull_request_url, PullRequestSet};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn re_full_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)https?://github\.com/([\w.-]+)/([\w.-]+)/pull/(\d+)\b")
            .expect("full URL pattern is valid")
    })
}

fn re_bare() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\W)#(\d+)\b").expect("bare reference pattern is valid"))
}

fn re_qualified() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Leading class keeps `my-acme/widgets#1` from matching as `acme/widgets#1`
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\w./-])\(?([\w.-]+)/([\w.-]+)#(\d+)\b\)?")
            .expect("qualified reference pattern is valid")
    })
}

/// Extracts every pull request of `owner/repo` referenced in `text`.
///
/// Absent or empty text yields an empty set. An empty result is not an error:
/// the caller decides whether the text was simply uninformative.
#[must_use]
pub fn extract_pull_request_urls(text: Option<&str>, owner: &str, repo: &str) -> PullRequestSet {
    let mut urls = PullRequestSet::new();
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return urls;
    };

    for caps in re_full_url().captures_iter(text) {
        if let Some(number) = qualified_number(&caps, owner, repo) {
            urls.insert(canonical_pull_request_url(owner, repo, number));
        }
    }

    for caps in re_qualified().captures_iter(text) {
        if let Some(number) = qualified_number(&caps, owner, repo) {
            urls.insert(canonical_pull_request_url(owner, repo, number));
        }
    }

    for caps in re_bare().captures_iter(text) {
        if let Some(number) = parse_number(&caps[1]) {
            urls.insert(canonical_pull_request_url(owner, repo, number));
        }
    }

    urls
}

/// Returns the number captured in group 3 when groups 1 and 2 name `owner/repo`.
fn qualified_number(caps: &Captures<'_>, owner: &str, repo: &str) -> Option<u64> {
    if caps[1].eq_ignore_ascii_case(owner) && caps[2].eq_ignore_ascii_case(repo) {
        parse_number(&caps[3])
    } else {
        None
    }
}

fn parse_number(digits: &str) -> Option<u64> {
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}
