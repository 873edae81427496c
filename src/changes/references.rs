//! Pull request references in commit messages and release notes

use indexmap::IndexSet;
use regex::Regex;

/// Insertion-ordered, deduplicated pull request numbers
pub type ReferenceSet = IndexSet<u64>;

// Squash-merge suffix `(#123)` or a merge commit subject line
static SINGLE_REFERENCE_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"\(#(\d+)\)|(?m:^Merge pull request #(\d+))")
        .expect("Should compile: SINGLE_REFERENCE_RE")
});
// Pull request links, e.g. in generated release notes
static PULL_LINK_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"/pull/(\d+)").expect("Should compile: PULL_LINK_RE"));

/// Collect every pull request number a message refers to
///
/// The first `(#N)` or leading `Merge pull request #N` contributes one number;
/// every `/pull/N` link contributes as well. Numbers too large for `u64` are
/// ignored.
pub fn extract_references(message: &str) -> ReferenceSet {
    let mut references = ReferenceSet::new();

    if let Some(number) = SINGLE_REFERENCE_RE.captures(message).and_then(|cap| {
        cap.get(1)
            .or_else(|| cap.get(2))
            .and_then(|m| m.as_str().parse().ok())
    }) {
        references.insert(number);
    }

    references.extend(
        PULL_LINK_RE
            .captures_iter(message)
            .filter_map(|cap| cap.get(1).and_then(|m| m.as_str().parse::<u64>().ok())),
    );

    references
}

/// Union of the references of several messages, in first-seen order
pub fn extract_all_references<'a, I>(messages: I) -> ReferenceSet
where
    I: IntoIterator<Item = &'a str>,
{
    messages
        .into_iter()
        .flat_map(extract_references)
        .collect()
}
