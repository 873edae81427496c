//! Tag ids carried by pull request labels

use crate::types::{IdSet, PullRequest};
use regex::Regex;

// Label descriptions opt into a WordPress tag with e.g. "ChangelogTagID: 42"
static LABEL_TAG_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"ChangelogTagID:\s*(\d+)").expect("Should compile: LABEL_TAG_RE")
});

/// Tag ids declared in the pull request's label descriptions
///
/// Each description contributes at most its first declaration.
pub fn label_tag_ids(pr: &PullRequest) -> IdSet {
    pr.label_descriptions()
        .filter_map(|description| {
            LABEL_TAG_RE
                .captures(description)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok())
        })
        .collect()
}

/// Base tags followed by each contributor's label tags, deduplicated
pub fn merge_tags<'a, I>(base: &IdSet, contributed: I) -> IdSet
where
    I: IntoIterator<Item = &'a IdSet>,
{
    let mut tags = base.clone();
    for ids in contributed {
        tags.extend(ids.iter().copied());
    }
    tags
}
