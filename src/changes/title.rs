//! Title derivation for changelog fragments

use crate::types::{ReservedHeading, TitledChangelog};
use chrono::{DateTime, Utc};
use regex::Regex;

/// Sortable minute-precision timestamp used for untitled changelogs
pub const TITLE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// First <h3> element; non-greedy so it stops at the first closing tag
static TITLE_HEADING_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"<h3>(.*?)</h3>").expect("Should compile: TITLE_HEADING_RE")
});

/// Split a fragment into a title and the remaining content
///
/// The first `<h3>` becomes the title and is removed from the content (first
/// occurrence only). When there is no `<h3>`, or it is a reserved section name
/// such as `Fixed`, the fragment has no title of its own: `fallback_title` is
/// used and the content is returned untouched.
///
/// Only the first heading is ever considered; a reserved first heading is not
/// skipped in favour of a later one.
pub fn resolve_title(fragment: &str, fallback_title: &str) -> TitledChangelog {
    let heading = TITLE_HEADING_RE
        .captures(fragment)
        .and_then(|cap| Some((cap.get(0)?.as_str(), cap.get(1)?.as_str())))
        .filter(|(_, text)| !ReservedHeading::is_reserved(text));

    match heading {
        Some((element, text)) => TitledChangelog {
            title: text.to_string(),
            content: fragment.replacen(element, "", 1),
        },
        None => TitledChangelog {
            title: fallback_title.to_string(),
            content: fragment.to_string(),
        },
    }
}

/// [`resolve_title`] with the current UTC time as the fallback title
pub fn resolve_title_now(fragment: &str) -> TitledChangelog {
    resolve_title(fragment, &format_title_timestamp(&Utc::now()))
}

pub fn format_title_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TITLE_TIMESTAMP_FORMAT).to_string()
}
