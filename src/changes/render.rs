//! Markdown rendering of source descriptions
//!
//! Descriptions are rendered to HTML before the changelog section is located,
//! so markers and fragments are always expressed in HTML.

use super::section::extract_section;
use crate::config::ChangelogConfig;
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;

// HTML comments, including multi-line template hints
static HTML_COMMENT_RE: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Should compile: HTML_COMMENT_RE"));

/// Remove every `<!-- ... -->` comment from raw markdown
pub fn strip_html_comments(body: &str) -> String {
    HTML_COMMENT_RE.replace_all(body, "").into_owned()
}

/// Render markdown into HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Extract the rendered changelog fragment from a description
///
/// Returns `None` when the description has no changelog section. When
/// `append_self_link` is set and the fragment does not already mention
/// `html_url`, a rendered link to it is appended.
pub fn changelog_html(
    body: &str,
    html_url: &str,
    config: &ChangelogConfig,
    append_self_link: bool,
) -> Option<String> {
    let description_html = markdown_to_html(&strip_html_comments(body));
    let mut fragment = extract_section(&description_html, &config.start_marker, &config.end_marker);

    if fragment.trim().is_empty() {
        return None;
    }

    if append_self_link && !html_url.is_empty() && !fragment.contains(html_url) {
        fragment.push_str("\n\n");
        fragment.push_str(&markdown_to_html(&format!("<{html_url}>")));
    }

    Some(fragment.trim().to_string())
}
