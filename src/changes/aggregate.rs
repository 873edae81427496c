//! Merging of concatenated changelog fragments by heading
//!
//! When several pull requests contribute to one changelog, each fragment tends
//! to carry its own `Fixed`/`Added`/... headings. This module walks the parsed
//! markup and regroups every item under a single instance of its heading,
//! keeping headings in the order they first appear.

use crate::log_debug;
use crate::types::ReservedHeading;
use indexmap::IndexMap;
use scraper::{ElementRef, Html};

/// When to regroup a fragment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationMode {
    /// Only when a reserved heading appears more than once
    Auto,
    /// Always; the caller knows the fragment has several sources
    Forced,
}

/// Result of an aggregation attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Items were regrouped under unique headings
    Merged(String),
    /// Nothing to merge; the input is returned as-is
    Unchanged(String),
    /// No heading structure could be recovered; the input is returned as-is
    Unparseable(String),
}

impl MergeOutcome {
    /// The fragment to publish, whatever happened
    pub fn into_fragment(self) -> String {
        match self {
            Self::Merged(fragment) | Self::Unchanged(fragment) | Self::Unparseable(fragment) => {
                fragment
            }
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Items collected per heading, in first-seen heading order
#[derive(Debug, Default)]
pub struct HeadingGroups {
    groups: IndexMap<String, Vec<String>>,
}

impl HeadingGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a heading; re-registering keeps its original position
    pub fn start_heading(&mut self, heading: &str) {
        if !self.groups.contains_key(heading) {
            self.groups.insert(heading.to_string(), Vec::new());
        }
    }

    /// Append to a heading registered with [`Self::start_heading`]
    fn push_item(&mut self, heading: &str, item: String) {
        if let Some(items) = self.groups.get_mut(heading) {
            items.push(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serialize as one `<h3>` + `<ul>` block per non-empty heading
    pub fn render(&self) -> String {
        self.groups
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(heading, items)| {
                let mut block = format!("<h3>{}</h3>\n<ul>\n", html_escape::encode_text(heading));
                for item in items {
                    block.push_str("<li>");
                    block.push_str(item);
                    block.push_str("</li>\n");
                }
                block.push_str("</ul>");
                block
            })
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

/// Whether any reserved heading occurs more than once as an exact `<h3>` element
pub fn has_duplicate_reserved_headings(fragment: &str) -> bool {
    ReservedHeading::ALL.iter().any(|heading| {
        let element = format!("<h3>{}</h3>", heading.name());
        fragment.matches(element.as_str()).count() > 1
    })
}

/// Merge items that share a heading
///
/// In [`AggregationMode::Auto`] the fragment is only rewritten when a reserved
/// heading is duplicated. Content before the first heading, and elements other
/// than lists and paragraphs, do not survive a merge.
pub fn aggregate_headings(fragment: &str, mode: AggregationMode) -> MergeOutcome {
    if mode == AggregationMode::Auto && !has_duplicate_reserved_headings(fragment) {
        return MergeOutcome::Unchanged(fragment.to_string());
    }

    match collect_heading_groups(fragment) {
        Some(groups) => MergeOutcome::Merged(groups.render()),
        None => {
            log_debug!("No heading structure found in fragment; leaving it unmerged");
            MergeOutcome::Unparseable(fragment.to_string())
        }
    }
}

/// Walk the top-level elements of `fragment`; `None` when no `<h3>` is found
fn collect_heading_groups(fragment: &str) -> Option<HeadingGroups> {
    let document = Html::parse_fragment(fragment);
    let mut groups = HeadingGroups::new();
    let mut current: Option<String> = None;

    for element in document.root_element().children().filter_map(ElementRef::wrap) {
        match element.value().name() {
            "h3" => {
                let heading = element.text().collect::<String>();
                groups.start_heading(&heading);
                current = Some(heading);
            }
            "ul" | "ol" => {
                let Some(heading) = current.as_deref() else {
                    continue;
                };
                for item in element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|child| child.value().name() == "li")
                {
                    groups.push_item(heading, item_markup(item));
                }
            }
            "p" => {
                if let Some(heading) = current.as_deref() {
                    groups.push_item(heading, item_markup(element));
                }
            }
            _ => {}
        }
    }

    if groups.is_empty() { None } else { Some(groups) }
}

/// Item content with every tag dropped except `<code>` elements
fn item_markup(element: ElementRef<'_>) -> String {
    let mut markup = String::new();
    push_item_markup(element, &mut markup);
    markup.trim().to_string()
}

fn push_item_markup(element: ElementRef<'_>, markup: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            markup.push_str(&html_escape::encode_text(&**text));
        } else if let Some(child) = ElementRef::wrap(child) {
            if child.value().name() == "code" {
                markup.push_str(&child.html());
            } else {
                push_item_markup(child, markup);
            }
        }
    }
}
