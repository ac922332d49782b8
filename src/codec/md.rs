//! Inline markdown scanning for page references: links, wikilinks and hashtags.

use once_cell::sync::Lazy;
use pulldown_cmark::{
    CowStr, Event as MdEvent, LinkType, Options, Parser as MdParser, Tag as MdTag,
    TagEnd as MdTagEnd,
};
use regex::Regex;
use std::ops::Range;
use url::Url;

use crate::properties::PageId;

pub use pulldown_cmark;

/// `#tag` preceded by start-of-text or a character that cannot be part of a word or an entity.
static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w#&/])#([\w][\w\-/]*)").expect("static regex"));

pub fn notaza_md_options() -> Options {
    let mut md_options = Options::empty();
    // Enabled explicitly rather than through Options::all() so that new pulldown-cmark
    // extensions do not silently change what counts as a reference.
    md_options.insert(Options::ENABLE_DEFINITION_LIST);
    md_options.insert(Options::ENABLE_FOOTNOTES);
    md_options.insert(Options::ENABLE_GFM);
    md_options.insert(Options::ENABLE_MATH);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_TASKLISTS);
    md_options.insert(Options::ENABLE_WIKILINKS);
    md_options
}

/// The syntactic form an inline reference was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `[text](./page.md)`; carries the raw destination.
    Link { dest: String },
    /// `[[Page Title]]` or `[[Page Title|label]]`; carries the target title.
    WikiLink { title: String },
    /// `#page`; carries the tag without the `#`.
    Hashtag { tag: String },
}

/// A reference found in one block's content, with its byte range in that content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineReference {
    pub kind: ReferenceKind,
    pub range: Range<usize>,
}

impl InlineReference {
    /// The source text of the reference within `content`.
    pub fn fragment<'a>(&self, content: &'a str) -> &'a str {
        content.get(self.range.clone()).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
struct LinkAccumulator {
    link_type: LinkType,
    dest_url: CowStr<'static>,
    range: Range<usize>,
}

impl LinkAccumulator {
    fn new(event: &MdEvent<'_>, range: &Range<usize>) -> Option<LinkAccumulator> {
        match event {
            MdEvent::Start(MdTag::Link {
                link_type,
                dest_url,
                ..
            }) => Some(LinkAccumulator {
                link_type: *link_type,
                dest_url: dest_url.clone().into_static(),
                range: range.clone(),
            }),
            _ => None,
        }
    }

    // Returns whether event is a [MdTagEnd::Link]
    fn push(&mut self, event: &MdEvent<'_>, range: &Range<usize>) -> bool {
        self.range.end = self.range.end.max(range.end);
        matches!(event, MdEvent::End(MdTagEnd::Link))
    }

    fn into_reference(self) -> Option<InlineReference> {
        let kind = match self.link_type {
            LinkType::WikiLink { .. } => ReferenceKind::WikiLink {
                title: self.dest_url.trim().to_string(),
            },
            LinkType::Inline
            | LinkType::Reference
            | LinkType::Collapsed
            | LinkType::Shortcut
            | LinkType::Autolink => ReferenceKind::Link {
                dest: self.dest_url.to_string(),
            },
            _ => return None,
        };
        Some(InlineReference {
            kind,
            range: self.range,
        })
    }
}

fn push_hashtags(
    text: &str,
    content: &str,
    range: &Range<usize>,
    references: &mut Vec<InlineReference>,
) {
    // Text events normally map 1:1 onto their source range; when they do not (escapes,
    // entities) the whole event range is the best available location.
    let exact = content.get(range.clone()) == Some(text);
    for caps in HASHTAG.captures_iter(text) {
        let Some(tag) = caps.get(1) else { continue };
        let tag_str = tag.as_str().trim_end_matches(['/', '-']);
        if tag_str.is_empty() {
            continue;
        }
        let ref_range = if exact {
            // Include the leading '#'.
            let start = range.start + tag.start() - 1;
            start..start + tag_str.len() + 1
        } else {
            range.clone()
        };
        references.push(InlineReference {
            kind: ReferenceKind::Hashtag {
                tag: tag_str.to_string(),
            },
            range: ref_range,
        });
    }
}

/// Scan one block's content for links, wikilinks and hashtags, in source order.
///
/// Only the inline token stream is inspected: code spans, code blocks and link text never yield
/// hashtags.
pub fn scan_references(content: &str) -> Vec<InlineReference> {
    let mut references = Vec::new();
    let mut link_collector: Option<LinkAccumulator> = None;
    let mut code_depth = 0usize;

    for (event, offset) in MdParser::new_ext(content, notaza_md_options()).into_offset_iter() {
        if let Some(link_data) = LinkAccumulator::new(&event, &offset) {
            debug_assert!(link_collector.is_none());
            link_collector = Some(link_data);
            continue;
        }
        if let Some(link_data) = link_collector.as_mut() {
            if link_data.push(&event, &offset) {
                if let Some(reference) = link_collector.take().and_then(|l| l.into_reference()) {
                    references.push(reference);
                }
            }
            continue;
        }
        match &event {
            MdEvent::Start(MdTag::CodeBlock(_)) => code_depth += 1,
            MdEvent::End(MdTagEnd::CodeBlock) => code_depth = code_depth.saturating_sub(1),
            MdEvent::Text(text) if code_depth == 0 => {
                push_hashtags(text, content, &offset, &mut references)
            }
            _ => {}
        }
    }
    references
}

/// Map a link destination onto the page it points at.
///
/// Accepts `./<page>.md` and `./<page>`, ignoring any `#fragment` or `?query`. Absolute URLs and
/// anything not starting with `./` are not page references.
pub fn href_to_page_id(dest: &str) -> Option<PageId> {
    if Url::parse(dest).is_ok() {
        return None;
    }
    let relative = dest.trim().strip_prefix("./")?;
    let relative = relative
        .split(['#', '?'])
        .next()
        .unwrap_or(relative)
        .trim_end_matches('/');
    let id = relative.strip_suffix(".md").unwrap_or(relative);
    if id.is_empty() {
        None
    } else {
        Some(PageId::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn kinds(content: &str) -> Vec<ReferenceKind> {
        scan_references(content).into_iter().map(|r| r.kind).collect()
    }

    #[test]
    fn finds_inline_links() {
        let content = "see [Other page](./other.md) now";
        let refs = scan_references(content);
        assert_eq!(refs.len(), 1);
        assert_eq!(
            refs[0].kind,
            ReferenceKind::Link {
                dest: "./other.md".to_string()
            }
        );
        assert_eq!(refs[0].fragment(content), "[Other page](./other.md)");
    }

    #[test]
    fn finds_wikilinks() {
        assert_eq!(
            kinds("talked about [[Reading List]] and [[Ideas|my ideas]]"),
            vec![
                ReferenceKind::WikiLink {
                    title: "Reading List".to_string()
                },
                ReferenceKind::WikiLink {
                    title: "Ideas".to_string()
                },
            ]
        );
    }

    #[test]
    fn finds_hashtags_with_ranges() {
        let content = "todo #project/alpha and #beta.";
        let refs = scan_references(content);
        assert_eq!(
            refs.iter().map(|r| r.fragment(content)).collect::<Vec<_>>(),
            vec!["#project/alpha", "#beta"]
        );
        assert_eq!(
            refs[0].kind,
            ReferenceKind::Hashtag {
                tag: "project/alpha".to_string()
            }
        );
    }

    #[test]
    fn ignores_hashtags_in_code_and_headings() {
        assert!(kinds("run `git log #1234` first").is_empty());
        assert!(kinds("# A heading").is_empty());
        assert!(kinds("written in C#sharp").is_empty());
    }

    #[test]
    fn hashtag_inside_link_text_is_not_separate() {
        assert_eq!(
            kinds("[#tag](./target.md)"),
            vec![ReferenceKind::Link {
                dest: "./target.md".to_string()
            }]
        );
    }

    #[test]
    fn href_mapping() {
        assert_eq!(href_to_page_id("./a.md"), Some(PageId::from("a")));
        assert_eq!(href_to_page_id("./a"), Some(PageId::from("a")));
        assert_eq!(
            href_to_page_id("./journal/2021.md#today"),
            Some(PageId::from("journal/2021"))
        );
        assert_eq!(href_to_page_id("https://example.com/a.md"), None);
        assert_eq!(href_to_page_id("mailto:me@example.com"), None);
        assert_eq!(href_to_page_id("a.md"), None);
        assert_eq!(href_to_page_id("./"), None);
    }
}
