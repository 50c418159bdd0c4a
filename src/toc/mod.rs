//! Table-of-contents extraction.
//!
//! Raw markdown goes through four passes: [`mask`] hides front-matter,
//! fenced code and paragraph lines inside multi-line code spans; [`heading`] finds ATX headings in
//! what is left; [`inline`] reduces heading content to plain text; [`slug`]
//! assigns document-unique anchor ids. [`tree`] then nests the level 2 and
//! 3 entries into the outline.
//!
//! Pure and synchronous. Nothing here fails: input that does not parse is
//! skipped, and a document without sections yields an empty outline.

pub mod heading;
pub mod inline;
pub mod mask;
pub mod slug;
pub mod tree;

use std::ops::RangeInclusive;

use crate::types::{HeadingAnchor, HeadingItem, TableOfContents};

/// Heading levels that appear in the outline. Level 1 is the page title.
pub const OUTLINE_LEVELS: RangeInclusive<u8> = 2..=3;

/// Outline of `raw` with bare `#slug` urls.
#[must_use]
pub fn build(raw: &str) -> TableOfContents {
    build_with_base(raw, "")
}

/// Outline of `raw` with urls of the form `{base}#slug`.
#[must_use]
pub fn build_with_base(raw: &str, base: &str) -> TableOfContents {
    let entries = heading_anchors(raw)
        .into_iter()
        .filter(|a| OUTLINE_LEVELS.contains(&a.level))
        .map(|a| {
            let item = HeadingItem {
                title: a.title,
                url: format!("{base}#{}", a.id),
                items: Vec::new(),
            };
            (a.level, item)
        });

    TableOfContents {
        items: tree::assemble(entries),
    }
}

/// Ids for every heading of `raw`, all levels, in document order.
///
/// This is what a renderer attaches to heading elements. Ids are unique
/// across the whole document, so a level-1 title can push a section with
/// the same text to a suffixed id.
#[must_use]
pub fn heading_anchors(raw: &str) -> Vec<HeadingAnchor> {
    let mut slugger = slug::Slugger::new();

    heading::scan(raw)
        .into_iter()
        .filter_map(|h| {
            let title = inline::plain_text(h.text);
            if title.is_empty() {
                return None;
            }
            let id = slugger.slug(&title);
            Some(HeadingAnchor {
                level: h.level,
                line: h.line,
                title,
                id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(toc: &TableOfContents) -> Vec<String> {
        toc.walk()
            .map(|(d, i)| format!("{d} {} {}", i.title, i.url))
            .collect()
    }

    #[test]
    fn reference_document() {
        let toc = build("# Title\n\n## Intro\n\nSome text\n\n### Background\n\n## Usage\n");
        let expected = TableOfContents {
            items: vec![
                HeadingItem {
                    title: "Intro".into(),
                    url: "#intro".into(),
                    items: vec![HeadingItem {
                        title: "Background".into(),
                        url: "#background".into(),
                        items: vec![],
                    }],
                },
                HeadingItem {
                    title: "Usage".into(),
                    url: "#usage".into(),
                    items: vec![],
                },
            ],
        };
        assert_eq!(toc, expected);
    }

    #[test]
    fn duplicate_sections() {
        let toc = build("## Setup\n\n## Setup\n");
        let urls: Vec<&str> = toc.items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["#setup", "#setup-1"]);
    }

    #[test]
    fn fenced_heading_is_ignored() {
        assert!(build("```\n## Not A Heading\n```").is_empty());
    }

    #[test]
    fn empty_document() {
        assert!(build("").is_empty());
        assert!(build("\n\n   \n").is_empty());
    }

    #[test]
    fn only_title_and_deep_headings() {
        assert!(build("# Title\n#### Deep\n##### Deeper\n").is_empty());
    }

    #[test]
    fn deep_headings_do_not_break_nesting() {
        let toc = build("## A\n#### skip\n### B\n");
        assert_eq!(shape(&toc), vec!["0 A #a", "1 B #b"]);
    }

    #[test]
    fn subsection_before_any_section_is_promoted() {
        let toc = build("### Early\n## Main\n### Late\n");
        assert_eq!(shape(&toc), vec!["0 Early #early", "0 Main #main", "1 Late #late"]);
    }

    #[test]
    fn inline_markup_stripped_from_title() {
        let toc = build("## The `build` **function**\n");
        assert_eq!(toc.items[0].title, "The build function");
        assert_eq!(toc.items[0].url, "#the-build-function");
    }

    #[test]
    fn empty_titles_are_dropped() {
        let toc = build("##\n## [](/x)\n## <br/>\n## Real\n");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc.items[0].title, "Real");
    }

    #[test]
    fn title_slug_is_shared_with_sections() {
        let toc = build("# Setup\n## Setup\n");
        assert_eq!(toc.items[0].url, "#setup-1");
    }

    #[test]
    fn base_path_prefixes_urls() {
        let toc = build_with_base("## Usage\n", "/docs/intro");
        assert_eq!(toc.items[0].url, "/docs/intro#usage");
    }

    #[test]
    fn front_matter_is_skipped() {
        let toc = build("---\ntitle: Doc\n## fake: yes\n---\n## Real\n");
        assert_eq!(toc.len(), 1);
        assert_eq!(toc.items[0].title, "Real");
    }

    #[test]
    fn code_span_cannot_swallow_a_heading() {
        let toc = build("Use `foo\n## Real\nbar` here\n");
        assert_eq!(shape(&toc), vec!["0 Real #real"]);
    }

    #[test]
    fn stray_ticks_in_headings_stay_literal() {
        let toc = build("## Use the ` key\n## Next ` step\n");
        assert_eq!(shape(&toc), vec!["0 Use the ` key #use-the-key", "0 Next ` step #next-step"]);
    }

    #[test]
    fn unpaired_emphasis_markers_are_kept() {
        let toc = build("## Compute 5*3\n## a_b and *c\n");
        assert_eq!(
            shape(&toc),
            vec!["0 Compute 5*3 #compute-5-3", "0 a_b and *c #a-b-and-c"]
        );
    }

    #[test]
    fn unclosed_fence_hides_the_rest() {
        let toc = build("## A\n```js\n## B\n## C\n");
        assert_eq!(toc.len(), 1);
    }

    #[test]
    fn anchors_cover_every_level() {
        let anchors = heading_anchors("# T\n## A\n#### D\n");
        let ids: Vec<(u8, u32, &str)> = anchors
            .iter()
            .map(|a| (a.level, a.line, a.id.as_str()))
            .collect();
        assert_eq!(ids, vec![(1, 1, "t"), (2, 2, "a"), (4, 3, "d")]);
    }

    #[test]
    fn every_toc_fragment_has_a_matching_anchor() {
        let raw = "# Guide\n## Setup\n### Setup\n#### Setup\n## Setup\n### Notes\n";
        let anchors = heading_anchors(raw);
        for (_, item) in build(raw).walk() {
            assert!(
                anchors.iter().any(|a| a.id == item.slug() && a.title == item.title),
                "no anchor for {}",
                item.url
            );
        }
    }
}
