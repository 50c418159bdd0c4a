use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of a document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingItem {
    /// Heading text with inline markup stripped.
    pub title: String,
    /// Base path of the document followed by `#slug`.
    pub url: String,
    /// Sub-sections, in document order.
    #[serde(default)]
    pub items: Vec<HeadingItem>,
}

impl HeadingItem {
    /// Number of entries in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.items.iter().map(HeadingItem::count).sum::<usize>()
    }

    /// The fragment part of `url`, without the leading `#`.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.url.split_once('#').map_or("", |(_, s)| s)
    }
}

/// Nested outline of a document's level-2 and level-3 headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    #[serde(default)]
    pub items: Vec<HeadingItem>,
}

impl TableOfContents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total entries, counting nested ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.iter().map(HeadingItem::count).sum()
    }

    /// Depth-first, left-to-right traversal. Yields `(depth, item)` with
    /// top-level entries at depth 0.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &HeadingItem)> {
        let mut stack: Vec<(usize, &HeadingItem)> =
            self.items.iter().rev().map(|i| (0, i)).collect();
        std::iter::from_fn(move || {
            let (depth, item) = stack.pop()?;
            stack.extend(item.items.iter().rev().map(|c| (depth + 1, c)));
            Some((depth, item))
        })
    }
}

/// The id a renderer attaches to a heading element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAnchor {
    pub level: u8,
    /// 1-indexed line in the raw text.
    pub line: u32,
    pub title: String,
    pub id: String,
}

/// Content collections of the site, matched by directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Post,
    Author,
    Doc,
    Page,
    Changelog,
}

impl DocKind {
    pub const ALL: [DocKind; 5] = [
        DocKind::Post,
        DocKind::Author,
        DocKind::Doc,
        DocKind::Page,
        DocKind::Changelog,
    ];

    /// Directories under the content root holding this kind.
    #[must_use]
    pub fn dirs(self) -> &'static [&'static str] {
        match self {
            DocKind::Post => &["blog"],
            DocKind::Author => &["authors"],
            DocKind::Doc => &["docs", "guides"],
            DocKind::Page => &["pages"],
            DocKind::Changelog => &["changelog"],
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKind::Post => write!(f, "post"),
            DocKind::Author => write!(f, "author"),
            DocKind::Doc => write!(f, "doc"),
            DocKind::Page => write!(f, "page"),
            DocKind::Changelog => write!(f, "changelog"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, slug: &str, items: Vec<HeadingItem>) -> HeadingItem {
        HeadingItem {
            title: title.into(),
            url: format!("#{slug}"),
            items,
        }
    }

    #[test]
    fn len_counts_nested() {
        let toc = TableOfContents {
            items: vec![
                item("A", "a", vec![item("B", "b", vec![]), item("C", "c", vec![])]),
                item("D", "d", vec![]),
            ],
        };
        assert_eq!(toc.len(), 4);
        assert!(!toc.is_empty());
    }

    #[test]
    fn walk_is_depth_first() {
        let toc = TableOfContents {
            items: vec![
                item("A", "a", vec![item("B", "b", vec![])]),
                item("C", "c", vec![]),
            ],
        };
        let seen: Vec<(usize, &str)> = toc.walk().map(|(d, i)| (d, i.title.as_str())).collect();
        assert_eq!(seen, vec![(0, "A"), (1, "B"), (0, "C")]);
    }

    #[test]
    fn slug_strips_base() {
        let i = HeadingItem {
            title: "Usage".into(),
            url: "/docs/intro#usage".into(),
            items: vec![],
        };
        assert_eq!(i.slug(), "usage");
    }

    #[test]
    fn serializes_with_items_key() {
        let toc = TableOfContents {
            items: vec![item("Intro", "intro", vec![])],
        };
        let json = serde_json::to_string(&toc).unwrap();
        assert_eq!(json, r##"{"items":[{"title":"Intro","url":"#intro","items":[]}]}"##);
    }
}
