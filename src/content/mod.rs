//! Content store: the markdown documents of the site, their metadata and
//! computed urls.
//!
//! Loading walks the content root, classifies files by collection
//! directory, then reads and parses them in parallel. A document with bad
//! front-matter is logged and skipped; the rest still load.

pub mod frontmatter;

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;

use crate::cache::TocCache;
use crate::error::PagetocError;
use crate::types::{DocKind, TableOfContents};

pub use frontmatter::FrontMatter;

/// Directories never descended into.
pub(crate) const SKIP_DIRS: &[&str] = &[".git", "node_modules", "target", ".next", ".contentlayer"];

/// A parsed content document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub kind: DocKind,
    /// Path relative to the content root, extension removed, `/`-separated.
    pub flattened_path: String,
    pub url: String,
    #[serde(flatten)]
    pub meta: FrontMatter,
    /// Markdown after the front-matter block.
    #[serde(skip)]
    pub body: String,
}

impl Document {
    /// Outline of the body, with urls under the document's own url.
    pub fn toc(&self, cache: &TocCache) -> Arc<TableOfContents> {
        cache.get_or_build(&self.body, self.base_path())
    }

    /// The url without a fragment. Changelog entries live on one page.
    #[must_use]
    pub fn base_path(&self) -> &str {
        self.url.split_once('#').map_or(self.url.as_str(), |(p, _)| p)
    }
}

/// Flattened path of `rel`: extension stripped, separators normalized.
#[must_use]
pub fn flattened_path(rel: &Path) -> String {
    rel.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public url of a document of `kind` at `flattened`.
#[must_use]
pub fn compute_url(kind: DocKind, flattened: &str) -> String {
    match kind {
        DocKind::Post | DocKind::Page => format!("/{flattened}"),
        DocKind::Author => {
            let slug = flattened.strip_prefix("authors/").unwrap_or(flattened);
            format!("/authors/{slug}")
        }
        DocKind::Doc => {
            let last = flattened.rsplit('/').next().unwrap_or(flattened);
            format!("/docs/{last}")
        }
        DocKind::Changelog => {
            let slug = flattened.strip_prefix("changelog/").unwrap_or(flattened);
            format!("/changelog#{slug}")
        }
    }
}

struct KindMatcher {
    sets: Vec<(DocKind, GlobSet)>,
}

impl KindMatcher {
    fn new() -> Result<Self, globset::Error> {
        let mut sets = Vec::with_capacity(DocKind::ALL.len());
        for kind in DocKind::ALL {
            let mut builder = GlobSetBuilder::new();
            for dir in kind.dirs() {
                builder.add(Glob::new(&format!("{dir}/**/*.{{md,mdx}}"))?);
            }
            sets.push((kind, builder.build()?));
        }
        Ok(Self { sets })
    }

    fn classify(&self, rel: &Path) -> Option<DocKind> {
        self.sets
            .iter()
            .find(|(_, set)| set.is_match(rel))
            .map(|(kind, _)| *kind)
    }
}

/// All documents under one content root.
#[derive(Debug, Default)]
pub struct ContentStore {
    docs: Vec<Document>,
}

impl ContentStore {
    /// Load every document under `root`.
    pub fn load(root: &Path) -> Result<Self, PagetocError> {
        if !root.is_dir() {
            return Err(PagetocError::NotFound {
                path: root.to_path_buf(),
            });
        }
        let matcher = KindMatcher::new().map_err(|e| PagetocError::Config {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let files: Vec<(DocKind, PathBuf, PathBuf)> = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .parents(false)
            .filter_entry(|entry| {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if let Some(name) = entry.file_name().to_str() {
                        return !SKIP_DIRS.contains(&name);
                    }
                }
                true
            })
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.file_type()?.is_file() {
                    return None;
                }
                let path = entry.into_path();
                let rel = path.strip_prefix(root).ok()?.to_path_buf();
                let kind = matcher.classify(&rel)?;
                Some((kind, path, rel))
            })
            .collect();

        let mut docs: Vec<Document> = files
            .par_iter()
            .filter_map(|(kind, path, rel)| match read_document(*kind, path, rel) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!("skipping document: {e}");
                    None
                }
            })
            .collect();
        docs.sort_by(|a, b| a.flattened_path.cmp(&b.flattened_path));

        tracing::debug!(root = %root.display(), count = docs.len(), "content loaded");
        Ok(Self { docs })
    }

    #[must_use]
    pub fn from_documents(mut docs: Vec<Document>) -> Self {
        docs.sort_by(|a, b| a.flattened_path.cmp(&b.flattened_path));
        Self { docs }
    }

    /// Every loaded document, published or not, by flattened path.
    #[must_use]
    pub fn all(&self) -> &[Document] {
        &self.docs
    }

    /// Published documents of `kind` in listing order: docs by `order`
    /// then title, posts and changelog newest first, the rest by path.
    #[must_use]
    pub fn list(&self, kind: DocKind) -> Vec<&Document> {
        let mut out: Vec<&Document> = self
            .docs
            .iter()
            .filter(|d| d.kind == kind && d.meta.published)
            .collect();
        out.sort_by(|a, b| listing_order(kind, a, b));
        out
    }

    /// Look up a document by route slug, e.g. `getting-started` for
    /// `docs/getting-started.mdx`. Unpublished documents are still found.
    #[must_use]
    pub fn find(&self, kind: DocKind, slug: &str) -> Option<&Document> {
        let slug = slug.trim_matches('/');
        self.docs.iter().find(|d| {
            d.kind == kind
                && kind.dirs().iter().any(|dir| {
                    d.flattened_path
                        .strip_prefix(dir)
                        .and_then(|rest| rest.strip_prefix('/'))
                        == Some(slug)
                })
        })
    }
}

fn listing_order(kind: DocKind, a: &Document, b: &Document) -> Ordering {
    match kind {
        DocKind::Doc => a
            .meta
            .order
            .unwrap_or(0)
            .cmp(&b.meta.order.unwrap_or(0))
            .then_with(|| a.meta.title.cmp(&b.meta.title)),
        DocKind::Post | DocKind::Changelog => b.meta.date.cmp(&a.meta.date),
        DocKind::Author | DocKind::Page => a.flattened_path.cmp(&b.flattened_path),
    }
}

fn read_document(kind: DocKind, path: &Path, rel: &Path) -> Result<Document, PagetocError> {
    let raw = fs::read_to_string(path).map_err(|e| PagetocError::io(path, e))?;
    let (meta, body) = frontmatter::parse(&raw).map_err(|reason| PagetocError::FrontMatter {
        path: path.to_path_buf(),
        reason,
    })?;
    let flattened = flattened_path(rel);
    Ok(Document {
        kind,
        url: compute_url(kind, &flattened),
        flattened_path: flattened,
        meta,
        body: body.to_string(),
    })
}
