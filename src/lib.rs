//! Table-of-contents extraction for markdown content sites.
//!
//! [`toc::build`] turns a document's raw text into a nested outline of its
//! level 2 and 3 headings. [`toc::heading_anchors`] gives the ids a
//! renderer attaches to every heading; both share one slug algorithm, so a
//! TOC fragment always names an existing element.
//!
//! ```
//! let toc = pagetoc::toc::build("# Title\n## Intro\n### Background\n## Usage\n");
//! assert_eq!(toc.items.len(), 2);
//! assert_eq!(toc.items[0].items[0].url, "#background");
//! ```

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod format;
pub mod serve;
pub mod toc;
pub mod types;

pub use cache::TocCache;
pub use error::PagetocError;
pub use toc::{build, build_with_base, heading_anchors};
pub use types::{HeadingAnchor, HeadingItem, TableOfContents};
