//! YAML front-matter of content documents.

use serde::{Deserialize, Serialize};

/// Metadata fields shared by every document kind. Kind-specific fields
/// are optional here; `title` is required everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO date (`2024-05-01`). Compared lexically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

fn default_published() -> bool {
    true
}

/// Split a leading `---` block from the body. Same delimiter rule as the
/// TOC masking: the first line and a later line are exactly `---`.
/// Returns `(yaml, body)`, or `None` when there is no closed block.
pub fn split(raw: &str) -> Option<(&str, &str)> {
    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = first.len();
    let mut pos = yaml_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&raw[yaml_start..pos], &raw[pos + line.len()..]));
        }
        pos += line.len();
    }
    None
}

/// Parse the front-matter of `raw`. Returns the metadata and the body.
pub fn parse(raw: &str) -> Result<(FrontMatter, &str), String> {
    let (yaml, body) = split(raw).ok_or_else(|| "missing front-matter block".to_string())?;
    let meta: FrontMatter = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    Ok((meta, body))
}
