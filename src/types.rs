//! Shared types used across loading, rendering and generation.
//!
//! Articles are serialized into the scan manifest (`agency-site scan`) and
//! read back by `agency-site generate`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collection an article belongs to.
///
/// Blog posts are ordered newest first; guides follow their `NNN-` file
/// prefix so they can be read as a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleKind {
    Blog,
    Guide,
}

impl ArticleKind {
    /// Directory name under the content root and under the output root.
    pub fn dir_name(self) -> &'static str {
        match self {
            ArticleKind::Blog => "blog",
            ArticleKind::Guide => "guides",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArticleKind::Blog => "Blog",
            ArticleKind::Guide => "Guides",
        }
    }
}

impl fmt::Display for ArticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A blog post or guide loaded from a Markdown file.
///
/// Built once by the content loader and only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// URL-safe, unique within its collection.
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Raw Markdown body (front matter removed).
    pub content: String,
    pub author: String,
    pub publish_date: NaiveDate,
    pub tags: Vec<String>,
    pub category: String,
    pub kind: ArticleKind,
    /// Path relative to the content root, for diagnostics.
    pub source_path: String,
    /// Ordering key from an `NNN-` file prefix (guides).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Article {
    /// Site-relative path of the article page, without the base path.
    pub fn path(&self) -> String {
        format!("{}/{}/", self.kind.dir_name(), self.slug)
    }
}

/// One heading in an article's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Heading id, shared with the rendered heading element.
    pub id: String,
    pub title: String,
    /// 1, 2 or 3.
    pub level: u8,
}

/// Pre-built "share this page" URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
    pub email: String,
}

/// A category listing page, derived from the `category` of the articles in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Normalized category name, used in `category/{id}/`.
    pub id: String,
    /// Display name as written in front matter.
    pub name: String,
    /// Articles in this category, as site-relative paths.
    pub article_paths: Vec<String>,
}

impl Category {
    pub fn path(&self) -> String {
        format!("category/{}/", self.id)
    }
}
