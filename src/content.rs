//! Content loading and manifest generation.
//!
//! Stage 1 of the build pipeline. Walks the content directory, parses each
//! Markdown file's front matter into an [`Article`], and produces a
//! [`Manifest`] the generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                             # Content root
//! ├── config.toml                      # Site configuration (optional)
//! ├── blog/
//! │   ├── config.toml                  # Blog overrides (optional)
//! │   ├── local-seo-basics.md          # Blog post
//! │   └── ppc-vs-seo.md
//! └── guides/
//!     ├── 010-google-business-profile.md   # Guide 1
//!     └── 020-review-strategy.md           # Guide 2
//! ```
//!
//! ## Front Matter
//!
//! Every article starts with a TOML block fenced by `+++` lines:
//!
//! ```text
//! +++
//! title = "Local SEO Basics"
//! excerpt = "What every storefront should fix first."
//! author = "Dana Reyes"
//! publish_date = 2024-03-04
//! tags = ["seo", "local"]
//! category = "Local SEO"
//! +++
//!
//! ## Why Local SEO
//! ...
//! ```
//!
//! `slug` may be set explicitly; otherwise it is the file stem with any
//! `NNN-` prefix removed. `draft = true` skips the file.
//!
//! ## Ordering
//!
//! - **Blog**: newest first, ties broken by slug
//! - **Guides**: by `NNN-` prefix, unnumbered guides last
//!
//! ## Validation
//!
//! - Slugs must be URL-safe (`[a-z0-9-]`) and unique within a collection
//! - Every category must normalize to a non-empty id

use crate::config::{self, SiteConfig};
use crate::slug;
use crate::types::{Article, ArticleKind, Category};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Missing +++ front matter in {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid publish_date {value:?} in {path}")]
    InvalidDate { path: PathBuf, value: String },
    #[error("Slug {slug:?} in {path} is not URL-safe (use a-z, 0-9 and -)")]
    InvalidSlug { path: PathBuf, slug: String },
    #[error("Duplicate slug {slug:?} in {kind}: {first} and {second}")]
    DuplicateSlug {
        kind: ArticleKind,
        slug: String,
        first: String,
        second: String,
    },
    #[error("Category {category:?} in {path} has no usable characters")]
    InvalidCategory { path: PathBuf, category: String },
}

/// Manifest output from the load stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub collections: Vec<Collection>,
    pub config: SiteConfig,
}

/// One article collection (blog or guides) with its effective config.
#[derive(Debug, Serialize, Deserialize)]
pub struct Collection {
    pub kind: ArticleKind,
    /// Root config with the collection's `config.toml` merged on top.
    pub config: SiteConfig,
    pub articles: Vec<Article>,
}

impl Manifest {
    /// All articles, blog first, in collection order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.collections.iter().flat_map(|c| c.articles.iter())
    }

    pub fn collection(&self, kind: ArticleKind) -> Option<&Collection> {
        self.collections.iter().find(|c| c.kind == kind)
    }

    /// Categories sorted by id, each listing its articles in collection order.
    pub fn categories(&self) -> Vec<Category> {
        let mut by_id: BTreeMap<String, Category> = BTreeMap::new();
        for article in self.articles() {
            let id = slug::normalize(&article.category);
            by_id
                .entry(id.clone())
                .or_insert_with(|| Category {
                    id,
                    name: article.category.clone(),
                    article_paths: Vec::new(),
                })
                .article_paths
                .push(article.path());
        }
        by_id.into_values().collect()
    }
}

/// Front matter as written by authors.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FrontMatter {
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    author: Option<String>,
    /// TOML date (`2024-03-04`) or string (`"2024-03-04"`).
    publish_date: toml::Value,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    draft: bool,
}

const DEFAULT_AUTHOR: &str = "Editorial Team";
const DEFAULT_CATEGORY: &str = "General";
const EXCERPT_CHARS: usize = 160;

/// Load every collection under `root` into a manifest.
pub fn load(root: &Path) -> Result<Manifest, ContentError> {
    let base = config::stock_defaults_value()?;
    let root_overlay = config::load_raw_config(root)?;
    let root_value = match root_overlay {
        Some(ov) => config::merge_toml(base, ov),
        None => base,
    };
    let config = config::resolve_config(root_value.clone(), None)?;

    let mut collections = Vec::new();
    for kind in [ArticleKind::Blog, ArticleKind::Guide] {
        let dir = root.join(kind.dir_name());
        let collection_config =
            config::resolve_config(root_value.clone(), config::load_raw_config(&dir)?)?;
        let articles = if dir.is_dir() {
            load_collection(root, &dir, kind)?
        } else {
            debug!(dir = %dir.display(), "collection directory missing");
            Vec::new()
        };
        info!(%kind, count = articles.len(), "loaded collection");
        collections.push(Collection {
            kind,
            config: collection_config,
            articles,
        });
    }

    Ok(Manifest {
        collections,
        config,
    })
}

fn load_collection(
    root: &Path,
    dir: &Path,
    kind: ArticleKind,
) -> Result<Vec<Article>, ContentError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_md = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if entry.file_type().is_file() && is_md && !hidden {
            paths.push(path.to_path_buf());
        }
    }

    let mut articles: Vec<Article> = Vec::new();
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for path in paths {
        let text = fs::read_to_string(&path)?;
        let Some(article) = parse_article(&text, &path, root, kind)? else {
            debug!(path = %path.display(), "skipping draft");
            continue;
        };
        if let Some(first) = seen.get(&article.slug) {
            return Err(ContentError::DuplicateSlug {
                kind,
                slug: article.slug,
                first: first.clone(),
                second: article.source_path,
            });
        }
        seen.insert(article.slug.clone(), article.source_path.clone());
        articles.push(article);
    }

    sort_articles(&mut articles, kind);
    Ok(articles)
}

fn sort_articles(articles: &mut [Article], kind: ArticleKind) {
    match kind {
        ArticleKind::Blog => articles.sort_by(|a, b| {
            b.publish_date
                .cmp(&a.publish_date)
                .then_with(|| a.slug.cmp(&b.slug))
        }),
        ArticleKind::Guide => {
            articles.sort_by_key(|a| (a.order.unwrap_or(u32::MAX), a.slug.clone()))
        }
    }
}

/// Split `+++` front matter from the body. Returns `None` when the text does
/// not open with a front matter fence or the fence is never closed.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_end = text.find('\n')?;
    if text[..first_end].trim_end() != "+++" {
        return None;
    }
    let rest = &text[first_end + 1..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "+++" {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front, body));
        }
        offset += line.len();
    }
    None
}

/// Parse one Markdown file into an article. Returns `Ok(None)` for drafts.
fn parse_article(
    text: &str,
    path: &Path,
    root: &Path,
    kind: ArticleKind,
) -> Result<Option<Article>, ContentError> {
    let (front, body) =
        split_front_matter(text).ok_or_else(|| ContentError::MissingFrontMatter(path.into()))?;
    let meta: FrontMatter = toml::from_str(front).map_err(|source| ContentError::FrontMatter {
        path: path.into(),
        source,
    })?;
    if meta.draft {
        return Ok(None);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = slug::parse_entry_name(&stem);
    let slug = meta.slug.unwrap_or(parsed.slug);
    if !slug::is_url_safe(&slug) {
        return Err(ContentError::InvalidSlug {
            path: path.into(),
            slug,
        });
    }

    let category = meta
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    if slug::normalize(&category).is_empty() {
        return Err(ContentError::InvalidCategory {
            path: path.into(),
            category,
        });
    }

    let publish_date = parse_date(&meta.publish_date).ok_or_else(|| ContentError::InvalidDate {
        path: path.into(),
        value: meta.publish_date.to_string(),
    })?;

    let content = body.trim_start_matches(['\r', '\n']).to_string();
    let excerpt = meta
        .excerpt
        .unwrap_or_else(|| derive_excerpt(&content, EXCERPT_CHARS));
    let source_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();

    Ok(Some(Article {
        slug,
        title: meta.title,
        excerpt,
        content,
        author: meta.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        publish_date,
        tags: meta.tags,
        category,
        kind,
        source_path,
        order: parsed.number,
    }))
}

fn parse_date(value: &toml::Value) -> Option<NaiveDate> {
    let text = match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Datetime(dt) => dt.to_string(),
        _ => return None,
    };
    NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()
}

/// First prose paragraph of a Markdown body, truncated at a word boundary.
///
/// Headings, fences, lists and blockquotes are skipped.
fn derive_excerpt(markdown: &str, max_chars: usize) -> String {
    let mut paragraph = Vec::new();
    let mut in_fence = false;
    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.is_empty() {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        let structural = trimmed.starts_with('#')
            || trimmed.starts_with('>')
            || trimmed.starts_with("- ")
            || trimmed.starts_with("* ")
            || trimmed.starts_with('|');
        if structural {
            if !paragraph.is_empty() {
                break;
            }
            continue;
        }
        paragraph.push(trimmed);
    }

    let text = paragraph.join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{}…", cut.trim_end_matches([',', '.', ';', ':']))
}
