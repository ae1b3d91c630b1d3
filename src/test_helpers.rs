//! Shared test utilities for the agency-site test suite.
//!
//! Provides fixture setup and lookup helpers that work with load-stage data
//! structures (`Manifest`, `Article`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = load(tmp.path()).unwrap();
//!
//! let guide = find_article(&manifest, "google-business-profile");
//! assert_eq!(guide.order, Some(10));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::Manifest;
use crate::types::{Article, ArticleKind};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panicking with a clear message on miss
// =========================================================================

/// Find an article by slug in any collection. Panics if not found.
pub fn find_article<'a>(manifest: &'a Manifest, slug: &str) -> &'a Article {
    manifest
        .articles()
        .find(|a| a.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.articles().map(|a| a.slug.as_str()).collect();
            panic!("article '{slug}' not found. Available: {slugs:?}")
        })
}

/// Slugs of one collection in manifest order.
pub fn article_slugs(manifest: &Manifest, kind: ArticleKind) -> Vec<&str> {
    manifest
        .collection(kind)
        .map(|c| c.articles.iter().map(|a| a.slug.as_str()).collect())
        .unwrap_or_default()
}

/// A minimal article for unit tests that don't touch the filesystem.
pub fn sample_article(slug: &str, content: &str) -> Article {
    Article {
        slug: slug.to_string(),
        title: "Local SEO Basics".to_string(),
        excerpt: "What every storefront should fix first.".to_string(),
        content: content.to_string(),
        author: "Dana Reyes".to_string(),
        publish_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        tags: vec!["seo".to_string(), "local".to_string()],
        category: "Local SEO".to_string(),
        kind: ArticleKind::Blog,
        source_path: format!("blog/{slug}.md"),
        order: None,
    }
}
