//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every article leads
//! with its positional index and title, with the source file and other
//! details shown as indented context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Blog (2 articles)
//! 001 PPC vs SEO: Where Should a Small Budget Go?
//!     Source: blog/ppc-vs-seo.md
//!     2024-05-20 · Paid Ads · 3 outline entries
//!
//! Guides (2 articles)
//! 010 Set Up Your Google Business Profile
//!     Source: guides/010-google-business-profile.md
//!     2024-02-12 · Local SEO · 4 outline entries
//!
//! Categories
//!     Local SEO (2)
//!
//! Config
//!     config.toml
//!     blog/config.toml
//! ```
//!
//! Guides show their `NNN-` order number; blog posts show their position.
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Blog
//!     001 PPC vs SEO → blog/ppc-vs-seo/index.html
//! Categories
//!     Local SEO → category/local-seo/index.html
//!
//! Generated 4 articles, 3 category pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::content::Manifest;
use crate::generate::SiteSummary;
use crate::lead::FormState;
use crate::outline;
use crate::types::{ArticleKind, OutlineEntry, ShareLinks};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Scan / check
// ============================================================================

/// Format the loaded content inventory.
///
/// `config_files` lists the config files that exist, relative to the source
/// root; the caller checks the filesystem so this stays pure.
pub fn format_scan_output(manifest: &Manifest, config_files: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    for collection in &manifest.collections {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!(
            "{} ({})",
            collection.kind.label(),
            plural(collection.articles.len(), "article", "articles")
        ));
        for (i, article) in collection.articles.iter().enumerate() {
            let position = match (collection.kind, article.order) {
                (ArticleKind::Guide, Some(n)) => n as usize,
                _ => i + 1,
            };
            lines.push(format!("{} {}", format_index(position), article.title));
            lines.push(format!("{}Source: {}", indent(1), article.source_path));
            let outline_len = outline::extract_outline(&article.content).len();
            lines.push(format!(
                "{}{} · {} · {}",
                indent(1),
                article.publish_date.format("%Y-%m-%d"),
                article.category,
                plural(outline_len, "outline entry", "outline entries")
            ));
        }
    }

    let categories = manifest.categories();
    if !categories.is_empty() {
        lines.push(String::new());
        lines.push("Categories".to_string());
        for category in &categories {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                category.name,
                category.article_paths.len()
            ));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if config_files.is_empty() {
        lines.push(format!("{}(defaults)", indent(1)));
    }
    for file in config_files {
        lines.push(format!("{}{}", indent(1), file));
    }

    lines
}

/// Config files present under `source_root`, relative to it.
pub fn existing_config_files(source_root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if source_root.join("config.toml").is_file() {
        files.push("config.toml".to_string());
    }
    for kind in [ArticleKind::Blog, ArticleKind::Guide] {
        let rel = format!("{}/config.toml", kind.dir_name());
        if source_root.join(&rel).is_file() {
            files.push(rel);
        }
    }
    files
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, &existing_config_files(source_root)) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format the pages written by the generate stage, grouped by section.
pub fn format_generate_output(summary: &SiteSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let mut articles = 0;
    let mut categories = 0;

    for (label, prefix) in [
        (ArticleKind::Blog.label(), "blog/"),
        (ArticleKind::Guide.label(), "guides/"),
        ("Categories", "category/"),
    ] {
        let pages: Vec<_> = summary
            .pages
            .iter()
            .filter(|p| p.path.starts_with(prefix))
            .collect();
        if pages.is_empty() {
            continue;
        }
        lines.push(label.to_string());
        for (i, page) in pages.iter().enumerate() {
            if prefix == "category/" {
                categories += 1;
                lines.push(format!(
                    "{}{} → {}index.html",
                    indent(1),
                    page.title,
                    page.path
                ));
            } else {
                articles += 1;
                lines.push(format!(
                    "{}{} {} → {}index.html",
                    indent(1),
                    format_index(i + 1),
                    page.title,
                    page.path
                ));
            }
        }
    }

    if summary.pages.iter().any(|p| p.path.is_empty()) {
        lines.insert(0, "Home → index.html".to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(articles, "article", "articles"),
        plural(categories, "category page", "category pages")
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &SiteSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Outline / share / submit-lead
// ============================================================================

/// Format an outline as an indented tree with each entry's fragment.
///
/// ```text
/// Local SEO Basics  #local-seo-basics
///     Why Local SEO  #why-local-seo
///         Citations  #citations
/// ```
pub fn format_outline(entries: &[OutlineEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["(no headings)".to_string()];
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{}{}  #{}",
                indent(usize::from(e.level.saturating_sub(1))),
                e.title,
                e.id
            )
        })
        .collect()
}

pub fn print_outline(entries: &[OutlineEntry]) {
    for line in format_outline(entries) {
        println!("{}", line);
    }
}

pub fn format_share_links(links: &ShareLinks) -> Vec<String> {
    vec![
        format!("Twitter:  {}", links.twitter),
        format!("LinkedIn: {}", links.linkedin),
        format!("Facebook: {}", links.facebook),
        format!("Email:    {}", links.email),
    ]
}

pub fn print_share_links(links: &ShareLinks) {
    for line in format_share_links(links) {
        println!("{}", line);
    }
}

/// Format the final state of a lead submission.
pub fn format_submit_result(state: &FormState, errors: &crate::lead::ValidationErrors) -> Vec<String> {
    match state {
        FormState::Succeeded => vec!["Lead submitted".to_string()],
        FormState::Failed { message } => vec![format!("Submission failed: {message}")],
        FormState::Editing | FormState::Submitting => {
            let mut lines = vec!["Lead not sent: form is invalid".to_string()];
            for error in errors.iter() {
                lines.push(format!("{}{}: {}", indent(1), error.field, error.message));
            }
            lines
        }
    }
}

pub fn print_submit_result(state: &FormState, errors: &crate::lead::ValidationErrors) {
    for line in format_submit_result(state, errors) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
