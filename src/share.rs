//! Social share URLs for an article.
//!
//! Each value is percent-encoded on its own with the `encodeURIComponent`
//! character set before it is placed into a platform template, so a `?`, `&`
//! or `=` inside a title or URL can never be mistaken for a query separator.

use crate::types::{Article, ShareLinks};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters `encodeURIComponent` leaves alone: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Build the four share URLs for a page.
pub fn build_share_links(title: &str, excerpt: &str, canonical_url: &str) -> ShareLinks {
    let title = encode(title);
    let excerpt = encode(excerpt);
    let url = encode(canonical_url);

    ShareLinks {
        twitter: format!("https://twitter.com/intent/tweet?url={url}&text={title}"),
        linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={url}"),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
        email: format!("mailto:?subject={title}&body={excerpt}%0A%0A{url}"),
    }
}

/// Share URLs for an article published at `canonical_url`.
pub fn article_share_links(article: &Article, canonical_url: &str) -> ShareLinks {
    build_share_links(&article.title, &article.excerpt, canonical_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(haystack: &str, c: char) -> usize {
        haystack.matches(c).count()
    }

    #[test]
    fn exact_templates() {
        let links = build_share_links("Hello", "World", "https://example.com/blog/a/");
        let url = "https%3A%2F%2Fexample.com%2Fblog%2Fa%2F";
        assert_eq!(
            links.twitter,
            format!("https://twitter.com/intent/tweet?url={url}&text=Hello")
        );
        assert_eq!(
            links.linkedin,
            format!("https://www.linkedin.com/sharing/share-offsite/?url={url}")
        );
        assert_eq!(
            links.facebook,
            format!("https://www.facebook.com/sharer/sharer.php?u={url}")
        );
        assert_eq!(
            links.email,
            format!("mailto:?subject=Hello&body=World%0A%0A{url}")
        );
    }

    #[test]
    fn separators_in_values_are_encoded() {
        let links = build_share_links("A & B", "50% off!", "https://x.com/p?a=1");

        assert_eq!(
            links.twitter,
            "https://twitter.com/intent/tweet?url=https%3A%2F%2Fx.com%2Fp%3Fa%3D1&text=A%20%26%20B"
        );
        assert_eq!(
            links.email,
            "mailto:?subject=A%20%26%20B&body=50%25%20off!%0A%0Ahttps%3A%2F%2Fx.com%2Fp%3Fa%3D1"
        );

        // Separator counts equal the template's own separators.
        for (link, question, amp, eq) in [
            (&links.twitter, 1, 1, 2),
            (&links.linkedin, 1, 0, 1),
            (&links.facebook, 1, 0, 1),
            (&links.email, 1, 1, 2),
        ] {
            assert_eq!(count(link, '?'), question, "{link}");
            assert_eq!(count(link, '&'), amp, "{link}");
            assert_eq!(count(link, '='), eq, "{link}");
        }
    }

    #[test]
    fn unreserved_characters_untouched() {
        assert_eq!(encode("a-b_c.d!e~f*g'h(i)"), "a-b_c.d!e~f*g'h(i)");
    }

    #[test]
    fn unicode_is_utf8_encoded() {
        assert_eq!(encode("café"), "caf%C3%A9");
    }

    #[test]
    fn deterministic() {
        let a = build_share_links("t", "e", "https://u");
        let b = build_share_links("t", "e", "https://u");
        assert_eq!(a, b);
    }
}
