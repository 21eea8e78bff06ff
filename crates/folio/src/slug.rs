//! Slug and path shape rules shared by the content model and the validator.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Returns true when `value` is lowercase ASCII alphanumerics separated by single hyphens.
///
/// Used for article slugs and section container ids, which double as URL path segments and
/// HTML anchors.
pub fn is_valid_slug(value: &str) -> bool {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    let re = SLUG.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"));
    re.is_match(value)
}

/// Returns true when `value` looks like a site-relative path (`/guides/rollover/`).
///
/// Only the shape is checked. Guides and tools live outside the registry so their existence
/// cannot be verified here.
pub fn is_path_shaped(value: &str) -> bool {
    static PATH: OnceLock<Regex> = OnceLock::new();
    let re = PATH.get_or_init(|| {
        Regex::new(r"^(?:/[A-Za-z0-9._~%-]+)+/?(?:[?#][^\s]*)?$").expect("path regex")
    });
    if !re.is_match(value) {
        return false;
    }
    !value
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .split('/')
        .any(|segment| segment == "..")
}

/// Derives an anchor-safe slug from a human title.
///
/// NFKD-normalizes, drops combining marks and punctuation, lowercases, and hyphenates runs of
/// whitespace. Returns `None` when nothing slug-worthy remains.
pub fn slugify(title: &str) -> Option<String> {
    let lowered = title
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for ch in lowered.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_hyphen = true;
        }
    }

    if out.is_empty() { None } else { Some(out) }
}
