//! Text normalization helpers
//!
//! HTML stripping for descriptions, slug derivation for stable identifiers,
//! and display-name cleanup for names carrying a `<TAG>` prefix.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static LEADING_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<[^>]+>\s*").expect("valid marker regex"));

/// Remove HTML tags and collapse whitespace.
///
/// Returns `None` when nothing but markup or whitespace remains.
pub fn strip_tags(s: &str) -> Option<String> {
    let without_tags = TAG_RE.replace_all(s, "");
    let collapsed = WS_RE.replace_all(&without_tags, " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// [`strip_tags`] over an optional input.
pub fn strip_opt(s: Option<&str>) -> Option<String> {
    s.and_then(strip_tags)
}

/// Drop a leading marker such as `<ARCHWING> ` from a display name.
///
/// `"<ARCHWING> Amesha"` → `"Amesha"`, `"Excalibur"` → `"Excalibur"`
pub fn clean_display_name(name: &str) -> String {
    LEADING_MARKER_RE.replace(name.trim(), "").trim().to_string()
}

/// Lower-case and trim a display name for join keys.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Derive a URL-safe identifier from a display name.
///
/// Lower-cases, folds common Latin accents to ASCII, and collapses every run
/// of other characters into a single `-`. Never returns an empty string.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let folded = fold_accent(c);
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(folded);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<DT_FIRE_COLOR>Heat</DT_FIRE_COLOR>   damage\n over time").as_deref(),
            Some("Heat damage over time")
        );
        assert_eq!(strip_tags("<br/>  "), None);
        assert_eq!(strip_opt(None), None);
    }

    #[test]
    fn test_clean_display_name() {
        assert_eq!(clean_display_name("<ARCHWING> Amesha"), "Amesha");
        assert_eq!(clean_display_name("  Excalibur Umbra "), "Excalibur Umbra");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Excalibur Umbra"), "excalibur-umbra");
        assert_eq!(slugify("Nidus Prime"), "nidus-prime");
        assert_eq!(slugify("  Bonewidow!! "), "bonewidow");
        assert_eq!(slugify("Équinoxe"), "equinoxe");
        assert_eq!(slugify("***"), "unknown");
    }

    #[test]
    fn test_slugify_is_deterministic() {
        assert_eq!(slugify("Gauss Prime"), slugify("Gauss Prime"));
        assert_ne!(slugify("Gauss"), slugify("Gauss Prime"));
    }
}
