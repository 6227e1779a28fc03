//! Filesystem-safe base names derived from titles

/// Character every unsafe character is replaced with
pub const SLUG_SEPARATOR: char = '_';

/// Name used when nothing survives slugification
pub const FALLBACK_SLUG: &str = "untitled";

const REPLACED: &[char] = &[
    ' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|', '。', '，', '！', '？', '；', '：',
];

/// Turn a title into a base file name.
///
/// Lower-cases, maps unsafe ASCII and full-width punctuation to `_`, collapses
/// runs of `_` and trims them from both ends. Pure and deterministic.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        let c = if REPLACED.contains(&c) { SLUG_SEPARATOR } else { c };
        if c == SLUG_SEPARATOR && slug.ends_with(SLUG_SEPARATOR) {
            continue;
        }
        slug.push(c);
    }

    let trimmed = slug.trim_matches(SLUG_SEPARATOR);
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}
