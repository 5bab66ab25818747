//! URL-safe slugs for category labels.
//!
//! Category pages in the static build are named `categoria-<slug>.html`.
//! Labels are Portuguese free text, so accented letters are folded to their
//! ASCII base before everything outside `[a-z0-9]` collapses into dashes:
//! - `"Adaptógeno"` → `"adaptogeno"`
//! - `"Anabólico Natural"` → `"anabolico-natural"`
//! - `"Hormonal / Próstata"` → `"hormonal-prostata"`

/// Slugify a display label.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;

    for c in label.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Map a lowercase Latin letter with diacritics to its base letter.
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
