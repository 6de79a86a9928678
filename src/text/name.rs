/// Canonicalizes a raw key token: every whitespace-separated word is
/// lower-cased with its first letter upper-cased, then the words are joined.
///
/// `"work places"`, `"WORK PLACES"` and `"Work Places"` all become
/// `"WorkPlaces"`; a single word such as `"hobbies"` becomes `"Hobbies"`.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        let lower = word.to_lowercase();
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Case-folded form used when a normalized key has no exact match, so that
/// `WorkPlaces:` (normalized to `Workplaces`) still finds `WorkPlaces`.
pub fn fold_key(name: &str) -> String {
    name.chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Derives the canonical field name from a snake_case Rust identifier.
pub fn pascal_case(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    let mut out = String::with_capacity(ident.len());
    for segment in ident.split('_').filter(|segment| !segment.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
