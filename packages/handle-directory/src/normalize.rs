//! Brand/person name canonicalization.
//!
//! `normalize` is idempotent: `normalize(normalize(x)) == normalize(x)`.
//! Alias canonicals are registered as keys of themselves so an alias hit is a
//! fixed point, and the alias table is consulted again on the cleaned form so
//! a cleaned spelling that happens to be an alias key can't change on a
//! second pass.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

/// Legal-entity suffixes and articles dropped from names.
const STRIP_WORDS: &[&str] = &[
    "inc",
    "llc",
    "corp",
    "corporation",
    "company",
    "co",
    "ltd",
    "limited",
    "the",
];

/// Trailing tokens dropped when deriving a name from a handle.
const HANDLE_SUFFIXES: &[&str] = &["official", "company", "corp", "inc", "hq"];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("alphabet", "Google"),
    ("alphabet inc", "Google"),
    ("google llc", "Google"),
    ("meta platforms", "Meta"),
    ("meta platforms inc", "Meta"),
    ("facebook inc", "Meta"),
    ("amazon.com", "Amazon"),
    ("amazon.com inc", "Amazon"),
    ("amazoncom", "Amazon"),
    ("the coca-cola company", "Coca-Cola"),
    ("coca cola", "Coca-Cola"),
    ("cocacola", "Coca-Cola"),
    ("coke", "Coca-Cola"),
    ("mcdonalds", "McDonald's"),
    ("mcdonalds corporation", "McDonald's"),
    ("international business machines", "IBM"),
    ("ibm corp", "IBM"),
    ("at&t inc", "AT&T"),
    ("att", "AT&T"),
    ("hennes & mauritz", "H&M"),
    ("hennes mauritz", "H&M"),
    ("hm", "H&M"),
];

lazy_static! {
    static ref DEFAULT_ALIAS_TABLE: AliasTable = AliasTable::new(DEFAULT_ALIASES.iter().copied());
}

fn alias_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable map from known name variants to one canonical spelling.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Arc<HashMap<String, String>>,
}

impl AliasTable {
    /// Build a table from `(variant, canonical)` pairs. Lookups are
    /// case-insensitive and whitespace-collapsed.
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries = HashMap::new();
        for (variant, canonical) in pairs {
            entries.insert(alias_key(variant), canonical.to_string());
            entries
                .entry(alias_key(canonical))
                .or_insert_with(|| canonical.to_string());
        }
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Built-in table of well-known brand aliases.
    pub fn default_table() -> Self {
        DEFAULT_ALIAS_TABLE.clone()
    }

    /// Table with no aliases.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(&alias_key(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonicalizes free-text names into a comparable form.
#[derive(Debug, Clone)]
pub struct BrandNormalizer {
    aliases: AliasTable,
}

impl Default for BrandNormalizer {
    fn default() -> Self {
        Self::new(AliasTable::default_table())
    }
}

impl BrandNormalizer {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Canonical form of `name`; empty for empty or whitespace-only input.
    pub fn normalize(&self, name: &str) -> String {
        if name.trim().is_empty() {
            return String::new();
        }
        if let Some(canonical) = self.aliases.lookup(name) {
            return canonical.to_string();
        }

        let cleaned: String = name
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        let words: Vec<&str> = cleaned.split_whitespace().collect();
        let kept: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| !STRIP_WORDS.contains(&w.to_lowercase().as_str()))
            .collect();
        // "The Company" stays "The Company" rather than vanishing
        let kept = if kept.is_empty() { words } else { kept };

        let result = kept
            .iter()
            .map(|w| title_case(w))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match self.aliases.lookup(&result) {
            Some(canonical) => canonical.to_string(),
            None => result,
        }
    }

    /// Derive a display name from a handle (`@nike_official` → `Nike`,
    /// `ElonMusk42` → `Elon Musk`). `None` when under two characters remain.
    pub fn extract_from_handle(&self, handle: &str) -> Option<String> {
        let mut stem = handle.trim().trim_start_matches('@').to_string();

        loop {
            let before = stem.len();
            stem = stem
                .trim_end_matches(|c: char| c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
                .to_string();
            let lowered = stem.to_lowercase();
            if let Some(suffix) = HANDLE_SUFFIXES.iter().find(|s| lowered.ends_with(*s)) {
                let remainder = stem[..stem.len() - suffix.len()]
                    .trim_end_matches(['_', '.', '-']);
                // "zinc" keeps its "inc"
                if remainder.chars().count() >= 2 {
                    stem = remainder.to_string();
                }
            }
            if stem.len() == before {
                break;
            }
        }

        let words = split_words(&stem);
        let name = words
            .iter()
            .map(|w| title_case(w))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let letters = name.chars().filter(|c| !c.is_whitespace()).count();
        (letters >= 2).then_some(name)
    }
}

/// Uppercase the first character and lowercase the rest, keeping only
/// alphanumerics. Characters whose uppercase form expands (e.g. `ß`) are left
/// lowercase so the result is stable under repeated application.
fn title_case(word: &str) -> String {
    let lowered: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => {
            let mut upper = first.to_uppercase();
            let head = match (upper.next(), upper.next()) {
                (Some(u), None) if u.is_alphanumeric() => u,
                _ => first,
            };
            std::iter::once(head).chain(chars).collect()
        }
        None => String::new(),
    }
}

/// Split snake_case, kebab-case, dotted and camelCase into words.
fn split_words(stem: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in stem.split(|c: char| matches!(c, '_' | '-' | '.') || c.is_whitespace()) {
        let mut current = String::new();
        let mut prev: Option<char> = None;
        for c in chunk.chars() {
            let boundary = match prev {
                Some(p) => c.is_uppercase() && (p.is_lowercase() || p.is_ascii_digit()),
                None => false,
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
            prev = Some(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(name: &str) -> String {
        BrandNormalizer::default().normalize(name)
    }

    #[test]
    fn legal_suffixes_collapse_to_one_form() {
        assert_eq!(normalize("Apple Inc."), "Apple");
        assert_eq!(normalize("apple inc"), "Apple");
        assert_eq!(normalize("APPLE, INC"), "Apple");
        assert_eq!(normalize("The Apple Company Ltd"), "Apple");
    }

    #[test]
    fn punctuation_and_whitespace_are_cleaned() {
        assert_eq!(normalize("  tesla   motors!! "), "Tesla Motors");
        assert_eq!(normalize("Ben & Jerry's"), "Ben Jerrys");
    }

    #[test]
    fn empty_input_gives_empty_string() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn only_suffix_words_are_kept_verbatim() {
        assert_eq!(normalize("the company"), "The Company");
        assert_eq!(normalize(&normalize("the company")), "The Company");
    }

    #[test]
    fn alias_hits_short_circuit() {
        assert_eq!(normalize("Alphabet Inc."), "Google");
        assert_eq!(normalize("McDonald's"), "McDonald's");
        assert_eq!(normalize("mcdonalds"), "McDonald's");
        assert_eq!(normalize("the coca-cola company"), "Coca-Cola");
    }

    #[test]
    fn alias_canonicals_are_fixed_points() {
        for (_, canonical) in DEFAULT_ALIASES {
            assert_eq!(normalize(canonical), *canonical);
        }
    }

    #[test]
    fn cleaned_alias_key_is_resolved() {
        // "Alphabet, Inc." misses the raw lookup but cleans to "Alphabet"
        assert_eq!(normalize("Alphabet, Inc."), "Google");
        assert_eq!(normalize("Google"), "Google");
    }

    #[test]
    fn custom_alias_table_is_used() {
        let normalizer = BrandNormalizer::new(AliasTable::new([("spacex", "SpaceX")]));
        assert_eq!(normalizer.normalize("SPACEX"), "SpaceX");
        assert_eq!(normalizer.normalize("Alphabet"), "Alphabet");
    }

    #[test]
    fn unicode_case_edge_cases_are_stable() {
        for input in ["straße", "ßeta", "İstanbul", "ΑΣ", "ǅemal"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn names_from_handles() {
        let n = BrandNormalizer::default();
        assert_eq!(n.extract_from_handle("@nike").as_deref(), Some("Nike"));
        assert_eq!(n.extract_from_handle("ElonMusk").as_deref(), Some("Elon Musk"));
        assert_eq!(n.extract_from_handle("elon_musk42").as_deref(), Some("Elon Musk"));
        assert_eq!(n.extract_from_handle("nike_official").as_deref(), Some("Nike"));
        assert_eq!(n.extract_from_handle("teslaHQ").as_deref(), Some("Tesla"));
        assert_eq!(n.extract_from_handle("acme.corp.2024").as_deref(), Some("Acme"));
        assert_eq!(n.extract_from_handle("zinc").as_deref(), Some("Zinc"));
    }

    #[test]
    fn short_handles_have_no_name() {
        let n = BrandNormalizer::default();
        assert_eq!(n.extract_from_handle("@x"), None);
        assert_eq!(n.extract_from_handle("a123"), None);
        assert_eq!(n.extract_from_handle("@"), None);
        assert_eq!(n.extract_from_handle("12345"), None);
    }
}
