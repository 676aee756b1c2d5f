//! Catalog of the systems a FOB may spawn in, and the name normalization used
//! to compare guesses against it.

use std::collections::BTreeMap;

use rand::{rng, seq::SliceRandom};

/// Upper bound on suggestions returned for a partial system name.
pub const MAX_SUGGESTIONS: usize = 25;

/// Canonicalize a system name: trim, collapse internal whitespace and title-case.
///
/// Title-casing upper-cases every letter that follows a non-letter and
/// lower-cases the rest, so `"old  man STAR "` becomes `"Old Man Star"`.
pub fn normalize_system_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut normalized = String::with_capacity(collapsed.len());
    let mut previous_is_letter = false;
    for ch in collapsed.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                normalized.extend(ch.to_lowercase());
            } else {
                normalized.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            normalized.push(ch);
            previous_is_letter = false;
        }
    }
    normalized
}

/// Administrator-curated allow-list of guessable systems.
#[derive(Debug, Clone, Default)]
pub struct SystemCatalog {
    /// Normalized name mapped to the display name it was configured with.
    systems: BTreeMap<String, String>,
}

impl SystemCatalog {
    /// Build a catalog from display names; duplicates after normalization collapse.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let systems = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_owned())
            .filter(|name| !name.is_empty())
            .map(|name| (normalize_system_name(&name), name))
            .collect();
        Self { systems }
    }

    /// Normalize `raw` and return it if the result is on the allow-list.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let normalized = normalize_system_name(raw);
        self.systems.contains_key(&normalized).then_some(normalized)
    }

    /// Number of systems in the catalog.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the catalog has no systems at all.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Display names sorted alphabetically.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.systems.values().cloned().collect();
        names.sort();
        names
    }

    /// Suggest display names for a partially typed system.
    ///
    /// An empty query yields a random sample; otherwise names containing the
    /// query (case-insensitive) are returned sorted. At most
    /// [`MAX_SUGGESTIONS`] names are returned.
    pub fn suggest(&self, query: &str) -> Vec<String> {
        let typed = query.trim().to_lowercase();
        let mut names = if typed.is_empty() {
            let mut all: Vec<String> = self.systems.values().cloned().collect();
            all.shuffle(&mut rng());
            all
        } else {
            let mut filtered: Vec<String> = self
                .systems
                .values()
                .filter(|name| name.to_lowercase().contains(&typed))
                .cloned()
                .collect();
            filtered.sort();
            filtered
        };
        names.truncate(MAX_SUGGESTIONS);
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_title_cases() {
        assert_eq!(normalize_system_name("  tama "), "Tama");
        assert_eq!(normalize_system_name("old   man\tSTAR"), "Old Man Star");
        assert_eq!(normalize_system_name("o'neil"), "O'Neil");
        assert_eq!(normalize_system_name(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["tama ", "OLD MAN star", "  Vey", "x-7 ALPHA", "Ikoskio"] {
            let once = normalize_system_name(raw);
            assert_eq!(normalize_system_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn variants_of_the_same_system_normalize_equal() {
        assert_eq!(
            normalize_system_name("old man star"),
            normalize_system_name(" OLD  Man  sTaR ")
        );
    }

    #[test]
    fn resolve_only_accepts_listed_systems() {
        let catalog = SystemCatalog::new(["Tama", "Vey", "Old Man Star"]);
        assert_eq!(catalog.resolve("tama "), Some("Tama".to_string()));
        assert_eq!(catalog.resolve("old man  star"), Some("Old Man Star".into()));
        assert_eq!(catalog.resolve("Jita"), None);
        assert_eq!(catalog.resolve("   "), None);
    }

    #[test]
    fn suggest_filters_sorts_and_caps() {
        let catalog = SystemCatalog::new(["Oto", "Otela", "Tama", "Ikoskio"]);
        assert_eq!(catalog.suggest("OT"), vec!["Otela", "Oto"]);
        assert_eq!(catalog.suggest("zzz"), Vec::<String>::new());

        let many = SystemCatalog::new((0..40).map(|i| format!("System {i}")));
        assert_eq!(many.suggest("").len(), MAX_SUGGESTIONS);
        assert_eq!(many.suggest("system").len(), MAX_SUGGESTIONS);
    }
}
