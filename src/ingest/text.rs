//! English-text selection and whitespace cleanup for catalog prose.

use std::collections::HashSet;

use crate::catalog::models::{EffectEntry, FlavorTextPayload, GenusPayload};

const ENGLISH: &str = "en";

/// Collapse control characters and whitespace runs to single spaces, trim ends
pub fn normalize_text(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First English `(effect, short_effect)` pair
pub fn english_effect(entries: &[EffectEntry]) -> (Option<String>, Option<String>) {
    match entries.iter().find(|e| e.language.name == ENGLISH) {
        Some(entry) => (
            entry.effect.as_deref().map(normalize_text),
            entry.short_effect.as_deref().map(normalize_text),
        ),
        None => (None, None),
    }
}

pub fn english_genus(genera: &[GenusPayload]) -> Option<String> {
    genera
        .iter()
        .find(|g| g.language.name == ENGLISH)
        .map(|g| normalize_text(&g.genus))
}

/// Up to `limit` English flavor texts as `(version, description)`, one per version
pub fn pokedex_entries(entries: &[FlavorTextPayload], limit: usize) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|e| e.language.name == ENGLISH)
        .filter_map(|e| {
            let version = e.version.as_ref()?.name.clone();
            seen.insert(version.clone())
                .then(|| (version, normalize_text(&e.flavor_text)))
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::NamedResource;

    fn named(name: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: String::new(),
        }
    }

    fn flavor(text: &str, lang: &str, version: &str) -> FlavorTextPayload {
        FlavorTextPayload {
            flavor_text: text.to_string(),
            language: named(lang),
            version: Some(named(version)),
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("A strange seed was\nplanted on its\x0cback at birth.  "),
            "A strange seed was planted on its back at birth."
        );
        assert_eq!(normalize_text("\r\n  \t"), "");
    }

    #[test]
    fn test_pokedex_entries_english_only_one_per_version() {
        let entries = vec![
            flavor("Ein Samen", "de", "red"),
            flavor("First\ntext", "en", "red"),
            flavor("Duplicate", "en", "red"),
            flavor("Second", "en", "blue"),
            flavor("Third", "en", "yellow"),
        ];

        let selected = pokedex_entries(&entries, 2);
        assert_eq!(
            selected,
            vec![
                ("red".to_string(), "First text".to_string()),
                ("blue".to_string(), "Second".to_string()),
            ]
        );
    }

    #[test]
    fn test_english_effect_missing() {
        let entries = vec![EffectEntry {
            effect: Some("Wirkung".into()),
            short_effect: None,
            language: named("de"),
        }];
        assert_eq!(english_effect(&entries), (None, None));
    }
}
