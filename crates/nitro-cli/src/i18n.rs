//! # Localization
//!
//! Embedded message dictionaries and locale selection.

use nitro_client::storage::keys;
use nitro_client::LocalStorage;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// Locale used when a key or a whole dictionary is missing.
pub const DEFAULT_LOCALE: &str = "en";

type Dictionary = HashMap<String, String>;

static DICTIONARIES: Lazy<HashMap<&'static str, Dictionary>> = Lazy::new(|| {
    [
        ("de", include_str!("../i18n/de.json")),
        ("en", include_str!("../i18n/en.json")),
        ("fr", include_str!("../i18n/fr.json")),
    ]
    .into_iter()
    .map(|(code, raw)| (code, parse_json(code, raw)))
    .collect()
});

static LANGUAGES: Lazy<BTreeMap<String, String>> =
    Lazy::new(|| parse_json("_list", include_str!("../i18n/_list.json")));

fn parse_json<T: serde::de::DeserializeOwned + Default>(name: &str, raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::error!(dictionary = name, error = %e, "Invalid embedded dictionary");
        T::default()
    })
}

/// Resolves `key` in `locale`, then in [`DEFAULT_LOCALE`], then renders it
/// as `<key>`.
#[must_use]
pub fn resolve(key: &str, locale: &str) -> String {
    [locale, DEFAULT_LOCALE]
        .iter()
        .filter_map(|code| DICTIONARIES.get(*code))
        .find_map(|dict| dict.get(key))
        .cloned()
        .unwrap_or_else(|| format!("<{key}>"))
}

/// Available languages, code to display name.
#[must_use]
pub fn languages() -> &'static BTreeMap<String, String> {
    &LANGUAGES
}

/// Whether `code` names an available language.
#[must_use]
pub fn is_known(code: &str) -> bool {
    LANGUAGES.contains_key(code)
}

/// Strips the region from a BCP 47 tag: `en-US` becomes `en`.
#[must_use]
pub fn language_of(tag: &str) -> String {
    let tag = tag.replace('_', "-");
    match tag.rsplit_once('-') {
        Some((lang, _region)) => lang.to_string(),
        None => tag,
    }
}

/// Picks the UI language: the stored choice, else the system language,
/// else [`DEFAULT_LOCALE`].
#[must_use]
pub fn startup_locale(storage: &dyn LocalStorage) -> String {
    storage
        .get_item(keys::LANG)
        .or_else(|| sys_locale::get_locale().map(|tag| language_of(&tag)))
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitro_client::MemoryStorage;

    #[test]
    fn test_embedded_dictionaries_parse() {
        for code in ["de", "en", "fr"] {
            assert!(!DICTIONARIES[code].is_empty(), "{code} is empty");
        }
        assert_eq!(languages().len(), 3);
        assert!(languages().keys().all(|code| DICTIONARIES.contains_key(code.as_str())));
    }

    #[test]
    fn test_resolve_in_locale() {
        assert_eq!(resolve("logout-success", "de"), "Abgemeldet.");
        assert_eq!(resolve("logout-success", "en"), "Logged out.");
    }

    #[test]
    fn test_resolve_falls_back_to_default_locale() {
        assert_eq!(resolve("upload-busy", "fr"), resolve("upload-busy", "en"));
        assert_eq!(resolve("logout-success", "xx"), "Logged out.");
    }

    #[test]
    fn test_resolve_unknown_key() {
        assert_eq!(resolve("no-such-key", "de"), "<no-such-key>");
    }

    const CLIENT_KEYS: [&str; 12] = [
        "login-auto",
        "login-success",
        "login-badpass",
        "login-unknown",
        "login-already",
        "login-busy",
        "upload-lstat",
        "upload-success",
        "upload-badsize",
        "upload-unknown",
        "upload-busy",
        "upload-login",
    ];

    const CLI_KEYS: [&str; 7] = [
        "busy",
        "lang-set",
        "lang-unknown",
        "logout-success",
        "upload-filetype",
        "whoami-anon",
        "whoami-user",
    ];

    #[test]
    fn test_english_covers_every_client_message() {
        for key in CLIENT_KEYS.iter().chain(&CLI_KEYS) {
            assert!(DICTIONARIES["en"].contains_key(*key), "missing {key}");
        }
    }

    #[test]
    fn test_dictionaries_carry_no_stray_keys() {
        for (code, dict) in DICTIONARIES.iter() {
            for key in dict.keys() {
                assert!(
                    CLIENT_KEYS.contains(&key.as_str()) || CLI_KEYS.contains(&key.as_str()),
                    "{code} has unused key {key}"
                );
            }
        }
    }

    #[test]
    fn test_language_of_strips_region() {
        assert_eq!(language_of("en-US"), "en");
        assert_eq!(language_of("pt_BR"), "pt");
        assert_eq!(language_of("zh-Hant-TW"), "zh-Hant");
        assert_eq!(language_of("de"), "de");
    }

    #[test]
    fn test_stored_language_wins() {
        let storage = MemoryStorage::with_items([(keys::LANG, "fr")]);
        assert_eq!(startup_locale(&storage), "fr");
    }
}
