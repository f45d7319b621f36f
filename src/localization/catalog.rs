use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use super::{Lang, PluralCategory};

const EMBEDDED_EN: &str = include_str!("../../locales/en.json");
const EMBEDDED_UK: &str = include_str!("../../locales/uk.json");

#[derive(Debug)]
pub enum CatalogError {
    Io(Lang, std::io::Error),
    Parse(Lang, serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(lang, e) => {
                write!(f, "Failed to read '{}' catalog: {}", lang.code(), e)
            }
            CatalogError::Parse(lang, e) => {
                write!(f, "Failed to parse '{}' catalog: {}", lang.code(), e)
            }
        }
    }
}

impl Error for CatalogError {}

/// a catalog value is either a plain template or a group of plural forms
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Text(String),
    Plural(HashMap<PluralCategory, String>),
}

/// flattened catalog: plural groups are stored under `<key>.<category>`
#[derive(Debug, Default)]
struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    fn from_json(lang: Lang, json: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, CatalogEntry> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(lang, e))?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            match entry {
                CatalogEntry::Text(text) => {
                    entries.insert(key, text);
                }
                CatalogEntry::Plural(forms) => {
                    for (category, text) in forms {
                        entries.insert(format!("{}.{}", key, category.as_str()), text);
                    }
                }
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// immutable set of per-language catalogs, built once at startup and shared behind an Arc
#[derive(Debug)]
pub struct Translations {
    catalogs: HashMap<Lang, Catalog>,
}

impl Translations {
    /// catalogs compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_sources(Lang::ALL.iter().map(|&lang| {
            let json = match lang {
                Lang::En => EMBEDDED_EN,
                Lang::Uk => EMBEDDED_UK,
            };
            (lang, json.to_string())
        }))
    }

    /// reads `<dir>/<code>.json` for every supported language
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let mut sources = Vec::with_capacity(Lang::ALL.len());
        for lang in Lang::ALL {
            let path = dir.join(format!("{}.json", lang.code()));
            let json = fs::read_to_string(&path).map_err(|e| CatalogError::Io(lang, e))?;
            info!("Loaded '{}' catalog from {}", lang.code(), path.display());
            sources.push((lang, json));
        }
        Self::from_sources(sources)
    }

    pub fn from_sources(
        sources: impl IntoIterator<Item = (Lang, String)>,
    ) -> Result<Self, CatalogError> {
        let mut catalogs = HashMap::new();
        for (lang, json) in sources {
            catalogs.insert(lang, Catalog::from_json(lang, &json)?);
        }
        Ok(Self { catalogs })
    }

    fn lookup(&self, key: &str, lang: Lang) -> Option<&str> {
        self.catalogs.get(&lang).and_then(|catalog| catalog.get(key))
    }

    /// looks up `key` for `lang`, then for the default language, then degrades to the key itself
    pub fn resolve(&self, key: &str, lang: Lang, params: &[(&str, &str)]) -> String {
        let template = self
            .lookup(key, lang)
            .or_else(|| self.lookup(key, Lang::default()))
            .unwrap_or(key);

        substitute(template, params)
    }

    /// picks `<base_key>.<category>` for `count`, falling back to `<base_key>.other` and then
    /// to `base_key` as a plain key; `{amount}` is filled with `count` unless supplied
    pub fn resolve_plural(
        &self,
        base_key: &str,
        count: u64,
        lang: Lang,
        params: &[(&str, &str)],
    ) -> String {
        let amount = count.to_string();
        let mut params = params.to_vec();
        if !params.iter().any(|(name, _)| *name == "amount") {
            params.push(("amount", amount.as_str()));
        }

        let category = PluralCategory::for_count(count, lang);
        let plural_key = format!("{}.{}", base_key, category.as_str());
        let other_key = format!("{}.other", base_key);

        match self
            .lookup(&plural_key, lang)
            .or_else(|| self.lookup(&other_key, lang))
        {
            Some(template) => substitute(template, &params),
            None => self.resolve(base_key, lang, &params),
        }
    }
}

// literal replacement, placeholders without a value stay as they are
fn substitute(template: &str, params: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}
