mod catalog;
mod duration_format;
mod plural;

pub use catalog::{CatalogError, Translations};
pub use plural::PluralCategory;

/// supported languages for bot replies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lang {
    #[default]
    En,
    Uk,
}

impl Lang {
    /// every language offered by /setlang, in button order
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Uk];

    /// exact match, used for button payloads and stored preferences
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Lang::En),
            "uk" => Some(Lang::Uk),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Uk => "uk",
        }
    }
}
