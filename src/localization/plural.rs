use serde::Deserialize;

use super::Lang;

/// CLDR plural category, selected per count and language
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn for_count(count: u64, lang: Lang) -> Self {
        match lang {
            Lang::En => Self::english(count),
            Lang::Uk => Self::east_slavic(count),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }

    fn english(count: u64) -> Self {
        if count == 1 {
            PluralCategory::One
        } else {
            PluralCategory::Other
        }
    }

    // 1, 21, 101 -> one; 2-4, 22-24 -> few; 0, 5-20, 25-30 -> many
    fn east_slavic(count: u64) -> Self {
        let m10 = count % 10;
        let m100 = count % 100;

        if m10 == 1 && m100 != 11 {
            PluralCategory::One
        } else if (2..=4).contains(&m10) && !(10..20).contains(&m100) {
            PluralCategory::Few
        } else if m10 == 0 || (5..=9).contains(&m10) || (11..=14).contains(&m100) {
            PluralCategory::Many
        } else {
            PluralCategory::Other
        }
    }
}
