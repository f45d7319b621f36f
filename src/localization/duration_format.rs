use super::{Lang, Translations};
use crate::utils::duration::DurationUnit;

impl Translations {
    /// renders a mute duration as a localized phrase, e.g. "1 hour 30 minutes";
    /// anything from one day up is rendered as exactly one day
    pub fn format_duration(&self, seconds: u64, lang: Lang) -> String {
        if seconds >= DurationUnit::Days.seconds() {
            return self.resolve_plural(DurationUnit::Days.catalog_key(), 1, lang, &[]);
        }

        let hours = seconds / DurationUnit::Hours.seconds();
        let minutes = (seconds % DurationUnit::Hours.seconds()) / DurationUnit::Minutes.seconds();

        let hours_phrase = || self.resolve_plural(DurationUnit::Hours.catalog_key(), hours, lang, &[]);
        let minutes_phrase =
            || self.resolve_plural(DurationUnit::Minutes.catalog_key(), minutes, lang, &[]);

        match (hours, minutes) {
            (0, _) => minutes_phrase(),
            (_, 0) => hours_phrase(),
            _ => format!("{} {}", hours_phrase(), minutes_phrase()),
        }
    }
}
