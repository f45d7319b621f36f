use chrono::{Duration, Utc};
use log::{error, info};

use crate::bot::BotContext;
use crate::handlers::HandlerError;
use crate::localization::Lang;
use crate::utils::duration::{
    DurationUnit, ParsedDuration, DEFAULT_MUTE_SECONDS, MAX_MUTE_SECONDS,
};
use crate::utils::MessageFormatter;

// offered when /muteme has no argument
pub const MUTE_PRESETS: [(u64, DurationUnit); 3] = [
    (30, DurationUnit::Minutes),
    (8, DurationUnit::Hours),
    (1, DurationUnit::Days),
];

const MUTE_CALLBACK_PREFIX: &str = "muteme";

/// extra line appended to a mute confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuteNotice {
    /// the duration couldn't be parsed and the default was used
    Invalid,
    Capped,
}

/// button payload `muteme:<user_id>:<amount>:<unit>`, only the embedded user may use it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MuteCallback {
    pub user_id: i64,
    pub amount: u64,
    pub unit: DurationUnit,
}

impl MuteCallback {
    pub fn new(user_id: i64, amount: u64, unit: DurationUnit) -> Self {
        Self {
            user_id,
            amount,
            unit,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            MUTE_CALLBACK_PREFIX,
            self.user_id,
            self.amount,
            self.unit.suffix()
        )
    }

    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        if parts.next()? != MUTE_CALLBACK_PREFIX {
            return None;
        }

        let user_id = parts.next()?.parse::<i64>().ok()?;
        let amount = parts.next()?.parse::<u64>().ok().filter(|&amount| amount > 0)?;
        let unit = DurationUnit::from_suffix(parts.next()?)?;

        if parts.next().is_some() {
            return None;
        }

        Some(Self::new(user_id, amount, unit))
    }

    pub fn is_mute_payload(data: &str) -> bool {
        data.split(':').next() == Some(MUTE_CALLBACK_PREFIX)
    }

    pub fn duration(&self) -> ParsedDuration {
        self.unit.capped_seconds(self.amount)
    }
}

pub struct MuteHandler;

impl MuteHandler {
    /// restricts the user for `seconds` from now; failure here fails the whole request
    pub async fn apply_mute(
        ctx: &BotContext,
        chat_id: i64,
        user_id: i64,
        seconds: u64,
    ) -> Result<(), HandlerError> {
        let until = Utc::now() + Duration::seconds(seconds as i64);

        if let Err(source) = ctx.api.restrict_member(chat_id, user_id, until).await {
            error!(
                "Failed to restrict user {} in chat {} for {}s: {}",
                user_id, chat_id, seconds, source
            );
            return Err(HandlerError::RestrictFailed {
                chat_id,
                user_id,
                source,
            });
        }

        info!(
            "Muted user {} in chat {} for {}s (until {})",
            user_id, chat_id, seconds, until
        );
        Ok(())
    }

    pub fn confirmation_text(
        ctx: &BotContext,
        user_id: i64,
        first_name: &str,
        seconds: u64,
        notice: Option<MuteNotice>,
        lang: Lang,
    ) -> String {
        let translations = &ctx.translations;
        let duration = translations.format_duration(seconds, lang);
        let mention = MessageFormatter::user_mention(user_id, first_name);

        // name goes last so a first name can't smuggle in a placeholder
        let text = translations.resolve(
            "muteme_done",
            lang,
            &[("duration", duration.as_str()), ("name", mention.as_str())],
        );

        let default_duration = translations.format_duration(DEFAULT_MUTE_SECONDS, lang);
        let max_duration = translations.format_duration(MAX_MUTE_SECONDS, lang);
        let notice = notice.map(|notice| match notice {
            MuteNotice::Invalid => translations.resolve(
                "muteme_notice_invalid",
                lang,
                &[("duration", default_duration.as_str())],
            ),
            MuteNotice::Capped => translations.resolve(
                "muteme_notice_capped",
                lang,
                &[("duration", max_duration.as_str())],
            ),
        });

        MessageFormatter::with_notice(text, notice)
    }
}
