use log::{error, info, warn};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::{BotContext, IncomingCallback};
use crate::handlers::mute_handler::MUTE_PRESETS;
use crate::handlers::{HandlerError, MuteCallback, MuteHandler, MuteNotice};
use crate::localization::{Lang, Translations};
use crate::utils::duration::DurationUnit;

pub struct CallbackHandler;

impl CallbackHandler {
    pub fn create_mute_presets_keyboard(
        translations: &Translations,
        user_id: i64,
        lang: Lang,
    ) -> InlineKeyboardMarkup {
        let buttons = MUTE_PRESETS
            .iter()
            .map(|&(amount, unit)| Self::mute_button(translations, user_id, amount, unit, lang))
            .collect::<Vec<_>>();

        InlineKeyboardMarkup::new(vec![buttons])
    }

    /// `amount` minutes or `amount` hours, for a bare number without a unit
    pub fn create_unit_choice_keyboard(
        translations: &Translations,
        user_id: i64,
        amount: u64,
        lang: Lang,
    ) -> InlineKeyboardMarkup {
        let minutes_button =
            Self::mute_button(translations, user_id, amount, DurationUnit::Minutes, lang);
        let hours_button =
            Self::mute_button(translations, user_id, amount, DurationUnit::Hours, lang);

        InlineKeyboardMarkup::new(vec![vec![minutes_button, hours_button]])
    }

    /// one button per language, each labelled in its own language
    pub fn create_language_keyboard(translations: &Translations) -> InlineKeyboardMarkup {
        let rows = Lang::ALL
            .iter()
            .map(|&lang| {
                vec![InlineKeyboardButton::callback(
                    translations.resolve("language_name", lang, &[]),
                    lang.code(),
                )]
            })
            .collect::<Vec<_>>();

        InlineKeyboardMarkup::new(rows)
    }

    fn mute_button(
        translations: &Translations,
        user_id: i64,
        amount: u64,
        unit: DurationUnit,
        lang: Lang,
    ) -> InlineKeyboardButton {
        InlineKeyboardButton::callback(
            translations.resolve_plural(unit.catalog_key(), amount, lang, &[]),
            MuteCallback::new(user_id, amount, unit).encode(),
        )
    }

    pub async fn handle_callback_query(
        ctx: &BotContext,
        query: &IncomingCallback,
    ) -> Result<(), HandlerError> {
        let lang = ctx.chat_language(query.chat_id).await;

        let result = if let Some(payload) = MuteCallback::parse(&query.data) {
            Self::handle_mute_callback(ctx, query, payload, lang).await
        } else if let Some(selected) = Lang::parse(&query.data) {
            Self::handle_language_callback(ctx, query, selected, lang).await
        } else {
            Self::handle_unknown_callback(ctx, query).await;
            Ok(())
        };

        // every press gets an answer, failed handlers haven't sent one
        if result.is_err() {
            let text = ctx.text("error_generic", lang);
            ctx.answer_logged(&query.id, Some(text.as_str())).await;
        }

        result
    }

    async fn handle_unknown_callback(ctx: &BotContext, query: &IncomingCallback) {
        if MuteCallback::is_mute_payload(&query.data) {
            warn!(
                "Malformed mute payload '{}' from user {} in chat {}",
                query.data, query.user_id, query.chat_id
            );
        } else {
            warn!(
                "Unknown callback data '{}' from user {} in chat {}",
                query.data, query.user_id, query.chat_id
            );
        }
        ctx.answer_logged(&query.id, None).await;
    }

    async fn handle_mute_callback(
        ctx: &BotContext,
        query: &IncomingCallback,
        payload: MuteCallback,
        lang: Lang,
    ) -> Result<(), HandlerError> {
        if query.user_id != payload.user_id {
            info!(
                "User {} pressed a mute button of user {} in chat {}",
                query.user_id, payload.user_id, query.chat_id
            );
            let text = ctx.text("muteme_unauthorized", lang);
            ctx.answer_logged(&query.id, Some(text.as_str())).await;
            return Ok(());
        }

        // the user may have been promoted since the prompt was sent
        let role = ctx.member_role(query.chat_id, query.user_id).await?;
        if role.is_admin() {
            let text = ctx.text("muteme_admin", lang);
            ctx.answer_logged(&query.id, Some(text.as_str())).await;
            return Ok(());
        }

        let duration = payload.duration();
        MuteHandler::apply_mute(ctx, query.chat_id, query.user_id, duration.seconds).await?;

        ctx.delete_logged(query.chat_id, query.message_id).await;

        let notice = duration.capped.then_some(MuteNotice::Capped);
        let text = MuteHandler::confirmation_text(
            ctx,
            query.user_id,
            &query.first_name,
            duration.seconds,
            notice,
            lang,
        );
        ctx.send_logged(query.chat_id, &text, None, None).await;
        ctx.answer_logged(&query.id, None).await;

        Ok(())
    }

    async fn handle_language_callback(
        ctx: &BotContext,
        query: &IncomingCallback,
        selected: Lang,
        lang: Lang,
    ) -> Result<(), HandlerError> {
        // in a private chat the user owns the chat
        if query.chat_id != query.user_id {
            let role = ctx.member_role(query.chat_id, query.user_id).await?;
            if !role.is_admin() {
                info!(
                    "Non-admin user {} tried to change the language of chat {}",
                    query.user_id, query.chat_id
                );
                let text = ctx.text("setlang_admin_only", lang);
                ctx.answer_logged(&query.id, Some(text.as_str())).await;
                return Ok(());
            }
        }

        if let Err(e) = ctx
            .store
            .set_language(query.chat_id, selected, query.user_id)
            .await
        {
            error!(
                "Failed to save language '{}' for chat {} (user {}): {}",
                selected.code(),
                query.chat_id,
                query.user_id,
                e
            );
            let text = ctx.text("setlang_failed", lang);
            ctx.answer_logged(&query.id, Some(text.as_str())).await;
            return Ok(());
        }

        info!(
            "Chat {} language set to '{}' by user {}",
            query.chat_id,
            selected.code(),
            query.user_id
        );

        // confirm in the language that was just picked
        let text = ctx.text("setlang_done", selected);
        ctx.send_logged(query.chat_id, &text, None, None).await;
        ctx.delete_logged(query.chat_id, query.message_id).await;
        ctx.answer_logged(&query.id, None).await;

        Ok(())
    }
}
