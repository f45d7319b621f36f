use log::info;

use crate::bot::{BotContext, Command, IncomingMessage};
use crate::handlers::{CallbackHandler, HandlerError, MuteHandler, MuteNotice};
use crate::localization::Lang;
use crate::utils::duration::{self, DurationInput, DEFAULT_MUTE_SECONDS};

pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle_command(
        ctx: &BotContext,
        msg: &IncomingMessage,
        cmd: Command,
    ) -> Result<(), HandlerError> {
        let lang = ctx.chat_language(msg.chat_id).await;

        match cmd {
            Command::MuteMe(arg) => Self::handle_muteme_command(ctx, msg, &arg, lang).await,
            Command::SetLang => Self::handle_setlang_command(ctx, msg, lang).await,
            Command::Help | Command::Start => {
                let text = ctx.text("help", lang);
                ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), None)
                    .await;
                Ok(())
            }
        }
    }

    async fn handle_muteme_command(
        ctx: &BotContext,
        msg: &IncomingMessage,
        arg: &str,
        lang: Lang,
    ) -> Result<(), HandlerError> {
        if !msg.is_group {
            let text = ctx.text("muteme_group_only", lang);
            ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), None)
                .await;
            return Ok(());
        }

        let (seconds, notice) = match duration::classify(arg) {
            DurationInput::Empty => {
                let keyboard = CallbackHandler::create_mute_presets_keyboard(
                    &ctx.translations,
                    msg.user_id,
                    lang,
                );
                let text = ctx.text("muteme_choose", lang);
                ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), Some(keyboard))
                    .await;
                return Ok(());
            }
            DurationInput::Ambiguous(amount) => {
                let keyboard = CallbackHandler::create_unit_choice_keyboard(
                    &ctx.translations,
                    msg.user_id,
                    amount,
                    lang,
                );
                let amount = amount.to_string();
                let text = ctx.translations.resolve(
                    "muteme_ambiguous",
                    lang,
                    &[("amount", amount.as_str())],
                );
                ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), Some(keyboard))
                    .await;
                return Ok(());
            }
            DurationInput::Valid(parsed) => {
                (parsed.seconds, parsed.capped.then_some(MuteNotice::Capped))
            }
            DurationInput::Invalid => {
                info!(
                    "Unparsable duration '{}' from user {} in chat {}, using default",
                    arg, msg.user_id, msg.chat_id
                );
                (DEFAULT_MUTE_SECONDS, Some(MuteNotice::Invalid))
            }
        };

        let role = ctx.member_role(msg.chat_id, msg.user_id).await?;
        if role.is_admin() {
            let text = ctx.text("muteme_admin", lang);
            ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), None)
                .await;
            return Ok(());
        }

        MuteHandler::apply_mute(ctx, msg.chat_id, msg.user_id, seconds).await?;

        let text = MuteHandler::confirmation_text(
            ctx,
            msg.user_id,
            &msg.first_name,
            seconds,
            notice,
            lang,
        );
        ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), None)
            .await;

        Ok(())
    }

    async fn handle_setlang_command(
        ctx: &BotContext,
        msg: &IncomingMessage,
        lang: Lang,
    ) -> Result<(), HandlerError> {
        // in a private chat the user owns the chat
        if msg.is_group {
            let role = ctx.member_role(msg.chat_id, msg.user_id).await?;
            if !role.is_admin() {
                info!(
                    "Non-admin user {} tried /setlang in chat {}",
                    msg.user_id, msg.chat_id
                );
                let text = ctx.text("setlang_admin_only", lang);
                ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), None)
                    .await;
                return Ok(());
            }
        }

        let keyboard = CallbackHandler::create_language_keyboard(&ctx.translations);
        let text = ctx.text("setlang_choose", lang);
        ctx.send_logged(msg.chat_id, &text, Some(msg.message_id), Some(keyboard))
            .await;

        Ok(())
    }
}
