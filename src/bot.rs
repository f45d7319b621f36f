use log::{error, info, warn};
use std::sync::Arc;
use teloxide::types::{
    CallbackQuery, InlineKeyboardMarkup, MaybeInaccessibleMessage, Message, Update, UpdateKind,
};
use teloxide::utils::command::BotCommands;

use crate::handlers::{CallbackHandler, CommandHandler, HandlerError};
use crate::language_store::LanguageStore;
use crate::localization::{Lang, Translations};
use crate::telegram::{ChatApi, MemberRole};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "mute yourself, e.g. /muteme 45m, /muteme 2h or /muteme 1d")]
    MuteMe(String),
    #[command(description = "choose the bot language for this chat (administrators only)")]
    SetLang,
    #[command(description = "show this help")]
    Help,
    #[command(description = "show this help")]
    Start,
}

/// shared by every request; nothing in here is mutated while handling updates
#[derive(Clone)]
pub struct BotContext {
    pub api: Arc<dyn ChatApi>,
    pub store: Arc<dyn LanguageStore>,
    pub translations: Arc<Translations>,
}

/// text message that may carry a command
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub user_id: i64,
    pub first_name: String,
    pub text: String,
    pub is_group: bool,
}

impl IncomingMessage {
    pub fn from_message(msg: &Message) -> Option<Self> {
        let text = msg.text()?;
        let from = msg.from.as_ref()?;

        Some(Self {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            user_id: from.id.0 as i64,
            first_name: from.first_name.clone(),
            text: text.to_string(),
            is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
        })
    }
}

/// inline button press on one of the bot's prompts
#[derive(Debug, Clone)]
pub struct IncomingCallback {
    pub id: String,
    pub data: String,
    pub user_id: i64,
    pub first_name: String,
    pub chat_id: i64,
    /// the prompt the button belongs to
    pub message_id: i32,
}

impl IncomingCallback {
    pub fn from_query(query: &CallbackQuery) -> Option<Self> {
        let data = query.data.clone()?;
        let (chat_id, message_id) = match query.message.as_ref()? {
            MaybeInaccessibleMessage::Regular(msg) => (msg.chat.id.0, msg.id.0),
            MaybeInaccessibleMessage::Inaccessible(msg) => (msg.chat.id.0, msg.message_id.0),
        };

        Some(Self {
            id: query.id.to_string(),
            data,
            user_id: query.from.id.0 as i64,
            first_name: query.from.first_name.clone(),
            chat_id,
            message_id,
        })
    }
}

impl BotContext {
    pub fn new(
        api: Arc<dyn ChatApi>,
        store: Arc<dyn LanguageStore>,
        translations: Arc<Translations>,
    ) -> Self {
        Self {
            api,
            store,
            translations,
        }
    }

    /// the chat's stored language, or the default when none is stored or the store fails
    pub async fn chat_language(&self, chat_id: i64) -> Lang {
        match self.store.get_language(chat_id).await {
            Ok(lang) => lang.unwrap_or_default(),
            Err(e) => {
                error!("Failed to load language for chat {}: {}", chat_id, e);
                Lang::default()
            }
        }
    }

    pub fn text(&self, key: &str, lang: Lang) -> String {
        self.translations.resolve(key, lang, &[])
    }

    pub async fn member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole, HandlerError> {
        self.api.member_role(chat_id, user_id).await.map_err(|e| {
            error!(
                "Failed to get member status of user {} in chat {}: {}",
                user_id, chat_id, e
            );
            HandlerError::ChatApi(e)
        })
    }

    /// sends a message whose delivery doesn't change the outcome of the request
    pub async fn send_logged(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Option<i32> {
        match self.api.send_message(chat_id, text, reply_to, keyboard).await {
            Ok(message_id) => Some(message_id),
            Err(e) => {
                error!("Failed to send message to chat {}: {}", chat_id, e);
                None
            }
        }
    }

    pub async fn delete_logged(&self, chat_id: i64, message_id: i32) {
        if let Err(e) = self.api.delete_message(chat_id, message_id).await {
            error!(
                "Failed to delete message {} in chat {}: {}",
                message_id, chat_id, e
            );
        }
    }

    pub async fn answer_logged(&self, callback_id: &str, text: Option<&str>) {
        if let Err(e) = self.api.answer_callback(callback_id, text).await {
            error!("Failed to answer callback query {}: {}", callback_id, e);
        }
    }
}

/// routes one webhook update to the command or callback handlers
pub async fn handle_update(
    ctx: &BotContext,
    bot_username: &str,
    update: Update,
) -> Result<(), HandlerError> {
    match update.kind {
        UpdateKind::Message(msg) => {
            let Some(incoming) = IncomingMessage::from_message(&msg) else {
                return Ok(());
            };

            match Command::parse(&incoming.text, bot_username) {
                Ok(cmd) => {
                    info!(
                        "Received {:?} from user {} in chat {}",
                        cmd, incoming.user_id, incoming.chat_id
                    );
                    CommandHandler::handle_command(ctx, &incoming, cmd).await
                }
                // plain chatter or a command addressed to another bot
                Err(_) => Ok(()),
            }
        }
        UpdateKind::CallbackQuery(query) => match IncomingCallback::from_query(&query) {
            Some(incoming) => CallbackHandler::handle_callback_query(ctx, &incoming).await,
            None => {
                warn!(
                    "Ignoring callback query {} without data or message",
                    query.id.to_string()
                );
                Ok(())
            }
        },
        _ => Ok(()),
    }
}
