use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::{
    ChatPermissions, InlineKeyboardMarkup, MessageId, ParseMode, ReplyParameters, UserId,
};
use teloxide::RequestError;

#[derive(Debug)]
pub enum ChatApiError {
    /// the provider answered but refused the call
    Rejected(String),
    Transport(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for ChatApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatApiError::Rejected(reason) => write!(f, "Request rejected by Telegram: {}", reason),
            ChatApiError::Transport(e) => write!(f, "Telegram request failed: {}", e),
        }
    }
}

impl Error for ChatApiError {}

impl From<RequestError> for ChatApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Api(api_error) => ChatApiError::Rejected(api_error.to_string()),
            other => ChatApiError::Transport(Box::new(other)),
        }
    }
}

/// membership status of a user in a chat
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

impl MemberRole {
    /// owners and administrators can't be restricted and may change chat settings
    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Administrator)
    }
}

/// the subset of the Telegram Bot API the handlers rely on
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// sends an HTML message and returns its message id
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<i32, ChatApiError>;

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), ChatApiError>;

    /// answers a button press, optionally with a toast
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), ChatApiError>;

    /// revokes the right to send messages until `until`
    async fn restrict_member(
        &self,
        chat_id: i64,
        user_id: i64,
        until: DateTime<Utc>,
    ) -> Result<(), ChatApiError>;

    async fn member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole, ChatApiError>;
}

pub struct TeloxideChatApi {
    bot: Bot,
}

impl TeloxideChatApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatApi for TeloxideChatApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i32>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<i32, ChatApiError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);

        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }

        let sent = request.await?;
        Ok(sent.id.0)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), ChatApiError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), ChatApiError> {
        let mut request = self.bot.answer_callback_query(callback_id.to_string());
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }

    async fn restrict_member(
        &self,
        chat_id: i64,
        user_id: i64,
        until: DateTime<Utc>,
    ) -> Result<(), ChatApiError> {
        // an empty permission set clears can_send_messages along with everything else
        self.bot
            .restrict_chat_member(ChatId(chat_id), UserId(user_id as u64), ChatPermissions::empty())
            .until_date(until)
            .await?;
        Ok(())
    }

    async fn member_role(&self, chat_id: i64, user_id: i64) -> Result<MemberRole, ChatApiError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id as u64))
            .await?;

        let kind = &member.kind;
        let role = if kind.is_owner() {
            MemberRole::Owner
        } else if kind.is_administrator() {
            MemberRole::Administrator
        } else if kind.is_restricted() {
            MemberRole::Restricted
        } else if kind.is_left() {
            MemberRole::Left
        } else if kind.is_banned() {
            MemberRole::Banned
        } else {
            MemberRole::Member
        };
        Ok(role)
    }
}
