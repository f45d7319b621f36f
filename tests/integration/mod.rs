use std::sync::Arc;

use muteme_bot::bot::{BotContext, Command, IncomingCallback, IncomingMessage};
use muteme_bot::handlers::{CallbackHandler, CommandHandler, HandlerError};
use muteme_bot::language_store::{LanguageStore, MemoryLanguageStore};
use muteme_bot::localization::Translations;
use teloxide::utils::command::BotCommands;

pub mod duration_tests;
pub mod webhook_tests;

use mock_bot::MockChatApi;
use test_utils::BOT_USERNAME;

/// bot wired to a recording api mock and an in-memory language store
pub struct TestBot {
    pub ctx: BotContext,
    pub api: Arc<MockChatApi>,
    pub store: Arc<MemoryLanguageStore>,
}

impl TestBot {
    pub fn new() -> Self {
        let api = Arc::new(MockChatApi::new());
        let store = Arc::new(MemoryLanguageStore::new());
        let ctx = BotContext::new(api.clone(), store.clone(), Self::translations());
        Self { ctx, api, store }
    }

    /// same bot, but language lookups and saves go to `store`
    pub fn with_store(store: Arc<dyn LanguageStore>) -> (BotContext, Arc<MockChatApi>) {
        let api = Arc::new(MockChatApi::new());
        let ctx = BotContext::new(api.clone(), store, Self::translations());
        (ctx, api)
    }

    pub fn translations() -> Arc<Translations> {
        Arc::new(Translations::embedded().expect("Embedded catalogs should parse"))
    }

    /// parses the message text like the webhook does and runs the command
    pub async fn send_command(&self, msg: &IncomingMessage) -> Result<(), HandlerError> {
        run_command(&self.ctx, msg).await
    }

    pub async fn press(&self, query: &IncomingCallback) -> Result<(), HandlerError> {
        CallbackHandler::handle_callback_query(&self.ctx, query).await
    }
}

pub async fn run_command(ctx: &BotContext, msg: &IncomingMessage) -> Result<(), HandlerError> {
    let cmd = Command::parse(&msg.text, BOT_USERNAME).expect("Test message should be a command");
    CommandHandler::handle_command(ctx, msg, cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(
            Command::parse("/muteme 25", BOT_USERNAME).unwrap(),
            Command::MuteMe("25".to_string())
        );
        assert_eq!(
            Command::parse(&format!("/muteme@{} 2h", BOT_USERNAME), BOT_USERNAME).unwrap(),
            Command::MuteMe("2h".to_string())
        );
        assert_eq!(
            Command::parse("/muteme", BOT_USERNAME).unwrap(),
            Command::MuteMe(String::new())
        );
        assert_eq!(
            Command::parse("/setlang", BOT_USERNAME).unwrap(),
            Command::SetLang
        );
        assert!(Command::parse("/muteme@some_other_bot 2h", BOT_USERNAME).is_err());
        assert!(Command::parse("hello there", BOT_USERNAME).is_err());
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryLanguageStore::new();
        assert_eq!(store.get_language(-1).await.unwrap(), None);

        store
            .set_language(-1, muteme_bot::localization::Lang::Uk, 7)
            .await
            .unwrap();
        store
            .set_language(-1, muteme_bot::localization::Lang::En, 8)
            .await
            .unwrap();

        assert_eq!(
            store.get_language(-1).await.unwrap(),
            Some(muteme_bot::localization::Lang::En)
        );
        assert_eq!(store.get_language(-2).await.unwrap(), None);
    }
}
