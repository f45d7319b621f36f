pub mod callback_handler;
pub mod command_handler;
pub mod mute_handler;

pub use callback_handler::CallbackHandler;
pub use command_handler::CommandHandler;
pub use mute_handler::{MuteCallback, MuteHandler, MuteNotice};

use std::error::Error;
use std::fmt;

use crate::telegram::ChatApiError;

#[derive(Debug)]
pub enum HandlerError {
    /// the mute itself could not be applied
    RestrictFailed {
        chat_id: i64,
        user_id: i64,
        source: ChatApiError,
    },
    ChatApi(ChatApiError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::RestrictFailed {
                chat_id,
                user_id,
                source,
            } => write!(
                f,
                "Failed to restrict user {} in chat {}: {}",
                user_id, chat_id, source
            ),
            HandlerError::ChatApi(e) => write!(f, "{}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::RestrictFailed { source, .. } => Some(source),
            HandlerError::ChatApi(e) => Some(e),
        }
    }
}

impl From<ChatApiError> for HandlerError {
    fn from(err: ChatApiError) -> Self {
        HandlerError::ChatApi(err)
    }
}
