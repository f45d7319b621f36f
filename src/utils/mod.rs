pub mod duration;
pub mod message_formatter;

pub use message_formatter::MessageFormatter;
