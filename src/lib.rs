pub mod bot;
pub mod config;
pub mod handlers;
pub mod language_store;
pub mod localization;
pub mod migrations;
pub mod server;
pub mod telegram;
pub mod utils;
