use std::error::Error;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use url::Url;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} environment variable is required", name),
            ConfigError::Invalid { name, reason } => {
                write!(f, "{} environment variable is invalid: {}", name, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// public URL Telegram posts updates to, its path is served locally
    pub webhook_url: Url,
    pub webhook_secret: Option<String>,
    pub bind_addr: SocketAddr,
    /// memory store is used when unset
    pub database_url: Option<String>,
    /// overrides the embedded catalogs
    pub locales_dir: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// builds the config from any variable source, empty values count as unset
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bot_token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let webhook_url = var("WEBHOOK_URL").ok_or(ConfigError::Missing("WEBHOOK_URL"))?;
        let webhook_url = Url::parse(&webhook_url).map_err(|e| ConfigError::Invalid {
            name: "WEBHOOK_URL",
            reason: e.to_string(),
        })?;
        if webhook_url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                name: "WEBHOOK_URL",
                reason: "Telegram only delivers webhooks over https".to_string(),
            });
        }

        let host = match var("BIND_ADDR") {
            Some(addr) => addr.parse::<IpAddr>().map_err(|e| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match var("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bot_token,
            webhook_url,
            webhook_secret: var("WEBHOOK_SECRET"),
            bind_addr: SocketAddr::new(host, port),
            database_url: var("DATABASE_URL"),
            locales_dir: var("LOCALES_DIR").map(PathBuf::from),
        })
    }

    /// local route for updates, taken from the webhook URL
    pub fn webhook_path(&self) -> String {
        match self.webhook_url.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        }
    }
}
