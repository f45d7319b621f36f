use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use log::{info, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use tokio::sync::Mutex;
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::localization::Lang;
use crate::migrations::MigrationManager;

#[derive(Debug)]
pub enum StoreError {
    Database(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl Error for StoreError {}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        StoreError::Database(Box::new(err))
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Database(Box::new(err))
    }
}

/// last-write-wins storage of each chat's reply language
#[async_trait]
pub trait LanguageStore: Send + Sync {
    async fn get_language(&self, chat_id: i64) -> Result<Option<Lang>, StoreError>;

    /// `updated_by` is the administrator who picked the language
    async fn set_language(&self, chat_id: i64, lang: Lang, updated_by: i64)
        -> Result<(), StoreError>;
}

/// keeps preferences in process memory, they are lost on restart
#[derive(Default)]
pub struct MemoryLanguageStore {
    languages: Mutex<HashMap<i64, Lang>>,
}

impl MemoryLanguageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LanguageStore for MemoryLanguageStore {
    async fn get_language(&self, chat_id: i64) -> Result<Option<Lang>, StoreError> {
        Ok(self.languages.lock().await.get(&chat_id).copied())
    }

    async fn set_language(
        &self,
        chat_id: i64,
        lang: Lang,
        _updated_by: i64,
    ) -> Result<(), StoreError> {
        self.languages.lock().await.insert(chat_id, lang);
        Ok(())
    }
}

pub struct PostgresLanguageStore {
    pool: Pool,
}

impl PostgresLanguageStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// builds a TLS pool for `database_url` and brings the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let mut config = Config::new();
        config.url = Some(database_url.to_string());
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls = MakeRustlsConnect::new(
            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth(),
        );
        let pool = config
            .create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| StoreError::Database(Box::new(e)))?;

        MigrationManager::run_migrations(&pool)
            .await
            .map_err(StoreError::Database)?;

        info!("Connected to the language preference database");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl LanguageStore for PostgresLanguageStore {
    async fn get_language(&self, chat_id: i64) -> Result<Option<Lang>, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT language_code FROM chat_languages WHERE chat_id = $1",
                &[&chat_id],
            )
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let code: String = row.get(0);
        let lang = Lang::parse(&code);
        if lang.is_none() {
            warn!(
                "Chat {} has unsupported language '{}' stored, using default",
                chat_id, code
            );
        }
        Ok(lang)
    }

    async fn set_language(
        &self,
        chat_id: i64,
        lang: Lang,
        updated_by: i64,
    ) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client
            .execute(
                "INSERT INTO chat_languages (chat_id, language_code, updated_by, updated_at)
                 VALUES ($1, $2, $3, NOW())
                 ON CONFLICT (chat_id) DO UPDATE
                 SET language_code = EXCLUDED.language_code,
                     updated_by = EXCLUDED.updated_by,
                     updated_at = NOW()",
                &[&chat_id, &lang.code(), &updated_by],
            )
            .await?;
        Ok(())
    }
}
