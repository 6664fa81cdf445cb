use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use hookcast_core::{Subscription, WebhookRegistration};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use super::config::PostgresConfig;
use super::migrations;
use crate::error::RepositoryError;
use crate::repository::WebhookRepository;

/// Column holding the flag for `subscription`.
fn subscription_column(subscription: Subscription) -> &'static str {
    match subscription {
        Subscription::SafeCreations => "send_safe_creations",
        Subscription::MultisigTransactions => "send_multisig_txs",
        Subscription::Confirmations => "send_confirmations",
        Subscription::EtherTransfers => "send_ether_transfers",
        Subscription::TokenTransfers => "send_token_transfers",
        Subscription::ModuleTransactions => "send_module_transactions",
        Subscription::Messages => "send_messages",
        Subscription::Reorgs => "send_reorgs",
        Subscription::Delegates => "send_delegates",
    }
}

/// Build `PgConnectOptions` from a [`PostgresConfig`], applying SSL settings
/// when configured.
fn build_connect_options(
    config: &PostgresConfig,
) -> Result<sqlx::postgres::PgConnectOptions, RepositoryError> {
    let mut options: sqlx::postgres::PgConnectOptions = config
        .url
        .parse()
        .map_err(|e: sqlx::Error| RepositoryError::Connection(e.to_string()))?;

    if let Some(ref mode) = config.ssl_mode {
        let ssl_mode = match mode.as_str() {
            "disable" => sqlx::postgres::PgSslMode::Disable,
            "prefer" => sqlx::postgres::PgSslMode::Prefer,
            "require" => sqlx::postgres::PgSslMode::Require,
            "verify-ca" => sqlx::postgres::PgSslMode::VerifyCa,
            "verify-full" => sqlx::postgres::PgSslMode::VerifyFull,
            other => {
                return Err(RepositoryError::Connection(format!(
                    "unknown ssl_mode: {other}"
                )));
            }
        };
        options = options.ssl_mode(ssl_mode);
    }

    if let Some(ref path) = config.ssl_root_cert {
        options = options.ssl_root_cert(path);
    }

    Ok(options)
}

/// Map one row of the webhook table onto a registration.
fn registration_from_row(row: &PgRow) -> Result<WebhookRegistration, RepositoryError> {
    let invalid = |e: sqlx::Error| RepositoryError::InvalidRecord(e.to_string());

    let mut subscriptions = BTreeMap::new();
    for subscription in Subscription::ALL {
        let enabled: bool = row
            .try_get(subscription_column(subscription))
            .map_err(invalid)?;
        subscriptions.insert(subscription, enabled);
    }

    Ok(WebhookRegistration {
        id: row.try_get::<Uuid, _>("id").map_err(invalid)?,
        description: row.try_get("description").map_err(invalid)?,
        url: row.try_get("url").map_err(invalid)?,
        authorization: row.try_get("authorization_header").map_err(invalid)?,
        chains: row.try_get("chains").map_err(invalid)?,
        subscriptions,
        is_active: row.try_get("is_active").map_err(invalid)?,
    })
}

/// PostgreSQL-backed implementation of [`WebhookRepository`].
///
/// Active registrations are returned ordered by creation time (then id), so
/// the delivery order is stable for an unchanged table.
pub struct PostgresWebhookRepository {
    pool: PgPool,
    config: Arc<PostgresConfig>,
}

impl PostgresWebhookRepository {
    /// Connect to `PostgreSQL`, create the pool and run migrations.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Connection`] if pool creation fails, or
    /// [`RepositoryError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, RepositoryError> {
        let connect_options = build_connect_options(&config)?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(connect_options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a repository from an existing pool. Runs migrations.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, RepositoryError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    fn select_active_query(&self) -> String {
        let flag_columns = Subscription::ALL
            .into_iter()
            .map(subscription_column)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT id, description, url, authorization_header, chains, is_active, {flag_columns} \
             FROM {} \
             WHERE is_active \
             ORDER BY created_at, id",
            self.config.webhook_table()
        )
    }
}

#[async_trait]
impl WebhookRepository for PostgresWebhookRepository {
    async fn find_all_active(&self) -> Result<Vec<WebhookRegistration>, RepositoryError> {
        let query = self.select_active_query();
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Backend(e.to_string()))?;

        debug!(rows = rows.len(), "fetched active webhooks");
        rows.iter().map(registration_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscription_has_a_distinct_column() {
        let mut columns: Vec<&str> = Subscription::ALL
            .into_iter()
            .map(subscription_column)
            .collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), Subscription::ALL.len());
    }

    #[test]
    fn connect_options_reject_unknown_ssl_mode() {
        let config = PostgresConfig {
            ssl_mode: Some("sometimes".into()),
            ..PostgresConfig::default()
        };
        let err = build_connect_options(&config).unwrap_err();
        assert!(matches!(err, RepositoryError::Connection(msg) if msg.contains("sometimes")));
    }

    #[test]
    fn connect_options_accept_known_ssl_mode() {
        let config = PostgresConfig {
            ssl_mode: Some("require".into()),
            ..PostgresConfig::default()
        };
        assert!(build_connect_options(&config).is_ok());
    }
}
