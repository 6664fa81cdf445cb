use sqlx::PgPool;

use super::config::PostgresConfig;

/// Create the webhook table if it does not exist.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let table = config.webhook_table();

    let create_table = format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id UUID PRIMARY KEY,
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL,
            authorization_header TEXT,
            chains TEXT[] NOT NULL DEFAULT '{{}}',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            send_safe_creations BOOLEAN NOT NULL DEFAULT TRUE,
            send_multisig_txs BOOLEAN NOT NULL DEFAULT TRUE,
            send_confirmations BOOLEAN NOT NULL DEFAULT TRUE,
            send_ether_transfers BOOLEAN NOT NULL DEFAULT TRUE,
            send_token_transfers BOOLEAN NOT NULL DEFAULT TRUE,
            send_module_transactions BOOLEAN NOT NULL DEFAULT TRUE,
            send_messages BOOLEAN NOT NULL DEFAULT TRUE,
            send_reorgs BOOLEAN NOT NULL DEFAULT TRUE,
            send_delegates BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    let create_active_idx = format!(
        "CREATE INDEX IF NOT EXISTS {}_active_idx ON {table} (is_active, created_at)",
        config.table
    );

    sqlx::query(&create_table).execute(pool).await?;
    sqlx::query(&create_active_idx).execute(pool).await?;

    Ok(())
}
