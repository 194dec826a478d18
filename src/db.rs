//! Database connection pool and migration management.

use std::{str::FromStr, time::Duration};

use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};

use crate::config::Config;

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Build connection options from configuration.
///
/// `DATABASE_URL` wins when it is set; otherwise the options are assembled
/// from the individual `DB_*` settings.
///
/// # Errors
///
/// Returns `sqlx::Error::Configuration` if the URL or the SSL mode is invalid.
pub fn connect_options(config: &Config) -> Result<PgConnectOptions, sqlx::Error> {
    if let Some(ref url) = config.database_url {
        return PgConnectOptions::from_str(url);
    }

    let ssl_mode = PgSslMode::from_str(&config.db_sslmode)?;

    Ok(PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name)
        .ssl_mode(ssl_mode))
}

/// Create a new PostgreSQL connection pool.
///
/// # Configuration
///
/// - Maximum connections: `DB_MAX_CONNECTIONS` (default 50)
/// - Connection lifetime: `DB_MAX_LIFETIME_SECS` (default 5 minutes)
/// - Acquire timeout: `DB_ACQUIRE_TIMEOUT_SECS` (default 5 seconds)
///
/// # Errors
///
/// Returns an error if the options are invalid or the server cannot be reached.
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    let options = connect_options(config)?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each one runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn components_build_options() {
        let options = connect_options(&config(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "ledger"),
        ]))
        .unwrap();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("ledger"));
    }

    #[test]
    fn url_takes_precedence() {
        let options = connect_options(&config(&[
            ("DATABASE_URL", "postgres://app@primary:5433/main"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();

        assert_eq!(options.get_host(), "primary");
        assert_eq!(options.get_port(), 5433);
    }

    #[test]
    fn unknown_ssl_mode_is_rejected() {
        let result = connect_options(&config(&[("DB_SSLMODE", "sometimes")]));
        assert!(result.is_err());
    }
}
