//! Connection configuration.

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL driver. PostgreSQL is the single supported flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Driver {
    #[default]
    #[serde(rename = "pgsql", alias = "postgres", alias = "postgresql")]
    Postgres,
}

impl Driver {
    pub fn name(self) -> &'static str {
        match self {
            Driver::Postgres => "pgsql",
        }
    }
}

impl FromStr for Driver {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pgsql" | "postgres" | "postgresql" => Ok(Driver::Postgres),
            other => Err(DbError::config(format!(
                "unsupported driver '{}' (supported: pgsql)",
                other
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where and as whom to connect. The database name is supplied at `connect`.
///
/// Deserializable so applications can keep it in their own config files:
///
/// ```toml
/// host = "db.internal"
/// port = 5433
/// user = "app"
/// password = "secret"
/// driver = "pgsql"
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub driver: Driver,
    /// Reported to the server as `application_name`.
    pub application_name: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            driver: Driver::Postgres,
            application_name: None,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("driver", &self.driver)
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Read `PGHOST`, `PGPORT`, `PGUSER`, `PGPASSWORD` and `PGFLUENT_DRIVER`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("PGHOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PGPORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| DbError::config(format!("invalid PGPORT '{}'", port)))?;
        }
        if let Some(user) = lookup("PGUSER") {
            config.user = user;
        }
        config.password = lookup("PGPASSWORD");
        if let Some(driver) = lookup("PGFLUENT_DRIVER") {
            config.driver = driver.parse()?;
        }
        Ok(config)
    }

    /// Build the `tokio_postgres` configuration for `database`.
    pub fn to_pg_config(&self, database: &str) -> DbResult<tokio_postgres::Config> {
        if self.host.trim().is_empty() {
            return Err(DbError::config("host must not be empty"));
        }
        if database.trim().is_empty() {
            return Err(DbError::config("database name must not be empty"));
        }

        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(database);
        if let Some(password) = &self.password {
            pg.password(password);
        }
        if let Some(name) = &self.application_name {
            pg.application_name(name);
        }
        Ok(pg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn driver_names() {
        assert_eq!("pgsql".parse::<Driver>().unwrap(), Driver::Postgres);
        assert_eq!("PostgreSQL".parse::<Driver>().unwrap(), Driver::Postgres);
        let err = "mysql".parse::<Driver>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("PGHOST", "db.internal"),
            ("PGPORT", "6432"),
            ("PGPASSWORD", "s3cret"),
        ]
        .into_iter()
        .collect();
        let config =
            ConnectionConfig::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn invalid_port_is_a_configuration_error() {
        let err = ConnectionConfig::from_lookup(|key| {
            (key == "PGPORT").then(|| "not-a-port".to_string())
        })
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn debug_redacts_password() {
        let config = ConnectionConfig::new().password("hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn deserializes_from_toml() {
        let config: ConnectionConfig = toml::from_str(
            r#"
            host = "db.internal"
            user = "app"
            driver = "postgres"
            "#,
        )
        .unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.user, "app");
        assert_eq!(config.port, 5432);
        assert_eq!(config.driver, Driver::Postgres);
    }

    #[test]
    fn pg_config_carries_database() {
        let pg = ConnectionConfig::new()
            .user("app")
            .port(5433)
            .to_pg_config("shop")
            .unwrap();
        assert_eq!(pg.get_dbname(), Some("shop"));
        assert_eq!(pg.get_user(), Some("app"));
        assert_eq!(pg.get_ports(), &[5433]);

        assert!(ConnectionConfig::new().to_pg_config(" ").is_err());
    }
}
