#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key-value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?;
        let jwt_secret =
            lookup("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let jwt_ttl_minutes = parse_or(&lookup, "JWT_TTL_MINUTES", 60)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_ttl_minutes,
            cors_origins,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_keys() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.jwt_ttl_minutes, 60);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://db/blog"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "15"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.db_max_connections, 4);
        assert_eq!(config.jwt_ttl_minutes, 15);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn missing_secret_and_bad_port_fail() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", "x"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }
}
