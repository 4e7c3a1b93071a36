use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub app_name: String,
    pub deployment: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub default_microplate_name: String,
    pub tests_running: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available

        // Either a full DB_URL, or the postgres parts, or a local sqlite file
        let db_url = env::var("DB_URL").ok().unwrap_or_else(|| {
            match (
                env::var("DB_USER"),
                env::var("DB_PASSWORD"),
                env::var("DB_HOST"),
                env::var("DB_NAME"),
            ) {
                (Ok(user), Ok(password), Ok(host), Ok(name)) => format!(
                    "{}://{user}:{password}@{host}:{}/{name}",
                    env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                    env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                ),
                _ => "sqlite://confluency_tracker.db?mode=rwc".to_string(),
            }
        });

        Config {
            db_url,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "confluency-api".to_string()),
            deployment: env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(5000),
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            default_microplate_name: env::var("DEFAULT_MICROPLATE_NAME")
                .unwrap_or_else(|_| "Plate-001".to_string()),
            tests_running: false,
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            db_url: "sqlite::memory:".to_string(),
            app_name: "confluency-api-test".to_string(),
            deployment: "test".to_string(),
            port: 0,
            cors_origins: vec![],
            default_microplate_name: "Plate-001".to_string(),
            tests_running: true,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}
