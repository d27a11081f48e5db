//! Settings for the application, read from an optional `settings.toml` and
//! from `FINOPT__*` environment variables (e.g. `FINOPT__SERVER__PORT`).
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "finopt", about = "Personal finance API server")]
struct Args {
    /// Config file path, with or without the `.toml` extension.
    #[arg(long, env = "FINOPT_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
    Url(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub base_url: Option<String>,
    pub database: Database,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    pub password_cost: Option<u32>,
}

impl Server {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind.as_deref().unwrap_or("127.0.0.1"), self.port)
    }

    /// Base URL for download links, derived from the bind address when unset.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.addr()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Webhook {
    pub user_created_url: Option<String>,
    pub report_uploaded_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl From<Webhook> for server::WebhookConfig {
    fn from(value: Webhook) -> Self {
        Self {
            user_created_url: value.user_created_url,
            report_uploaded_url: value.report_uploaded_url,
            timeout: Duration::from_secs(
                value.timeout_secs.unwrap_or(server::DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub webhook: Webhook,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        Self::load(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn load(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("FINOPT").separator("__"))
            .build()?
            .try_deserialize()
    }
}

fn default_level() -> String {
    String::from("info")
}

fn default_upload_dir() -> String {
    String::from("uploads/pdfs")
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::load(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let settings = from_toml(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.upload_dir, "uploads/pdfs");
        assert_eq!(settings.server.addr(), "127.0.0.1:3000");
        assert_eq!(settings.server.base_url(), "http://127.0.0.1:3000");
        assert_eq!(settings.server.database.url(), "sqlite::memory:");
        assert!(settings.webhook.user_created_url.is_none());
    }

    #[test]
    fn full_settings() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            base_url = "https://finance.example.com"
            database = { sqlite = "data/finopt.db" }
            upload_dir = "/var/lib/finopt"
            password_cost = 10

            [webhook]
            report_uploaded_url = "https://hooks.example.com/report"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.base_url(), "https://finance.example.com");
        assert_eq!(
            settings.server.database.url(),
            "sqlite:data/finopt.db?mode=rwc"
        );
        assert_eq!(settings.server.password_cost, Some(10));

        let webhook = server::WebhookConfig::from(settings.webhook);
        assert_eq!(
            webhook.report_uploaded_url.as_deref(),
            Some("https://hooks.example.com/report")
        );
        assert_eq!(webhook.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_server_section_is_an_error() {
        assert!(from_toml("[app]\nlevel = \"warn\"").is_err());
    }
}
