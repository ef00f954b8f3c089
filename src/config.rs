//! # Bot Configuration Module
//!
//! Everything is read once at startup from the process environment (via
//! `.env` in development). The variable names are the deployment's existing
//! ones, so a configured environment keeps working.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store_config::{ReconnectConfig, StoreConfig, DEFAULT_FTP_PORT};

pub const DEFAULT_DOWNLOAD_PATH: &str = "./downloads";
pub const DEFAULT_REMOTE_DIR: &str = "/www/gallery";
pub const DEFAULT_WEBHOOK_PORT: u16 = 8443;

/// Startup configuration for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Public base URL for webhook mode
    pub web_url: Option<String>,
    /// Local port the webhook listener binds to
    pub port: u16,
    /// Scratch directory for downloaded photos
    pub download_dir: PathBuf,
    /// Telegram user ids allowed to manage the gallery; empty admits everyone
    pub admin_ids: Vec<u64>,
    /// Remote store connection settings
    pub store: StoreConfig,
    /// Reconnect and timeout policy for the store adapter
    pub reconnect: ReconnectConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN must be set")?;
        let web_url = env::var("WEBURL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string());
        let port = match env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_WEBHOOK_PORT,
        };
        let download_dir =
            PathBuf::from(env::var("LOCAL_DOWNLOAD_PATH").unwrap_or_else(|_| {
                DEFAULT_DOWNLOAD_PATH.to_string()
            }));
        let admin_ids = parse_admin_ids(&env::var("ADMIN_IDS").unwrap_or_default())?;

        let store = StoreConfig {
            host: env::var("FTP_HOST").context("FTP_HOST must be set")?,
            port: match env::var("FTP_PORT") {
                Ok(port) => port.parse().context("FTP_PORT must be a port number")?,
                Err(_) => DEFAULT_FTP_PORT,
            },
            user: env::var("FTP_USER").context("FTP_USER must be set")?,
            password: env::var("FTP_PASS").context("FTP_PASS must be set")?,
            remote_dir: env::var("FTP_UPLOAD_DIR")
                .unwrap_or_else(|_| DEFAULT_REMOTE_DIR.to_string()),
        };

        Ok(Self {
            bot_token,
            web_url,
            port,
            download_dir,
            admin_ids,
            store,
            reconnect: ReconnectConfig::default(),
        })
    }

    /// Whether this Telegram user may manage the gallery.
    ///
    /// An empty allow-list admits everyone; that keeps local development
    /// setups working without extra configuration.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }
}

fn parse_admin_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("invalid admin id in ADMIN_IDS: {part}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_admins(admin_ids: Vec<u64>) -> BotConfig {
        BotConfig {
            bot_token: "token".to_string(),
            web_url: None,
            port: DEFAULT_WEBHOOK_PORT,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_PATH),
            admin_ids,
            store: StoreConfig {
                host: "example.org".to_string(),
                port: DEFAULT_FTP_PORT,
                user: "user".to_string(),
                password: "pass".to_string(),
                remote_dir: DEFAULT_REMOTE_DIR.to_string(),
            },
            reconnect: ReconnectConfig::default(),
        }
    }

    #[test]
    fn test_parse_admin_ids() {
        assert_eq!(parse_admin_ids("").unwrap(), Vec::<u64>::new());
        assert_eq!(parse_admin_ids("123, 456").unwrap(), vec![123, 456]);
        assert!(parse_admin_ids("abc").is_err());
    }

    #[test]
    fn test_empty_allow_list_admits_everyone() {
        let config = config_with_admins(vec![]);
        assert!(config.is_admin(42));
    }

    #[test]
    fn test_allow_list_restricts() {
        let config = config_with_admins(vec![123]);
        assert!(config.is_admin(123));
        assert!(!config.is_admin(42));
    }
}
