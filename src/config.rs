//! Application-level configuration loading, including the allow-list of FOB systems.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing::{info, warn};

use crate::dao::models::ChannelId;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FOB_CONTEST_CONFIG_PATH";
const DB_PATH_ENV: &str = "FOB_CONTEST_DB_PATH";
const ADMIN_TOKEN_ENV: &str = "FOB_CONTEST_ADMIN_TOKEN";
const CHANNEL_ID_ENV: &str = "DISCORD_CHANNEL_ID";
const BOT_TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";
const API_BASE_ENV: &str = "DISCORD_API_BASE";

const DEFAULT_DATABASE_PATH: &str = "contest.db";
const DEFAULT_COUNTDOWN_MINUTES: u64 = 60;
const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Display names of the systems participants may guess.
    pub allowed_systems: Vec<String>,
    /// Period of the countdown scheduler.
    pub countdown_interval: Duration,
    /// Offset that naive `YYYY-MM-DD HH:MM` deadlines are interpreted in.
    pub deadline_offset: UtcOffset,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Channel used for announcements and as the countdown fallback.
    pub announce_channel_id: Option<ChannelId>,
    /// Token that grants admin rights when presented by a caller.
    pub admin_token: Option<String>,
    /// Bot token for the Discord notifier; the in-memory notifier is used without it.
    pub discord_bot_token: Option<String>,
    /// Base URL of the Discord REST API.
    pub discord_api_base: String,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    RawConfig::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                RawConfig::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                RawConfig::default()
            }
        };

        let mut config = Self::from(raw);
        config.apply_env_overrides();
        info!(
            systems = config.allowed_systems.len(),
            interval_minutes = config.countdown_interval.as_secs() / 60,
            database = %config.database_path.display(),
            admin_token = config.admin_token.is_some(),
            "configuration ready"
        );
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Some(path) = env_string(DB_PATH_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(token) = env_string(ADMIN_TOKEN_ENV) {
            self.admin_token = Some(token);
        }
        if let Some(raw) = env_string(CHANNEL_ID_ENV) {
            match raw.parse() {
                Ok(id) => self.announce_channel_id = Some(id),
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid {CHANNEL_ID_ENV}"),
            }
        }
        if let Some(token) = env_string(BOT_TOKEN_ENV) {
            self.discord_bot_token = Some(token);
        }
        if let Some(base) = env_string(API_BASE_ENV) {
            self.discord_api_base = base;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    allowed_systems: Option<Vec<String>>,
    countdown_interval_minutes: Option<u64>,
    deadline_utc_offset: Option<String>,
    database_path: Option<PathBuf>,
    announce_channel_id: Option<ChannelId>,
    admin_token: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let allowed_systems = value
            .allowed_systems
            .filter(|systems| !systems.is_empty())
            .unwrap_or_else(default_systems);

        let minutes = match value.countdown_interval_minutes {
            Some(0) => {
                warn!("countdown_interval_minutes must be positive; using default");
                DEFAULT_COUNTDOWN_MINUTES
            }
            Some(minutes) => minutes,
            None => DEFAULT_COUNTDOWN_MINUTES,
        };

        let deadline_offset = value
            .deadline_utc_offset
            .as_deref()
            .and_then(|raw| match UtcOffset::parse(raw, OFFSET_FORMAT) {
                Ok(offset) => Some(offset),
                Err(err) => {
                    warn!(value = %raw, error = %err, "invalid deadline_utc_offset; using UTC");
                    None
                }
            })
            .unwrap_or(UtcOffset::UTC);

        Self {
            allowed_systems,
            countdown_interval: Duration::from_secs(minutes * 60),
            deadline_offset,
            database_path: value
                .database_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            announce_channel_id: value.announce_channel_id,
            admin_token: value.admin_token.filter(|token| !token.is_empty()),
            discord_bot_token: None,
            discord_api_base: DEFAULT_DISCORD_API_BASE.to_string(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Built-in allow-list: the Caldari/Gallente warzone systems Guristas FOBs spawn in.
fn default_systems() -> Vec<String> {
    [
        "Aivonen",
        "Akidagi",
        "Aldranette",
        "Alparena",
        "Asakai",
        "Athounon",
        "Aubenall",
        "Brarel",
        "Deven",
        "Eha",
        "Enaluri",
        "Esesier",
        "Evaulon",
        "Frarie",
        "Harroule",
        "Hevrice",
        "Heydieles",
        "Hykanima",
        "Iges",
        "Immuri",
        "Ikoskio",
        "Intaki",
        "Iralaja",
        "Jovainnon",
        "Kedama",
        "Kehjari",
        "Kinakka",
        "Luminaire",
        "Mantenault",
        "Martoh",
        "Melmaniel",
        "Mercomesier",
        "Murethand",
        "Mushikegi",
        "Nikkishina",
        "Nisuwa",
        "Notoras",
        "Ocix",
        "Odamia",
        "Oicx",
        "Oinasiken",
        "Okagaiken",
        "Old Man Star",
        "Olletta",
        "Ostingele",
        "Oto",
        "Prism",
        "Pynekastoh",
        "Raihbaka",
        "Renarelle",
        "Reschard",
        "Sarenemi",
        "Sujarento",
        "Tama",
        "Tannolen",
        "Vaaralen",
        "Vey",
        "Vlillirier",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
