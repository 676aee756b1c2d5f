//! Shared fixtures for unit tests: an [`AppState`] over a throwaway database.

use std::sync::Arc;

use tempfile::TempDir;

use crate::{
    config::AppConfig,
    dao::{
        contest_store::{
            ContestStore, SettingKey,
            sqlite::{SqliteConfig, SqliteContestStore},
        },
        models::{ChannelId, UserId},
    },
    services::notifier::MemoryNotifier,
    state::{AppState, Caller, SharedState, settings::Settings},
};

/// Admin token accepted by routers built from a [`TestContext`].
pub const ADMIN_TOKEN: &str = "test-admin-token";
/// Channel admin commands are issued from in tests.
pub const ADMIN_CHANNEL: ChannelId = ChannelId(500);
/// Configured announce channel.
pub const ANNOUNCE_CHANNEL: ChannelId = ChannelId(900);

pub struct TestContext {
    pub state: SharedState,
    pub notifier: MemoryNotifier,
    pub store: Arc<SqliteContestStore>,
    _dir: TempDir,
}

impl TestContext {
    pub fn new(systems: &[&str]) -> Self {
        Self::build(systems, Some(ANNOUNCE_CHANNEL))
    }

    pub fn without_announce_channel(systems: &[&str]) -> Self {
        Self::build(systems, None)
    }

    fn build(systems: &[&str], announce_channel_id: Option<ChannelId>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            SqliteContestStore::open(SqliteConfig::new(dir.path().join("contest.db"))).unwrap(),
        );
        let notifier = MemoryNotifier::new();
        let config = AppConfig {
            allowed_systems: systems.iter().map(|name| name.to_string()).collect(),
            announce_channel_id,
            admin_token: Some(ADMIN_TOKEN.to_string()),
            ..AppConfig::default()
        };
        let state = AppState::new(config, store.clone(), Arc::new(notifier.clone()));

        Self {
            state,
            notifier,
            store,
            _dir: dir,
        }
    }

    pub async fn settings(&self) -> Settings {
        self.state.settings().await.unwrap()
    }

    pub async fn put(&self, key: SettingKey, value: &str) {
        self.store.put_setting(key, value.to_string()).await.unwrap();
    }
}

pub fn user(id: u64) -> Caller {
    Caller {
        user_id: UserId(id),
        is_admin: false,
        channel_id: Some(ChannelId(100)),
    }
}

pub fn admin() -> Caller {
    Caller {
        user_id: UserId(1),
        is_admin: true,
        channel_id: Some(ADMIN_CHANNEL),
    }
}
