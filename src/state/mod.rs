/// Identity of the user issuing a command.
pub mod caller;
/// Contest phases and the events that move between them.
pub mod lifecycle;
pub mod settings;
pub mod systems;
/// Guarded execution of lifecycle transitions.
pub mod transitions;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::AppConfig, dao::contest_store::ContestStore, error::ServiceError,
    services::notifier::Notifier,
};

pub use self::caller::Caller;
pub use self::settings::Settings;
pub use self::systems::SystemCatalog;

/// Reference-counted handle on [`AppState`] handed to routers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state shared by every command handler and the countdown task.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn ContestStore>,
    notifier: Arc<dyn Notifier>,
    systems: SystemCatalog,
    lifecycle_gate: Mutex<()>,
    countdown_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ContestStore>,
        notifier: Arc<dyn Notifier>,
    ) -> SharedState {
        let systems = SystemCatalog::new(&config.allowed_systems);
        Arc::new(Self {
            config,
            store,
            notifier,
            systems,
            lifecycle_gate: Mutex::new(()),
            countdown_gate: Mutex::new(()),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Persisted store holding contests, entries and settings.
    pub fn store(&self) -> &dyn ContestStore {
        self.store.as_ref()
    }

    /// Outbound notification channel.
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Allow-list of guessable systems.
    pub fn systems(&self) -> &SystemCatalog {
        &self.systems
    }

    /// Read and decode the global settings.
    pub async fn settings(&self) -> Result<Settings, ServiceError> {
        let raw = self.store.load_settings().await?;
        Ok(Settings::from_map(&raw)?)
    }

    /// Serializes admin actions that read and then rewrite the lifecycle flags.
    pub fn lifecycle_gate(&self) -> &Mutex<()> {
        &self.lifecycle_gate
    }

    /// Serializes countdown ticks, periodic or forced.
    pub fn countdown_gate(&self) -> &Mutex<()> {
        &self.countdown_gate
    }
}
