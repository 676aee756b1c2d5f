mod config;
mod error;
mod schema;
mod store;

pub use config::SqliteConfig;
pub use error::{SqliteDaoError, SqliteResult};
pub use store::SqliteContestStore;
