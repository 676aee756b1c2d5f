use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Whether the contest database answered.
    pub storage_reachable: bool,
}

impl HealthResponse {
    /// The database answered; commands can be served.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            storage_reachable: true,
        }
    }

    /// The database did not answer; commands will error until it recovers.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            storage_reachable: false,
        }
    }
}
