use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        admin::{
            ActionResponse, BackupResponse, DeadlineResponse, EndContestRequest,
            EndContestResponse, EntryListResponse, NewContestRequest, NewContestResponse,
            SetDeadlineRequest, SetPrizesRequest,
        },
        contest::PrizesResponse,
    },
    error::{AppError, ErrorBody},
    routes::identity::resolve_caller,
    services::admin_service,
    state::{Caller, SharedState},
};

/// Admin-only endpoints driving the contest lifecycle.
///
/// Every handler re-checks the caller's admin flag, so a participant reaching
/// these routes gets a permission error rather than an action.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/contest/end", post(end_contest))
        .route("/admin/contest/open", post(open_contest))
        .route("/admin/contest/new", post(new_contest))
        .route("/admin/deadline", put(set_deadline).delete(clear_deadline))
        .route("/admin/prizes", put(set_prizes))
        .route("/admin/entries", get(list_entries))
        .route("/admin/backup", post(backup_database))
        .route_layer(middleware::from_fn_with_state(state, resolve_caller))
}

/// Close entries, record the FOB system and draw the winner.
#[utoipa::path(
    post,
    path = "/admin/contest/end",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token"),
        ("X-Channel-Id" = Option<String>, Header, description = "Channel the result is announced in")
    ),
    request_body = EndContestRequest,
    responses(
        (status = 200, description = "Contest closed", body = EndContestResponse),
        (status = 400, description = "FOB system not on the allow-list", body = ErrorBody),
        (status = 403, description = "Caller is not an admin", body = ErrorBody),
        (status = 409, description = "Already closed, already has a winner or no entries", body = ErrorBody)
    )
)]
pub async fn end_contest(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<EndContestRequest>,
) -> Result<Json<EndContestResponse>, AppError> {
    Ok(Json(
        admin_service::end_contest(&state, &caller, &payload.fob_system).await?,
    ))
}

/// Re-open a contest that was closed without a winner.
#[utoipa::path(
    post,
    path = "/admin/contest/open",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    responses(
        (status = 200, description = "Contest re-opened", body = ActionResponse),
        (status = 409, description = "Already open or already has a winner", body = ErrorBody)
    )
)]
pub async fn open_contest(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::open_contest(&state, &caller).await?))
}

/// Archive the current contest and start a new one.
#[utoipa::path(
    post,
    path = "/admin/contest/new",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token"),
        ("X-Channel-Id" = Option<String>, Header, description = "Channel the countdown is posted in")
    ),
    request_body = NewContestRequest,
    responses(
        (status = 200, description = "New contest started", body = NewContestResponse),
        (status = 400, description = "Deadline malformed or not in the future", body = ErrorBody)
    )
)]
pub async fn new_contest(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<NewContestRequest>,
) -> Result<Json<NewContestResponse>, AppError> {
    Ok(Json(
        admin_service::new_contest(&state, &caller, &payload.deadline).await?,
    ))
}

/// Set or move the entry deadline.
#[utoipa::path(
    put,
    path = "/admin/deadline",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token"),
        ("X-Channel-Id" = Option<String>, Header, description = "Channel the countdown is posted in")
    ),
    request_body = SetDeadlineRequest,
    responses(
        (status = 200, description = "Deadline set", body = DeadlineResponse),
        (status = 400, description = "Deadline malformed or not in the future", body = ErrorBody),
        (status = 409, description = "Contest already has a winner", body = ErrorBody)
    )
)]
pub async fn set_deadline(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<SetDeadlineRequest>,
) -> Result<Json<DeadlineResponse>, AppError> {
    Ok(Json(
        admin_service::set_deadline(&state, &caller, &payload.deadline).await?,
    ))
}

/// Remove the entry deadline and its countdown message.
#[utoipa::path(
    delete,
    path = "/admin/deadline",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    responses((status = 200, description = "Deadline cleared", body = ActionResponse))
)]
pub async fn clear_deadline(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::clear_deadline(&state, &caller).await?))
}

/// Replace the prize list.
#[utoipa::path(
    put,
    path = "/admin/prizes",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    request_body = SetPrizesRequest,
    responses(
        (status = 200, description = "Prize list replaced", body = PrizesResponse),
        (status = 400, description = "Invalid prize list", body = ErrorBody)
    )
)]
pub async fn set_prizes(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<SetPrizesRequest>,
) -> Result<Json<PrizesResponse>, AppError> {
    caller.require_admin("set prizes")?;
    payload.validate()?;
    Ok(Json(
        admin_service::set_prizes(&state, &caller, payload.prizes).await?,
    ))
}

/// List every entry of the current contest.
#[utoipa::path(
    get,
    path = "/admin/entries",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    responses((status = 200, description = "Entries ordered by user id", body = EntryListResponse))
)]
pub async fn list_entries(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<EntryListResponse>, AppError> {
    Ok(Json(admin_service::list_entries(&state, &caller).await?))
}

/// Write a timestamped copy of the database next to the live file.
#[utoipa::path(
    post,
    path = "/admin/backup",
    tag = "admin",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the admin"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    responses((status = 200, description = "Backup written", body = BackupResponse))
)]
pub async fn backup_database(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<BackupResponse>, AppError> {
    Ok(Json(admin_service::backup_database(&state, &caller).await?))
}
