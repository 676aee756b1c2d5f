use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::contest::{
        ContestStatusResponse, ContestSummary, EntryResponse, HelpResponse, PrizesResponse,
        RulesResponse, SubmitEntryRequest, SuggestQuery, SystemsResponse, UtcNowResponse,
    },
    error::{AppError, ErrorBody},
    routes::identity::resolve_caller,
    services::{entry_service, public_service},
    state::{Caller, SharedState},
};

/// Participant endpoints: entering the contest and reading its public state.
pub fn router(state: SharedState) -> Router<SharedState> {
    let entries = Router::new()
        .route("/contest/entries", post(submit_entry))
        .route("/contest/entries/me", get(my_entry))
        .route_layer(middleware::from_fn_with_state(state, resolve_caller));

    Router::new()
        .route("/contest/systems", get(list_systems))
        .route("/contest/systems/suggest", get(suggest_systems))
        .route("/contest/prizes", get(get_prizes))
        .route("/contest/rules", get(get_rules))
        .route("/contest/status", get(get_status))
        .route("/contest/history", get(get_history))
        .route("/contest/winners", get(get_winners))
        .route("/contest/time", get(get_time))
        .route("/contest/help", get(get_help))
        .merge(entries)
}

/// Submit the caller's single guess for the current contest.
#[utoipa::path(
    post,
    path = "/contest/entries",
    tag = "contest",
    params(
        ("X-User-Id" = String, Header, description = "Platform id of the participant"),
        ("X-Channel-Id" = Option<String>, Header, description = "Channel the command was issued from")
    ),
    request_body = SubmitEntryRequest,
    responses(
        (status = 201, description = "Entry recorded", body = EntryResponse),
        (status = 400, description = "System not on the allow-list", body = ErrorBody),
        (status = 409, description = "Contest closed, deadline passed, already entered or system taken", body = ErrorBody)
    )
)]
pub async fn submit_entry(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<SubmitEntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), AppError> {
    let entry = entry_service::submit_entry(&state, &caller, &payload.system).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Return the caller's entry in the current contest.
#[utoipa::path(
    get,
    path = "/contest/entries/me",
    tag = "contest",
    params(("X-User-Id" = String, Header, description = "Platform id of the participant")),
    responses(
        (status = 200, description = "Caller's entry", body = EntryResponse),
        (status = 404, description = "Caller has not entered yet", body = ErrorBody)
    )
)]
pub async fn my_entry(
    State(state): State<SharedState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<EntryResponse>, AppError> {
    Ok(Json(entry_service::my_entry(&state, &caller).await?))
}

/// List every system a guess may name.
#[utoipa::path(
    get,
    path = "/contest/systems",
    tag = "contest",
    responses((status = 200, description = "Allow-listed systems", body = SystemsResponse))
)]
pub async fn list_systems(State(state): State<SharedState>) -> Json<SystemsResponse> {
    Json(public_service::allowed_systems(&state))
}

/// Autocomplete a partially typed system name.
#[utoipa::path(
    get,
    path = "/contest/systems/suggest",
    tag = "contest",
    params(SuggestQuery),
    responses((status = 200, description = "Up to 25 matching systems", body = SystemsResponse))
)]
pub async fn suggest_systems(
    State(state): State<SharedState>,
    Query(query): Query<SuggestQuery>,
) -> Json<SystemsResponse> {
    Json(public_service::suggest_systems(&state, &query.q))
}

/// Return the prizes of the current contest.
#[utoipa::path(
    get,
    path = "/contest/prizes",
    tag = "contest",
    responses((status = 200, description = "Current prizes", body = PrizesResponse))
)]
pub async fn get_prizes(State(state): State<SharedState>) -> Result<Json<PrizesResponse>, AppError> {
    Ok(Json(public_service::prizes(&state).await?))
}

/// Return the contest rules.
#[utoipa::path(
    get,
    path = "/contest/rules",
    tag = "contest",
    responses((status = 200, description = "Contest rules", body = RulesResponse))
)]
pub async fn get_rules() -> Json<RulesResponse> {
    Json(public_service::rules())
}

/// Return the phase, deadline, entry count and outcome of the current contest.
#[utoipa::path(
    get,
    path = "/contest/status",
    tag = "contest",
    responses((status = 200, description = "Current contest status", body = ContestStatusResponse))
)]
pub async fn get_status(
    State(state): State<SharedState>,
) -> Result<Json<ContestStatusResponse>, AppError> {
    Ok(Json(public_service::contest_status(&state).await?))
}

/// Return every contest, newest first.
#[utoipa::path(
    get,
    path = "/contest/history",
    tag = "contest",
    responses((status = 200, description = "All contests, newest first", body = [ContestSummary]))
)]
pub async fn get_history(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ContestSummary>>, AppError> {
    Ok(Json(public_service::contest_history(&state).await?))
}

/// Return the contests that ended with a winner.
#[utoipa::path(
    get,
    path = "/contest/winners",
    tag = "contest",
    responses((status = 200, description = "Contests with a winner, newest first", body = [ContestSummary]))
)]
pub async fn get_winners(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ContestSummary>>, AppError> {
    Ok(Json(public_service::past_winners(&state).await?))
}

/// Return the server's current UTC time.
#[utoipa::path(
    get,
    path = "/contest/time",
    tag = "contest",
    responses((status = 200, description = "Current UTC time", body = UtcNowResponse))
)]
pub async fn get_time() -> Json<UtcNowResponse> {
    Json(public_service::utc_now())
}

/// List the available commands and the routes serving them.
#[utoipa::path(
    get,
    path = "/contest/help",
    tag = "contest",
    responses((status = 200, description = "Command reference", body = HelpResponse))
)]
pub async fn get_help() -> Json<HelpResponse> {
    Json(public_service::help())
}
