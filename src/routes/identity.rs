use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    dao::models::{ChannelId, UserId},
    error::AppError,
    state::{Caller, SharedState},
};

const USER_ID_HEADER: &str = "x-user-id";
const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
const CHANNEL_ID_HEADER: &str = "x-channel-id";

/// Resolve who issued the request from its headers and attach it as a [`Caller`] extension.
///
/// `X-User-Id` is mandatory. A present `X-Admin-Token` must match the
/// configured token; without it the caller is a regular participant.
pub async fn resolve_caller(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let caller = caller_from_headers(&state, req.headers())?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

fn caller_from_headers(state: &SharedState, headers: &HeaderMap) -> Result<Caller, AppError> {
    let user_id = header_str(headers, USER_ID_HEADER)
        .ok_or_else(|| AppError::unauthorized("missing caller header `X-User-Id`"))?
        .parse::<UserId>()
        .map_err(|_| AppError::unauthorized("`X-User-Id` must be a numeric user id"))?;

    let is_admin = match header_str(headers, ADMIN_TOKEN_HEADER) {
        None => false,
        Some(provided) => match state.config().admin_token.as_deref() {
            Some(expected) if expected == provided => true,
            _ => return Err(AppError::unauthorized("invalid admin token")),
        },
    };

    let channel_id = header_str(headers, CHANNEL_ID_HEADER)
        .map(|raw| raw.parse::<ChannelId>())
        .transpose()
        .map_err(|_| AppError::unauthorized("`X-Channel-Id` must be a numeric channel id"))?;

    Ok(Caller {
        user_id,
        is_admin,
        channel_id,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
