//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use tracing::info;
use uuid::Uuid;

use super::{
    error::ApiError,
    responses::{
        AuthResponse, HealthResponse, HistoryEntry, LoginRequest, ManualTimeRequest,
        MessageResponse, ModeRequest, PracticeRequest, RegisterRequest, ReportQuery,
        TimerSaveRequest,
    },
};
use crate::{
    models::{NewPracticeSession, UserDocument, UserUpdate},
    reports::{format_clock, HistoryFilter, RangeKind, Report},
    state::{AppState, SessionContext},
    timer::TimerSnapshot,
};

type ApiResult<T> = Result<T, ApiError>;

/// Handle POST /api/register - Create an account and return a token
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = payload?;
    let (token, user) = state.register(&req.username, &req.email, &req.password)?;
    info!("Register endpoint called - account {} created", user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Handle POST /api/login - Exchange credentials for a token
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;
    let (token, user) = state.login(&req.email, &req.password)?;
    Ok(Json(AuthResponse { token, user }))
}

/// Handle POST /api/logout - Revoke the presented token
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<StatusCode> {
    state.logout(&ctx)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /api/user - Return the caller's document
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<UserDocument>> {
    Ok(Json(state.user_document(&ctx)?))
}

/// Handle PUT /api/user - Partially update instruments, categories or sessions
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<Json<UserDocument>> {
    let Json(update) = payload?;
    Ok(Json(state.update_user(&ctx, update)?))
}

/// Handle DELETE /api/user - Delete the caller's account
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<MessageResponse>> {
    state.delete_user(&ctx)?;
    Ok(Json(MessageResponse::new("Account deleted")))
}

/// Handle POST /api/user/practice - Record a session directly
pub async fn add_practice_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    payload: Result<Json<PracticeRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserDocument>)> {
    let Json(req) = payload?;
    let session = NewPracticeSession::new(
        &req.instrument,
        &req.category,
        req.duration,
        req.notes.as_deref(),
        req.date.unwrap_or_else(|| state.now()),
    )?;
    let user = state.add_practice(&ctx, session)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle GET /api/user/practice - Filtered history, newest first
pub async fn list_practice_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    filter: Result<Query<HistoryFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let Query(filter) = filter?;
    let entries = state
        .practice_history(&ctx, &filter)?
        .into_iter()
        .map(|session| HistoryEntry {
            duration_formatted: format_clock(session.duration),
            session,
        })
        .collect();
    Ok(Json(entries))
}

/// Handle DELETE /api/user/practice/:id - Remove one session
pub async fn delete_practice_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<UserDocument>> {
    let Path(id) = id?;
    Ok(Json(state.delete_practice(&ctx, id)?))
}

/// Handle GET /api/timer - Current timer state with live elapsed time
pub async fn timer_status_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<TimerSnapshot>> {
    Ok(Json(state.timer_snapshot(&ctx)?))
}

/// Handle PUT /api/timer/mode - Switch between stopwatch and manual entry
pub async fn timer_mode_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    payload: Result<Json<ModeRequest>, JsonRejection>,
) -> ApiResult<Json<TimerSnapshot>> {
    let Json(req) = payload?;
    let (_, snapshot) = state.with_timer(&ctx, |timer| {
        timer.switch_mode(req.manual);
        Ok(())
    })?;
    Ok(Json(snapshot))
}

/// Handle POST /api/timer/start - Start or resume the stopwatch
pub async fn timer_start_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<TimerSnapshot>> {
    let (started, snapshot) = state.with_timer(&ctx, |timer| Ok(timer.start()))?;
    if started {
        info!("Timer started for user {}", ctx.user_id);
    }
    Ok(Json(snapshot))
}

/// Handle POST /api/timer/stop - Freeze the stopwatch
pub async fn timer_stop_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<TimerSnapshot>> {
    let (stopped, snapshot) = state.with_timer(&ctx, |timer| Ok(timer.stop()))?;
    if stopped {
        info!(
            "Timer stopped for user {} at {}s",
            ctx.user_id, snapshot.elapsed_seconds
        );
    }
    Ok(Json(snapshot))
}

/// Handle POST /api/timer/reset - Zero the timer
pub async fn timer_reset_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
) -> ApiResult<Json<TimerSnapshot>> {
    let (_, snapshot) = state.with_timer(&ctx, |timer| {
        timer.reset();
        Ok(())
    })?;
    Ok(Json(snapshot))
}

/// Handle PUT /api/timer/manual - Enter minutes and seconds by hand
pub async fn timer_manual_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    payload: Result<Json<ManualTimeRequest>, JsonRejection>,
) -> ApiResult<Json<TimerSnapshot>> {
    let Json(req) = payload?;
    let (_, snapshot) =
        state.with_timer(&ctx, |timer| timer.set_manual_time(req.minutes, req.seconds))?;
    Ok(Json(snapshot))
}

/// Handle POST /api/timer/save - Store the timer as a practice session
pub async fn timer_save_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    payload: Result<Json<TimerSaveRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserDocument>)> {
    let Json(req) = payload?;
    let user = state.save_timer(&ctx, &req.instrument, &req.category, req.notes.as_deref())?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handle GET /api/reports - Totals and breakdowns for a time range
pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    ctx: SessionContext,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<Report>> {
    let Query(query) = query?;
    let range = match query.range.as_deref() {
        Some(range) => range.parse::<RangeKind>()?,
        None => RangeKind::default(),
    };
    Ok(Json(state.report(&ctx, range)?))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        state.get_uptime(),
        state.port,
        state.host.clone(),
    ))
}
