//! Users API endpoints

use api_types::user::{
    BlockedResponse, EmailQuery, UserDeleted, UserNew, UserUpdate, UserView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::{ApiJson, Event, ServerError, parse_id, server::ServerState, storage};

fn user_view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
        is_blocked: user.is_blocked,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn required_email(query: EmailQuery) -> Result<String, ServerError> {
    query
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| ServerError::Generic("email query parameter is required".to_string()))
}

/// Handle requests for creating a new user
pub async fn user_new(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let mut cmd = engine::UserNew::new(payload.user_name, payload.email);
    if let Some(password) = payload.password {
        cmd = cmd.password(password);
    }
    let user = state.engine.new_user(cmd).await?;

    state.notifier.notify(Event::UserCreated {
        user_id: user.id,
        user_name: user.user_name.clone(),
        email: user.email.clone(),
    });

    Ok((StatusCode::CREATED, Json(user_view(user))))
}

/// List every user, or look one up with `?email=`.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<EmailQuery>,
) -> Result<Response, ServerError> {
    if query.email.is_some() {
        let email = required_email(query)?;
        let user = state.engine.user_by_email(&email).await?;
        return Ok(Json(user_view(user)).into_response());
    }

    let users: Vec<UserView> = state
        .engine
        .users()
        .await?
        .into_iter()
        .map(user_view)
        .collect();
    Ok(Json(users).into_response())
}

pub async fn blocked(
    State(state): State<ServerState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<BlockedResponse>, ServerError> {
    let email = required_email(query)?;
    let is_blocked = state.engine.is_email_blocked(&email).await?;
    Ok(Json(BlockedResponse {
        email: email.trim().to_lowercase(),
        is_blocked,
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let update = engine::UserUpdate {
        user_name: payload.user_name,
        email: payload.email,
        is_blocked: payload.is_blocked,
    };
    let user = state.engine.update_user(&id, update).await?;
    Ok(Json(user_view(user)))
}

/// Delete a user with everything it owns, then clean up its report files.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<UserDeleted>, ServerError> {
    let id = parse_id(&id, "user")?;
    let report = state.engine.delete_user(&id.to_string()).await?;
    for path in &report.files {
        storage::remove_best_effort(path).await;
    }

    Ok(Json(UserDeleted {
        id,
        transactions: report.transactions,
        goals: report.goals,
        pdf_records: report.pdf_records,
    }))
}
