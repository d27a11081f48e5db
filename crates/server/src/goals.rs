//! Savings goals API endpoints

use api_types::{
    Deleted,
    goal::{GoalAmount, GoalNew, GoalView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ApiJson, ServerError, parse_id, server::ServerState};

fn goal_view(goal: engine::Goal) -> GoalView {
    let reached = goal.is_reached();
    GoalView {
        id: goal.id,
        user_id: goal.user_id,
        title: goal.title,
        target_amount_minor: goal.target_amount_minor,
        current_amount_minor: goal.current_amount_minor,
        start_date: goal.start_date,
        end_date: goal.end_date,
        description: goal.description,
        created_at: goal.created_at,
        reached,
    }
}

pub async fn goal_new(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let cmd = engine::GoalNew {
        user_id: payload.user_id,
        title: payload.title,
        target_amount_minor: payload.target_amount_minor,
        current_amount_minor: payload.current_amount_minor,
        start_date: payload.start_date,
        end_date: payload.end_date,
        description: payload.description,
    };
    let goal = state.engine.new_goal(cmd).await?;

    Ok((StatusCode::CREATED, Json(goal_view(goal))))
}

pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state.engine.goals_for_user(&user_id).await?;
    Ok(Json(goals.into_iter().map(goal_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.goal(&id).await?;
    Ok(Json(goal_view(goal)))
}

pub async fn deposit(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<GoalAmount>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.deposit(&id, payload.amount_minor).await?;
    Ok(Json(goal_view(goal)))
}

/// Withdraw from a goal. A withdrawal above the balance is rejected with 400.
pub async fn withdraw(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<GoalAmount>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.withdraw(&id, payload.amount_minor).await?;
    Ok(Json(goal_view(goal)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let id = parse_id(&id, "goal")?;
    state.engine.delete_goal(&id.to_string()).await?;
    Ok(Json(Deleted { id }))
}
