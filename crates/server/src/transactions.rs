//! Transactions API endpoints

use api_types::{
    Deleted,
    transaction::{TransactionNew, TransactionView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ApiJson, ServerError, parse_id, server::ServerState};

fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        transaction_date: tx.transaction_date,
        is_expense: tx.is_expense,
        amount_minor: tx.amount_minor,
        description: tx.description,
        category: tx.category,
        merchant: tx.merchant,
    }
}

pub async fn transaction_new(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cmd = engine::TransactionNew {
        user_id: payload.user_id,
        transaction_date: payload.transaction_date,
        is_expense: payload.is_expense,
        amount_minor: payload.amount_minor,
        description: payload.description,
        category: payload.category,
        merchant: payload.merchant,
    };
    let tx = state.engine.new_transaction(cmd).await?;

    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

/// Transactions of a user, newest first.
pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let txs = state.engine.transactions_for_user(&user_id).await?;
    Ok(Json(txs.into_iter().map(transaction_view).collect()))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ServerError> {
    let id = parse_id(&id, "transaction")?;
    state.engine.delete_transaction(&id.to_string()).await?;
    Ok(Json(Deleted { id }))
}
