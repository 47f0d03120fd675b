//! Chat endpoints: questions and conversation history

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::Result;
use crate::server::auth::OwnerIdentity;
use crate::server::state::AppState;
use crate::types::{
    Conversation, QueryRequest, QueryResponse, SessionId, SummaryListResponse,
};

/// POST /chat - Answer a question over the caller's indexed documents.
///
/// Downstream failures degrade into a fallback answer rather than an error;
/// only request validation can fail here.
pub async fn ask_question(
    State(state): State<AppState>,
    OwnerIdentity(owner_id): OwnerIdentity,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let session_id = SessionId::parse(&request.session_id)?;

    tracing::info!("Question from '{}': \"{}\"", owner_id, request.question);

    let results = state
        .engine()
        .answer(&request.question, &owner_id, &session_id, request.top_k)
        .await?;

    Ok(Json(QueryResponse { results }))
}

/// GET /chat/conversation/:id - All messages of one conversation, oldest
/// first.
pub async fn list_messages(
    State(state): State<AppState>,
    OwnerIdentity(owner_id): OwnerIdentity,
    Path(id): Path<String>,
) -> Result<Json<Conversation>> {
    let session_id = SessionId::parse(&id)?;

    let messages = state.conversations().list_session(&owner_id, &session_id)?;

    Ok(Json(Conversation { messages }))
}

/// GET /chat/conversations - One summary row per conversation owned by the
/// caller, oldest conversation first.
pub async fn list_conversations(
    State(state): State<AppState>,
    OwnerIdentity(owner_id): OwnerIdentity,
) -> Result<Json<SummaryListResponse>> {
    let conversations = state.conversations().list_summaries(&owner_id)?;

    Ok(Json(SummaryListResponse { conversations }))
}
