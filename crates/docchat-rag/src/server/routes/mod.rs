//! API routes for the document Q&A server

pub mod chat;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn app_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document upload - with larger body limit for multipart
        .route(
            "/upload/pdf",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Chat
        .route("/chat", post(chat::ask_question))
        .route("/chat/conversation/:id", get(chat::list_messages))
        .route("/chat/conversations", get(chat::list_conversations))
}
