// /api/chats handlers

use warp::{Rejection, Reply};

use crate::chats;
use crate::models::{CreateChatRequest, OkResponse, UpdateChatConfigRequest};
use crate::state::AppState;
use crate::store::User;

/// GET /api/chats
pub async fn list_chats_handler(user: User, state: AppState) -> Result<impl Reply, Rejection> {
    let chats = chats::list_chats(&state.store, &user).await?;
    Ok(warp::reply::json(&chats))
}

/// POST /api/chats
pub async fn create_chat_handler(
    user: User,
    request: CreateChatRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let created = chats::create_chat(&state.store, &user, request).await?;
    Ok(warp::reply::json(&created))
}

/// GET /api/chats/{id}
pub async fn get_chat_handler(
    chat_id: i64,
    user: User,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let detail = chats::get_chat(&state.store, &user, chat_id).await?;
    Ok(warp::reply::json(&detail))
}

/// POST /api/chats/{id}/config
pub async fn update_chat_config_handler(
    chat_id: i64,
    user: User,
    request: UpdateChatConfigRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    chats::update_chat_config(&state.store, &user, chat_id, request).await?;
    Ok(warp::reply::json(&OkResponse::OK))
}

/// DELETE /api/chats/{id}
pub async fn delete_chat_handler(
    chat_id: i64,
    user: User,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    chats::delete_chat(&state.store, &user, chat_id).await?;
    Ok(warp::reply::json(&OkResponse::OK))
}
