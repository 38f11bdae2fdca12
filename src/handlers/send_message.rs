// POST /api/chats/{id}/message handler

use warp::{Rejection, Reply};

use crate::messaging;
use crate::models::SendMessageRequest;
use crate::state::AppState;
use crate::store::User;

pub async fn send_message_handler(
    chat_id: i64,
    user: User,
    request: SendMessageRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let response = messaging::send_message(
        &state.store,
        state.completion.as_ref(),
        &state.chat_locks,
        &user,
        chat_id,
        request.content.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(warp::reply::json(&response))
}
