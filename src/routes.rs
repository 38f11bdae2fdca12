// Route definitions and rejection handling

use std::convert::Infallible;

use tracing::error;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::{self, SESSION_COOKIE};
use crate::error::AppError;
use crate::handlers;
use crate::models::ErrorResponse;
use crate::state::AppState;
use crate::store::User;

const FORM_LIMIT: u64 = 16 * 1024;
const JSON_LIMIT: u64 = 1024 * 1024;

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    page_routes(state.clone())
        .or(api_routes(state))
        .recover(handle_rejection)
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn session_token() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE)
}

/// Resolves the session user or rejects with 401
fn with_user(state: AppState) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    session_token()
        .and(with_state(state))
        .and_then(|token: Option<String>, state: AppState| async move {
            auth::require_authenticated(&state.store, &state.sessions, token.as_deref())
                .await
                .map_err(Rejection::from)
        })
}

fn page_routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    // GET /
    let index = warp::path::end()
        .and(warp::get())
        .and(session_token())
        .and(with_state(state.clone()))
        .and_then(handlers::index_handler);

    // GET /signup
    let signup_page = warp::path!("signup")
        .and(warp::get())
        .and(session_token())
        .and(with_state(state.clone()))
        .and_then(handlers::signup_page_handler);

    // POST /signup
    let signup = warp::path!("signup")
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(with_state(state.clone()))
        .and_then(handlers::signup_handler);

    // GET /login
    let login_page = warp::path!("login")
        .and(warp::get())
        .and(session_token())
        .and(with_state(state.clone()))
        .and_then(handlers::login_page_handler);

    // POST /login
    let login = warp::path!("login")
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(with_state(state.clone()))
        .and_then(handlers::login_handler);

    // GET /logout
    let logout = warp::path!("logout")
        .and(warp::get())
        .and(session_token())
        .and(with_state(state.clone()))
        .and_then(handlers::logout_handler);

    // GET /chat
    let chat_page = warp::path!("chat")
        .and(warp::get())
        .and(session_token())
        .and(with_state(state))
        .and_then(handlers::chat_page_handler);

    index
        .or(signup_page)
        .or(signup)
        .or(login_page)
        .or(login)
        .or(logout)
        .or(chat_page)
}

fn api_routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    // GET /api/me
    let me = warp::path!("api" / "me")
        .and(warp::get())
        .and(with_user(state.clone()))
        .and_then(handlers::me_handler);

    // GET /api/models
    let models = warp::path!("api" / "models")
        .and(warp::get())
        .and(with_user(state.clone()))
        .and_then(handlers::models_handler);

    // GET /api/chats
    let list_chats = warp::path!("api" / "chats")
        .and(warp::get())
        .and(with_user(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::list_chats_handler);

    // POST /api/chats
    let create_chat = warp::path!("api" / "chats")
        .and(warp::post())
        .and(with_user(state.clone()))
        .and(warp::body::content_length_limit(JSON_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::create_chat_handler);

    // GET /api/chats/{id}
    let get_chat = warp::path!("api" / "chats" / i64)
        .and(warp::get())
        .and(with_user(state.clone()))
        .and(with_state(state.clone()))
        .and_then(handlers::get_chat_handler);

    // POST /api/chats/{id}/message
    let send_message = warp::path!("api" / "chats" / i64 / "message")
        .and(warp::post())
        .and(with_user(state.clone()))
        .and(warp::body::content_length_limit(JSON_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::send_message_handler);

    // POST /api/chats/{id}/config
    let update_config = warp::path!("api" / "chats" / i64 / "config")
        .and(warp::post())
        .and(with_user(state.clone()))
        .and(warp::body::content_length_limit(JSON_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::update_chat_config_handler);

    // DELETE /api/chats/{id}
    let delete_chat = warp::path!("api" / "chats" / i64)
        .and(warp::delete())
        .and(with_user(state.clone()))
        .and(with_state(state))
        .and_then(handlers::delete_chat_handler);

    me.or(models)
        .or(list_chats)
        .or(create_chat)
        .or(get_chat)
        .or(send_message)
        .or(update_config)
        .or(delete_chat)
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error: message.into(),
        }),
        status,
    )
    .into_response()
}

/// Turn rejections into JSON error bodies
pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if let Some(app_error) = err.find::<AppError>() {
        if app_error.status().is_server_error() {
            error!(error = %app_error, "request failed");
        }
        return Ok(error_reply(app_error.status(), app_error.public_message()));
    }

    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "Not found")
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        error_reply(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_reply(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported content type")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        error_reply(StatusCode::LENGTH_REQUIRED, "Content-Length required")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        error!(rejection = ?err, "unhandled rejection");
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(reply)
}
