// Account pages: signup, login, logout and the chat shell

use warp::http::Uri;
use warp::reply::{html, with_header, Response};
use warp::{Rejection, Reply};

use crate::auth::{self, expired_session_cookie, session_cookie};
use crate::error::AppError;
use crate::models::{LoginForm, SignupForm};
use crate::pages;
use crate::state::AppState;

fn redirect(to: &'static str) -> Response {
    warp::redirect::see_other(Uri::from_static(to)).into_response()
}

fn redirect_with_cookie(to: &'static str, cookie: String) -> Response {
    with_header(
        warp::redirect::see_other(Uri::from_static(to)),
        "set-cookie",
        cookie,
    )
    .into_response()
}

async fn signed_in(state: &AppState, token: Option<&str>) -> Result<bool, AppError> {
    Ok(auth::resolve_current_user(&state.store, &state.sessions, token)
        .await?
        .is_some())
}

/// GET /
pub async fn index_handler(token: Option<String>, state: AppState) -> Result<Response, Rejection> {
    if signed_in(&state, token.as_deref()).await? {
        Ok(redirect("/chat"))
    } else {
        Ok(redirect("/login"))
    }
}

/// GET /signup
pub async fn signup_page_handler(
    token: Option<String>,
    state: AppState,
) -> Result<Response, Rejection> {
    if signed_in(&state, token.as_deref()).await? {
        return Ok(redirect("/chat"));
    }
    Ok(html(pages::signup_page(state.config.app_title(), None)).into_response())
}

/// POST /signup
pub async fn signup_handler(form: SignupForm, state: AppState) -> Result<Response, Rejection> {
    match auth::signup(
        &state.store,
        &state.sessions,
        &form.email,
        &form.username,
        &form.password,
    )
    .await
    {
        Ok((_, token)) => Ok(redirect_with_cookie(
            "/chat",
            session_cookie(&token, state.sessions.ttl(), state.config.secure_cookies),
        )),
        Err(e @ (AppError::Validation(_) | AppError::Duplicate)) => Ok(html(pages::signup_page(
            state.config.app_title(),
            Some(&e.public_message()),
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_page_handler(
    token: Option<String>,
    state: AppState,
) -> Result<Response, Rejection> {
    if signed_in(&state, token.as_deref()).await? {
        return Ok(redirect("/chat"));
    }
    Ok(html(pages::login_page(state.config.app_title(), None)).into_response())
}

/// POST /login
pub async fn login_handler(form: LoginForm, state: AppState) -> Result<Response, Rejection> {
    match auth::login(&state.store, &state.sessions, &form.email, &form.password).await {
        Ok((_, token)) => Ok(redirect_with_cookie(
            "/chat",
            session_cookie(&token, state.sessions.ttl(), state.config.secure_cookies),
        )),
        Err(e @ AppError::InvalidCredentials) => Ok(html(pages::login_page(
            state.config.app_title(),
            Some(&e.public_message()),
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
pub async fn logout_handler(token: Option<String>, state: AppState) -> Result<Response, Rejection> {
    auth::logout(&state.sessions, token.as_deref());
    Ok(redirect_with_cookie("/login", expired_session_cookie()))
}

/// GET /chat
pub async fn chat_page_handler(token: Option<String>, state: AppState) -> Result<Response, Rejection> {
    let user = auth::resolve_current_user(&state.store, &state.sessions, token.as_deref())
        .await
        .map_err(Rejection::from)?;

    match user {
        Some(user) => Ok(html(pages::chat_page(state.config.app_title(), &user.username)).into_response()),
        None => Ok(redirect("/login")),
    }
}
