// GET /api/me and GET /api/models

use warp::{Rejection, Reply};

use crate::chats::AVAILABLE_MODELS;
use crate::models::MeResponse;
use crate::store::User;

pub async fn me_handler(user: User) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&MeResponse::from(&user)))
}

/// Static list; no upstream call
pub async fn models_handler(_user: User) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&AVAILABLE_MODELS))
}
