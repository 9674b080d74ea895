use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/tweets", get(handlers::list_tweets))
        .route("/api/tweets/:id", get(handlers::get_tweet))
        .route("/tweets/create/", post(handlers::create_tweet))
        .route("/tweets/:id/like/", post(handlers::like))
        .route("/tweets/:id/unlike/", post(handlers::unlike))
        .route("/tweets/:id/delete/", post(handlers::delete_tweet))
        .with_state(state)
}
