use crate::interface_adapters::handlers::{login, logout, me, signup};
use crate::interface_adapters::state::AppState;
use axum::{routing::post, Router};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", post(me))
        .with_state(state)
}
