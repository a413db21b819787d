pub mod commands;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::middleware::require_access_token;
use crate::state::AppState;

/// All HTTP routes. Everything except `/health` requires the access token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(routes::health));

    let protected_routes = Router::new()
        .route("/codes/issue", post(routes::issue_code))
        .route("/codes/check", post(routes::check_code))
        .route("/codes/revoke", post(routes::revoke_code))
        .route(
            "/bindings/chat/{chat_id}",
            get(routes::get_binding_by_chat).delete(routes::delete_binding_by_chat),
        )
        .route(
            "/bindings/game/{game_id}",
            get(routes::get_binding_by_game).delete(routes::delete_binding_by_game),
        )
        .route("/commands", get(routes::list_commands).post(routes::run_command))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_access_token,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
