/*
 * Responsibility
 * - URL layout under /api
 * - /auth/login is public; everything else goes through the bearer gate
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::login,
    dashboard::dashboard_stats,
    members::{create_member, list_members},
    plans::list_plans,
    subscriptions::list_subscriptions,
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/auth/login", post(login));

    let protected = Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/plans", get(list_plans))
        .route("/subscriptions", get(list_subscriptions));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
