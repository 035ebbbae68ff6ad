//! Bearer gate: verify `Authorization: Bearer <jwt>` and put the `Principal` into extensions.
//!
//! Every failure is rejected with 401 before the handler runs. The distinguishing kind only
//! goes to the log.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Protect every route registered on `router` so far.
///
/// ```ignore
/// let protected = Router::new().route("/members", get(list_members));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths still 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match state.verifier.authenticate(req.headers()) {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                method = %req.method(),
                path = %req.uri().path(),
                "access token rejected"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        subject_id = %principal.subject_id,
        role = %principal.role,
        "access token verified"
    );

    // middleware -> extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
