//! Authorization gate.
//!
//! Applied with `route_layer` to protected route groups. Requires an
//! identity (401 otherwise) and a policy rule granting the caller's role the
//! matched route template and method (403 otherwise).

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;

/// Axum middleware: allow or deny the request using the policy enforcer.
pub async fn authorize(
    State(state): State<AppState>,
    auth: AuthContext,
    route: MatchedPath,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = request.method().as_str();

    let Some(role) = auth.role() else {
        debug!(route = route.as_str(), method, "denied: no identity");
        return Err(AppError::Unauthorized("authentication required".into()));
    };

    if !state.enforcer.is_allowed(role, route.as_str(), method) {
        debug!(
            %role,
            user_id = auth.user_id(),
            route = route.as_str(),
            method,
            "denied: no matching policy"
        );
        return Err(AppError::Forbidden("access denied".into()));
    }

    Ok(next.run(request).await)
}
