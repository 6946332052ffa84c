use axum::{
    Router,
    middleware::from_fn,
    routing::{any, get},
};

use crate::app::errors;
use crate::middleware::session_middleware;

pub mod events;
pub mod exchange;
pub mod system;

/// The route table. Built once at construction, immutable afterwards.
///
/// Path is matched before method: an unknown path is always 404, a known
/// path with an unsupported method is always 405. `/events` routes are
/// additionally guarded by the session-cookie middleware, which runs
/// before method matching (a cookieless DELETE is a 400, not a 405).
pub fn router() -> Router {
    let session_scoped = Router::new()
        .route(
            "/events",
            get(events::get_events)
                .post(events::post_events)
                .fallback(errors::method_not_allowed),
        )
        .layer(from_fn(session_middleware));

    Router::new()
        .route(
            "/exchange",
            get(exchange::get_public_key)
                .post(exchange::post_user_secret)
                .fallback(errors::method_not_allowed),
        )
        .merge(session_scoped)
        .route("/status", any(system::status))
        .fallback(errors::not_found)
}
