//! HTTP application wiring (axum router + middleware stages).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (database selection, CORS policy)
//! - `routes/`: route table + handlers (one file per operation group)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, header},
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use shade_infra::Database;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP handler (public entrypoint used by `main.rs` and
/// the black-box tests).
///
/// The router is bound to the given persistence capability and wrapped —
/// outermost first — by the cross-origin stage and the response
/// content-type stage. Both stages run for every request, whatever the
/// routing outcome; neither consumes the body or alters routing.
pub fn build_app(db: Arc<dyn Database>) -> Router {
    routes::router().layer(Extension(db)).layer(
        ServiceBuilder::new()
            .layer(services::cors_layer())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )),
    )
}
