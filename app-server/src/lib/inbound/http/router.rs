use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use super::errors::handle_panic;
use super::errors::route_not_found;
use super::errors::RenderedError;
use super::handlers::get_current_user::get_current_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::middleware::translate_method_not_allowed;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/users", post(register));

    let protected_routes = Router::new()
        .route("/api/users/me", get(get_current_user))
        .route("/api/users/:user_id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state);

    // Request observer: one span per request. Headers and bodies are never recorded.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(|path| path.as_str().to_string())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                request_id = %Uuid::new_v4(),
                method = %request.method(),
                path = %request.uri().path(),
                route = %route,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                let status = response.status().as_u16();
                let latency_ms = latency.as_millis() as u64;

                match response.extensions().get::<RenderedError>() {
                    Some(error) if response.status().is_server_error() => tracing::error!(
                        status,
                        latency_ms,
                        error = %error.message,
                        "Request failed"
                    ),
                    Some(error) => tracing::warn!(
                        status,
                        latency_ms,
                        error = %error.message,
                        "Request failed"
                    ),
                    None => tracing::info!(status, latency_ms, "Request completed"),
                }
            },
        )
        .on_failure(
            |failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                tracing::debug!(
                    classification = %failure,
                    latency_ms = latency.as_millis() as u64,
                    "Response classified as failure"
                );
            },
        );

    with_error_handling(router)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}

/// Route every failure outside the handlers through the error translator:
/// unmatched paths, unsupported methods and panics.
pub fn with_error_handling(router: Router) -> Router {
    router
        .fallback(route_not_found)
        .layer(middleware::from_fn(translate_method_not_allowed))
        .layer(CatchPanicLayer::custom(handle_panic))
}
