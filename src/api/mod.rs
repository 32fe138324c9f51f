// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_service_key, require_session},
    directory::AppUser,
    state::AppState,
};

pub mod health;
pub mod internal;
pub mod users;

pub fn router(state: AppState) -> Router {
    let mut openapi = ApiDoc::openapi();
    add_security_schemes(&mut openapi, state.session_gate.cookie_name());

    let user_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let internal_routes = Router::new()
        .route("/users", get(internal::list_users))
        .route("/users/{username}", get(internal::get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_service_key,
        ));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", user_routes)
        .nest("/internal/v1", internal_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

fn add_security_schemes(openapi: &mut utoipa::openapi::OpenApi, cookie_name: &str) {
    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie_name))),
        );
        components.add_security_scheme(
            "internal_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::get_current_user,
        internal::list_users,
        internal::get_user
    ),
    components(
        schemas(
            AppUser,
            users::UserMeResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Session user endpoints"),
        (name = "Internal", description = "Service-to-service endpoints")
    )
)]
struct ApiDoc;
