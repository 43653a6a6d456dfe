use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::database::models::*;
use crate::database::Entity;
use crate::handlers::listing::{list_all, list_paged, list_unattached};
use crate::handlers::resource::{create, delete, get as get_one, partial_update, update};
use crate::handlers::{system, AppState};

/// Build the application router
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(entity_routes::<Organization>(get(list_all::<Organization>)))
        .merge(entity_routes::<PlatformUser>(get(list_all::<PlatformUser>)))
        .merge(entity_routes::<Protocol>(get(list_paged::<Protocol>)))
        .merge(entity_routes::<ProtocolContent>(get(list_unattached::<ProtocolContent>)))
        .merge(entity_routes::<ProtocolPdfFile>(get(list_unattached::<ProtocolPdfFile>)))
        .merge(entity_routes::<AdditionalUser>(get(list_all::<AdditionalUser>)))
        .merge(entity_routes::<ProtocolTemplate>(get(list_all::<ProtocolTemplate>)))
        .merge(entity_routes::<TemplateOrganization>(get(list_all::<TemplateOrganization>)))
        .merge(entity_routes::<Role>(get(list_all::<Role>)))
        .merge(entity_routes::<UserRole>(get(list_all::<UserRole>)))
        .merge(entity_routes::<UserSession>(get(list_all::<UserSession>)))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(state.api.max_request_size_bytes)),
        );

    if security.enable_cors {
        router = router.layer(cors_layer(security, &state.api.application_name));
    }
    if state.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Collection route with the given list handler, plus the item routes
fn entity_routes<T: Entity>(list: MethodRouter<AppState>) -> Router<AppState> {
    Router::new()
        .route(&format!("/api/{}", T::PATH), list.post(create::<T>))
        .route(
            &format!("/api/{}/:id", T::PATH),
            get(get_one::<T>)
                .put(update::<T>)
                .patch(partial_update::<T>)
                .delete(delete::<T>),
        )
}

fn cors_layer(security: &SecurityConfig, application: &str) -> CorsLayer {
    let origins = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            security
                .cors_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    // Browser clients read pagination and alert headers
    let mut exposed = vec![header::LINK, HeaderName::from_static("x-total-count")];
    for suffix in ["alert", "params"] {
        if let Ok(name) = HeaderName::from_bytes(format!("x-{}-{}", application, suffix).as_bytes()) {
            exposed.push(name);
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers(exposed)
}
