use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::handlers::AppState;

/// GET / - service description
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Protocol Admin API",
            "application": state.api.application_name,
            "version": version,
            "description": "Administration backend for protocols, organizations and platform users",
            "endpoints": {
                "home": "/",
                "health": "/health",
                "organizations": "/api/organizations[/:id]",
                "platform_users": "/api/platform-users[/:id]",
                "protocols": "/api/protocols[/:id] (paginated: page, size, sort)",
                "protocol_contents": "/api/protocol-contents[/:id] (filter=protocol-is-null)",
                "protocol_pdf_files": "/api/protocol-pdf-files[/:id] (filter=protocol-is-null)",
                "additional_users": "/api/additional-users[/:id]",
                "protocol_templates": "/api/protocol-templates[/:id]",
                "template_organizations": "/api/template-organizations[/:id]",
                "roles": "/api/roles[/:id]",
                "user_roles": "/api/user-roles[/:id]",
                "user_sessions": "/api/user-sessions[/:id]",
            }
        }
    }))
}

/// GET /health - store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = &state.pool else {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "memory" }
            })),
        );
    };

    match DatabaseManager::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
