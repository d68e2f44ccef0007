use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use tracing::{debug, warn};

use crate::middleware::AuthState;
use crate::repository::BlogRepository;
use crate::schema::BlogSchema;

/// Execute a GraphQL request with the caller's `AuthState` in context
pub async fn graphql_handler(
    schema: web::Data<BlogSchema>,
    http_req: HttpRequest,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let auth = http_req
        .extensions()
        .get::<AuthState>()
        .cloned()
        .unwrap_or_default();

    let response = schema.execute(req.into_inner().data(auth)).await;

    for err in &response.errors {
        let status = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("status"))
            .map(|status| status.to_string())
            .unwrap_or_else(|| "-".to_string());
        if status.starts_with('5') {
            warn!(status = %status, message = %err.message, "GraphQL request failed");
        } else {
            debug!(status = %status, message = %err.message, "GraphQL request rejected");
        }
    }

    response.into()
}

/// Liveness plus a round trip to the repository
pub async fn health_handler(repo: web::Data<dyn BlogRepository>) -> HttpResponse {
    match repo.health_check().await {
        Ok(()) => HttpResponse::Ok().content_type("text/plain").body("ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("unavailable")
        }
    }
}

/// SDL for client code generation
pub async fn schema_handler(schema: web::Data<BlogSchema>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(schema.sdl())
}

pub async fn playground_handler() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
