//! Router builder for the bookshelf HTTP server

use axum::{
    error_handling::HandleErrorLayer,
    extract::Request,
    http::HeaderValue,
    routing::{get, MethodRouter},
    BoxError, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use bookshelf_kernel::ModuleRegistry;

use crate::error::AppError;

const API_TITLE: &str = "Bookshelf API";
const API_VERSION: &str = "1.0.0";

/// Builder for constructing the main HTTP router.
///
/// Middleware is recorded by the `with_*` calls and applied in [`RouterBuilder::build`],
/// so it wraps every route no matter the call order.
pub struct RouterBuilder {
    router: Router,
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            tracing: false,
            cors: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Add a route to the router
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api_path = format!("/api/{}", module_name);
        self.router = self.router.nest(&api_path, module_router);
        self
    }

    /// Trace every request and response at INFO
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Allow any origin, method and header
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Assign a UUIDv7 `x-request-id` when the client did not send one and echo it back
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Abort requests that run longer than `timeout_ms`
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Merge the OpenAPI fragments of every module and serve them at
    /// `/docs/openapi.json` and through Swagger UI at `/swagger-ui`
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = merged_openapi(registry);

        let openapi_obj: utoipa::openapi::OpenApi =
            match serde_json::from_value(openapi_spec.clone()) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(error = %err, "merged OpenAPI document rejected by utoipa");
                    utoipa::openapi::OpenApiBuilder::new()
                        .info(
                            utoipa::openapi::InfoBuilder::new()
                                .title(API_TITLE)
                                .version(API_VERSION)
                                .build(),
                        )
                        .build()
                }
            };

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw merged document for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        // Set last so the 405 handler reaches every route, nested ones included.
        let mut router = self
            .router
            .fallback(route_not_found)
            .method_not_allowed_fallback(method_not_allowed);

        if let Some(timeout) = self.timeout {
            router = router.layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(middleware_failure))
                    .layer(TimeoutLayer::new(timeout)),
            );
        }
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }
        if self.request_id {
            // Outermost, so the id exists before the trace span opens.
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed("Method not allowed")
}

/// Turns errors raised by tower middleware into the failure envelope
async fn middleware_failure(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::timeout("Request timed out")
    } else {
        AppError::Internal(anyhow::anyhow!("unhandled middleware error: {err}"))
    }
}

/// Request ID generator based on time-ordered UUIDs
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}

/// Base document plus every module's paths (prefixed with `/api/{module}`) and schemas
fn merged_openapi(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "In-memory bookshelf catalog"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "status": { "type": "string", "enum": ["fail"] },
            "message": { "type": "string" },
            "code": { "type": "string" },
            "trace_id": { "type": "string" },
            "timestamp": { "type": "string", "format": "date-time" }
        },
        "required": ["status", "message", "code", "trace_id", "timestamp"]
    });

    openapi_spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": { "type": "string" }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                // A module's root path is served without a trailing slash
                let suffix = if path == "/" { "" } else { path.as_str() };
                let prefixed_path = format!("/api/{}{}", module.name(), suffix);
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}
