pub mod catalog;
pub mod error;
pub mod handlers;
pub mod models;
mod openapi;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{InitCtx, Module};

pub use catalog::{BookCatalog, IdGenerator, SharedCatalog, UuidIdGenerator};
pub use error::CatalogError;
pub use models::{Book, BookFilter, BookInput, BookSummary};

/// Books module: owns one catalog for the lifetime of the server
pub struct BooksModule {
    catalog: SharedCatalog,
}

impl BooksModule {
    pub fn new(catalog: BookCatalog) -> Self {
        Self {
            catalog: catalog.into_shared(),
        }
    }

    /// Handle to the catalog served by this module
    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new(BookCatalog::new())
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route("/health", get(health_check))
            .route(
                "/{book_id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .with_state(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::document())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.catalog.read().await.len();
        tracing::info!(module = self.name(), discarded, "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// Create a books module with an empty catalog
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::default())
}
