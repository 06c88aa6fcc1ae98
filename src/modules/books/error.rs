use thiserror::Error;

/// Rejections produced by [`super::catalog::BookCatalog`]. None of them alter the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("book name is required")]
    NameRequired,

    #[error("readPage ({read_page}) must not be greater than pageCount ({page_count})")]
    ReadPageExceedsPageCount { read_page: u32, page_count: u32 },

    #[error("book '{id}' not found")]
    NotFound { id: String },
}

impl CatalogError {
    /// The caller sent invalid book fields
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::NameRequired | CatalogError::ReadPageExceedsPageCount { .. }
        )
    }

    /// The referenced id is not in the catalog
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}
