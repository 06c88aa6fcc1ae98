//! HTTP handlers for `/api/books`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use bookshelf_http::{error::AppError, response::ApiResponse};

use super::catalog::SharedCatalog;
use super::error::CatalogError;
use super::models::{BookEnvelope, BookFilter, BookInput, BookList, CreatedBook};

/// What the caller was attempting; selects the wording of failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    fn failure_prefix(self) -> &'static str {
        match self {
            Action::Add => "Failed to add book.",
            Action::Update => "Failed to update book.",
            Action::Delete => "Failed to delete book.",
        }
    }

    fn reject(self, err: CatalogError) -> AppError {
        let prefix = self.failure_prefix();
        match err {
            CatalogError::NotFound { .. } => AppError::not_found(format!("{prefix} Id not found")),
            CatalogError::NameRequired => {
                AppError::validation(format!("{prefix} Please provide the book name"))
            }
            CatalogError::ReadPageExceedsPageCount { .. } => AppError::validation(format!(
                "{prefix} readPage must not be greater than pageCount"
            )),
        }
    }

    fn reject_body(self, rejection: JsonRejection) -> AppError {
        AppError::bad_request(format!(
            "{} Invalid request body: {}",
            self.failure_prefix(),
            rejection.body_text()
        ))
    }
}

/// Raw list query; flags are `"1"` for true and anything else for false.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// Folds raw query pairs; unknown keys are ignored and no input is rejected.
impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => {
                    params.name.get_or_insert(value);
                }
                "reading" => fold_flag(&mut params.reading, value),
                "finished" => fold_flag(&mut params.finished, value),
                _ => {}
            }
        }
        params
    }
}

/// A repeated flag arrives as a list of values, which never equals `"1"`.
fn fold_flag(slot: &mut Option<String>, value: String) {
    *slot = Some(match slot.take() {
        None => value,
        Some(_) => String::new(),
    });
}

impl From<ListParams> for BookFilter {
    fn from(params: ListParams) -> Self {
        Self {
            name: params.name.filter(|name| !name.is_empty()),
            reading: params.reading.as_deref().map(flag_enabled),
            finished: params.finished.as_deref().map(flag_enabled),
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    value == "1"
}

pub async fn create_book(
    State(catalog): State<SharedCatalog>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<ApiResponse<CreatedBook>, AppError> {
    let Json(input) = payload.map_err(|rejection| Action::Add.reject_body(rejection))?;

    let book_id = catalog
        .write()
        .await
        .create(input)
        .map_err(|err| Action::Add.reject(err))?;

    Ok(ApiResponse::created(
        "Book added successfully",
        CreatedBook { book_id },
    ))
}

pub async fn list_books(
    State(catalog): State<SharedCatalog>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResponse<BookList> {
    let filter = BookFilter::from(pairs.into_iter().collect::<ListParams>());
    let books = catalog.read().await.list(&filter);

    tracing::debug!(?filter, matched = books.len(), "books listed");
    ApiResponse::ok(BookList { books })
}

pub async fn get_book(
    State(catalog): State<SharedCatalog>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<BookEnvelope>, AppError> {
    let book = catalog
        .read()
        .await
        .get(&book_id)
        .cloned()
        .map_err(|_| AppError::not_found("Book not found"))?;

    Ok(ApiResponse::ok(BookEnvelope { book }))
}

pub async fn update_book(
    State(catalog): State<SharedCatalog>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<ApiResponse, AppError> {
    let mut catalog = catalog.write().await;

    // Unknown ids win over malformed bodies.
    let input = match payload {
        Ok(Json(input)) => input,
        Err(_) if !catalog.contains(&book_id) => {
            return Err(Action::Update.reject(CatalogError::NotFound { id: book_id }));
        }
        Err(rejection) => return Err(Action::Update.reject_body(rejection)),
    };

    catalog
        .update(&book_id, input)
        .map_err(|err| Action::Update.reject(err))?;

    Ok(ApiResponse::message("Book updated successfully"))
}

pub async fn delete_book(
    State(catalog): State<SharedCatalog>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse, AppError> {
    catalog
        .write()
        .await
        .delete(&book_id)
        .map_err(|err| Action::Delete.reject(err))?;

    Ok(ApiResponse::message("Book deleted successfully"))
}
