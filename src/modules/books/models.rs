use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::CatalogError;

/// A book stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier, never reassigned
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    /// Always `<= page_count`
    pub read_page: u32,
    /// `read_page == page_count`, kept in sync on every write
    pub finished: bool,
    /// Caller-declared "currently reading" flag
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub(crate) fn from_details(id: String, details: BookDetails, now: OffsetDateTime) -> Self {
        let finished = details.is_finished();
        Self {
            id,
            name: details.name,
            year: details.year,
            author: details.author,
            summary: details.summary,
            publisher: details.publisher,
            page_count: details.page_count,
            read_page: details.read_page,
            finished,
            reading: details.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every caller-owned field, keeping `id` and `inserted_at`.
    pub(crate) fn apply(&mut self, details: BookDetails, now: OffsetDateTime) {
        self.finished = details.is_finished();
        self.name = details.name;
        self.year = details.year;
        self.author = details.author;
        self.summary = details.summary;
        self.publisher = details.publisher;
        self.page_count = details.page_count;
        self.read_page = details.read_page;
        self.reading = details.reading;
        self.updated_at = now;
    }
}

/// Unchecked book fields as supplied by a caller for create and update.
///
/// Only `name` is required; it stays optional here so that its absence is
/// reported as a validation failure rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookInput {
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookInput {
    /// Check the input, first failure wins: name, then page bounds.
    pub fn validate(self) -> Result<BookDetails, CatalogError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(CatalogError::NameRequired),
        };

        if self.read_page > self.page_count {
            return Err(CatalogError::ReadPageExceedsPageCount {
                read_page: self.read_page,
                page_count: self.page_count,
            });
        }

        Ok(BookDetails {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Book fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    name: String,
    year: i32,
    author: String,
    summary: String,
    publisher: String,
    page_count: u32,
    read_page: u32,
    reading: bool,
}

impl BookDetails {
    fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// List projection of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Conjunctive list filter; `None` places no constraint on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let name_matches = self.name.as_deref().map_or(true, |needle| {
            book.name.to_lowercase().contains(&needle.to_lowercase())
        });
        let reading_matches = self.reading.map_or(true, |reading| book.reading == reading);
        let finished_matches = self
            .finished
            .map_or(true, |finished| book.finished == finished);

        name_matches && reading_matches && finished_matches
    }
}

/// `data` payload of a successful create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBook {
    pub book_id: String,
}

/// `data` payload of a list
#[derive(Debug, Clone, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` payload of a single-book lookup
#[derive(Debug, Clone, Serialize)]
pub struct BookEnvelope {
    pub book: Book,
}
