//! In-memory book catalog.
//!
//! Every operation validates before it mutates, so a rejected call leaves the
//! catalog exactly as it was. The catalog is not synchronized; hosts that
//! serve requests in parallel wrap it in a lock (see [`SharedCatalog`]).

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::CatalogError;
use super::models::{Book, BookFilter, BookInput, BookSummary};

/// Catalog handle shared by the HTTP handlers of one server.
pub type SharedCatalog = Arc<RwLock<BookCatalog>>;

/// Source of book identifiers. Every call must return a token not returned before.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Time-ordered UUIDv7 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

pub struct BookCatalog {
    books: Vec<Book>,
    ids: Box<dyn IdGenerator>,
    clock: fn() -> OffsetDateTime,
}

impl BookCatalog {
    /// Empty catalog with UUIDv7 ids and the system clock
    pub fn new() -> Self {
        Self::with_id_generator(UuidIdGenerator)
    }

    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            books: Vec::new(),
            ids: Box::new(ids),
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Replace the timestamp source used for `insertedAt`/`updatedAt`
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Wrap the catalog for sharing across request handlers
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Validate `input`, store it as a new book and return the new id.
    pub fn create(&mut self, input: BookInput) -> Result<String, CatalogError> {
        let details = input.validate()?;

        let id = self.ids.next_id();
        let book = Book::from_details(id.clone(), details, (self.clock)());

        tracing::info!(book_id = %id, finished = book.finished, "book added");
        self.books.push(book);
        Ok(id)
    }

    /// Project every book matching `filter`, in insertion order.
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .iter()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<&Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Replace every field of book `id` except `id` and `insertedAt`.
    ///
    /// The id is resolved before the input is validated.
    pub fn update(&mut self, id: &str, input: BookInput) -> Result<(), CatalogError> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        let details = input.validate()?;

        let now = (self.clock)();
        let book = &mut self.books[index];
        book.apply(details, now);

        tracing::info!(book_id = %id, finished = book.finished, "book updated");
        Ok(())
    }

    /// Remove book `id`, preserving the order of the remaining books.
    pub fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        let index = self.position(id).ok_or_else(|| not_found(id))?;
        self.books.remove(index);

        tracing::info!(book_id = %id, remaining = self.books.len(), "book deleted");
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: &str) -> CatalogError {
    tracing::debug!(book_id = %id, "book lookup missed");
    CatalogError::NotFound { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    /// Deterministic ids: `book-0`, `book-1`, ...
    #[derive(Default)]
    struct SequentialIds(AtomicUsize);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            format!("book-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    static TICKS: AtomicI64 = AtomicI64::new(1_700_000_000);

    /// Advances one second per call
    fn ticking_clock() -> OffsetDateTime {
        let secs = TICKS.fetch_add(1, Ordering::SeqCst);
        OffsetDateTime::from_unix_timestamp(secs).unwrap()
    }

    fn catalog() -> BookCatalog {
        BookCatalog::with_id_generator(SequentialIds::default()).with_clock(ticking_clock)
    }

    fn input(name: &str, page_count: u32, read_page: u32, reading: bool) -> BookInput {
        BookInput {
            name: Some(name.to_string()),
            year: 2018,
            author: "James Clear".to_string(),
            summary: "Tiny changes".to_string(),
            publisher: "Avery".to_string(),
            page_count,
            read_page,
            reading,
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let mut catalog = catalog();
        let id = catalog
            .create(input("Atomic Habits", 300, 300, false))
            .unwrap();

        let book = catalog.get(&id).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "Atomic Habits");
        assert_eq!(book.year, 2018);
        assert_eq!(book.author, "James Clear");
        assert_eq!(book.summary, "Tiny changes");
        assert_eq!(book.publisher, "Avery");
        assert_eq!(book.page_count, 300);
        assert_eq!(book.read_page, 300);
        assert!(!book.reading);
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn create_without_name_leaves_catalog_empty() {
        let mut catalog = catalog();
        let err = catalog
            .create(BookInput {
                page_count: 100,
                read_page: 50,
                ..BookInput::default()
            })
            .unwrap_err();

        assert_eq!(err, CatalogError::NameRequired);
        assert!(err.is_validation());
        assert!(catalog.is_empty());
    }

    #[test]
    fn create_with_read_page_over_page_count_is_rejected() {
        let mut catalog = catalog();
        let err = catalog.create(input("X", 50, 80, false)).unwrap_err();

        assert!(matches!(err, CatalogError::ReadPageExceedsPageCount { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut catalog = BookCatalog::new();
        let ids: HashSet<String> = (0..100)
            .map(|n| catalog.create(input(&format!("Book {n}"), 10, 0, false)).unwrap())
            .collect();

        assert_eq!(ids.len(), 100);
        assert_eq!(catalog.len(), 100);
    }

    #[test]
    fn list_preserves_insertion_order_and_projects() {
        let mut catalog = catalog();
        catalog.create(input("First", 10, 0, false)).unwrap();
        catalog.create(input("Second", 10, 0, false)).unwrap();

        assert_eq!(
            catalog.list(&BookFilter::default()),
            vec![
                BookSummary {
                    id: "book-0".to_string(),
                    name: "First".to_string(),
                    publisher: "Avery".to_string(),
                },
                BookSummary {
                    id: "book-1".to_string(),
                    name: "Second".to_string(),
                    publisher: "Avery".to_string(),
                },
            ]
        );
    }

    #[test]
    fn list_by_reading_flag() {
        let mut catalog = catalog();
        let reading = catalog.create(input("Reading", 10, 2, true)).unwrap();
        catalog.create(input("Shelved", 10, 2, false)).unwrap();

        let filter = BookFilter {
            reading: Some(true),
            ..BookFilter::default()
        };
        let ids: Vec<String> = catalog.list(&filter).into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![reading]);
    }

    #[test]
    fn list_filters_have_no_false_positives_or_negatives() {
        let mut catalog = catalog();
        let names = ["Dune", "Dune Messiah", "Emma", "dunes of sand"];
        for (n, name) in names.iter().enumerate() {
            let n = n as u32;
            catalog
                .create(input(name, 10, if n % 2 == 0 { 10 } else { 3 }, n < 2))
                .unwrap();
        }

        let filters = [None, Some(true), Some(false)];
        for name in [None, Some("dune"), Some("EMMA"), Some("zzz")] {
            for reading in filters {
                for finished in filters {
                    let filter = BookFilter {
                        name: name.map(str::to_string),
                        reading,
                        finished,
                    };
                    let listed: Vec<String> =
                        catalog.list(&filter).into_iter().map(|b| b.id).collect();
                    let expected: Vec<String> = catalog
                        .books
                        .iter()
                        .filter(|book| {
                            name.map_or(true, |n| {
                                book.name.to_lowercase().contains(&n.to_lowercase())
                            }) && reading.map_or(true, |r| book.reading == r)
                                && finished.map_or(true, |f| book.finished == f)
                        })
                        .map(|book| book.id.clone())
                        .collect();
                    assert_eq!(listed, expected, "filter {filter:?}");
                }
            }
        }
    }

    #[test]
    fn update_replaces_fields_and_recomputes_finished() {
        let mut catalog = catalog();
        let id = catalog.create(input("Draft", 100, 100, false)).unwrap();
        let inserted_at = catalog.get(&id).unwrap().inserted_at;

        catalog
            .update(&id, input("Final", 200, 50, true))
            .unwrap();

        let book = catalog.get(&id).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "Final");
        assert_eq!(book.page_count, 200);
        assert_eq!(book.read_page, 50);
        assert!(book.reading);
        assert!(!book.finished);
        assert_eq!(book.inserted_at, inserted_at);
        assert!(book.updated_at > inserted_at);
    }

    #[test]
    fn update_unknown_id_reports_not_found_before_validation() {
        let mut catalog = catalog();
        catalog.create(input("Kept", 10, 1, false)).unwrap();
        let before = catalog.list(&BookFilter::default());

        let err = catalog
            .update("missing", BookInput::default())
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(catalog.list(&BookFilter::default()), before);
    }

    #[test]
    fn rejected_update_leaves_book_untouched() {
        let mut catalog = catalog();
        let id = catalog.create(input("Kept", 10, 1, false)).unwrap();
        let before = catalog.get(&id).unwrap().clone();

        assert_eq!(
            catalog.update(&id, BookInput::default()),
            Err(CatalogError::NameRequired)
        );
        assert!(catalog.update(&id, input("Kept", 5, 6, false)).is_err());
        assert_eq!(catalog.get(&id).unwrap(), &before);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let mut catalog = catalog();
        let first = catalog.create(input("One", 10, 0, false)).unwrap();
        let second = catalog.create(input("Two", 10, 0, false)).unwrap();
        let third = catalog.create(input("Three", 10, 0, false)).unwrap();

        catalog.delete(&second).unwrap();

        assert!(catalog.get(&second).unwrap_err().is_not_found());
        let ids: Vec<String> = catalog
            .list(&BookFilter::default())
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![first, third]);
        assert!(catalog.delete(&second).unwrap_err().is_not_found());
    }
}
