pub use in_memory_books_repository::InMemoryBookRepository;
pub use postgres_books_repository::{PostgresBooksRepository, PostgresBooksRepositoryConfig};

use chrono::Utc;
use serde_json::json;

use crate::api;
use crate::api::{Book, BookDocument, BookId};

mod in_memory_books_repository;
mod postgres_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("Id {0} is not a valid book id")]
    MalformedId(String),

    #[error("{0}")]
    Validation(String),

    #[error("Failed to deserialize book: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Other error {0}")]
    Other(String),
}

#[async_trait::async_trait]
pub trait BookRepository {
    /// Validates and stores a new book, returns it with the assigned id and timestamps
    async fn add_book(&self, details: api::BookDetailsPatch)
        -> Result<Book, BookRepositoryError>;
    /// Lists all books in the repository, newest first
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Retrieves a single book from the repository
    async fn get_book(&self, book_id: BookId) -> Result<Book, BookRepositoryError>;
    /// Applies a partial update, re-validates and returns the updated book
    async fn update_book(
        &self,
        book_id: BookId,
        patch: api::BookDetailsPatch,
    ) -> Result<Book, BookRepositoryError>;
    /// Removes the book from the repository
    async fn delete_book(&self, book_id: BookId) -> Result<(), BookRepositoryError>;
}

/// Ids on the wire are the store's decimal integers. Anything that does not
/// parse is malformed, as opposed to a well-formed id with no matching book.
pub fn parse_book_id(raw: &str) -> Result<BookId, BookRepositoryError> {
    raw.parse()
        .map_err(|_| BookRepositoryError::MalformedId(raw.to_string()))
}

/// Validates create fields and stamps both timestamps with the same instant.
pub(crate) fn new_document(
    details: api::BookDetailsPatch,
) -> Result<BookDocument, BookRepositoryError> {
    let title = require_field("title", details.title)?;
    let author = require_field("author", details.author)?;
    let now = Utc::now();
    Ok(BookDocument {
        title,
        author,
        created_at: now,
        updated_at: now,
    })
}

/// Merges the patch onto the stored document, re-validates the result and
/// refreshes `updatedAt`. `createdAt` and the id are not patchable.
pub(crate) fn apply_patch(
    document: BookDocument,
    patch: api::BookDetailsPatch,
) -> Result<BookDocument, BookRepositoryError> {
    let mut merged = json!(document);
    json_patch::merge(&mut merged, &json!(patch));
    let mut merged: BookDocument = serde_json::from_value(merged)?;
    if merged.title.is_empty() {
        return Err(BookRepositoryError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    if merged.author.is_empty() {
        return Err(BookRepositoryError::Validation(
            "author must not be empty".to_string(),
        ));
    }
    merged.updated_at = Utc::now();
    Ok(merged)
}

fn require_field(name: &str, value: Option<String>) -> Result<String, BookRepositoryError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(BookRepositoryError::Validation(format!(
            "{} must not be empty",
            name
        ))),
        None => Err(BookRepositoryError::Validation(format!(
            "{} is required",
            name
        ))),
    }
}
