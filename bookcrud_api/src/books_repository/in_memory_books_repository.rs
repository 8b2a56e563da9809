use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::api;
use crate::api::{Book, BookDocument, BookId};
use crate::books_repository::{
    apply_patch, new_document, BookRepository, BookRepositoryError,
};

pub struct InMemoryBookRepository {
    book_sequence_generator: AtomicI64,
    books: parking_lot::RwLock<HashMap<BookId, BookDocument>>,
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self {
            book_sequence_generator: AtomicI64::new(1),
            books: Default::default(),
        }
    }
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add_book(
        &self,
        details: api::BookDetailsPatch,
    ) -> Result<Book, BookRepositoryError> {
        let document = new_document(details)?;
        let id = self.book_sequence_generator.fetch_add(1, Ordering::Relaxed);
        self.books.write().insert(id, document.clone());
        Ok(Book::from_document(id, document))
    }

    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .iter()
            .map(|(&book_id, document)| Book::from_document(book_id, document.clone()))
            .collect();
        // newest first; ids break ties between books created within one tick
        books.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(books)
    }

    async fn get_book(&self, book_id: BookId) -> Result<Book, BookRepositoryError> {
        self.books
            .read()
            .get(&book_id)
            .map(|document| Book::from_document(book_id, document.clone()))
            .ok_or(BookRepositoryError::NotFound(book_id))
    }

    async fn update_book(
        &self,
        book_id: BookId,
        patch: api::BookDetailsPatch,
    ) -> Result<Book, BookRepositoryError> {
        let mut locked_books = self.books.write();
        let document = locked_books
            .get(&book_id)
            .cloned()
            .ok_or(BookRepositoryError::NotFound(book_id))?;
        let updated = apply_patch(document, patch)?;
        locked_books.insert(book_id, updated.clone());
        Ok(Book::from_document(book_id, updated))
    }

    async fn delete_book(&self, book_id: BookId) -> Result<(), BookRepositoryError> {
        self.books
            .write()
            .remove(&book_id)
            .map(|_| ())
            .ok_or(BookRepositoryError::NotFound(book_id))
    }
}

#[cfg(test)]
mod in_memory_book_repository_tests {
    use crate::api::BookDetailsPatch;
    use crate::books_repository::{
        BookRepository, BookRepositoryError, InMemoryBookRepository,
    };

    fn details(title: &str, author: &str) -> BookDetailsPatch {
        BookDetailsPatch {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        }
    }

    #[tokio::test]
    /// Tests if add_book and get_book work correctly
    async fn test_add_book_and_get_it() {
        let repo = InMemoryBookRepository::default();

        let not_existing_book_id = 20000;
        let book_not_found = repo.get_book(not_existing_book_id).await;
        assert!(matches!(
            book_not_found,
            Err(BookRepositoryError::NotFound(..))
        ));

        let book = repo
            .add_book(details("Dune", "Herbert"))
            .await
            .expect("Failed to add book");
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Herbert");
        assert_eq!(book.created_at, book.updated_at);

        let returned = repo.get_book(book.id).await.expect("Failed to get book");
        assert_eq!(returned, book);
    }

    #[tokio::test]
    /// Tests that invalid details are rejected and nothing is persisted
    async fn test_add_book_rejects_invalid_details() {
        let repo = InMemoryBookRepository::default();

        let missing_author = BookDetailsPatch {
            title: Some("Dune".to_string()),
            author: None,
        };
        let result = repo.add_book(missing_author).await;
        assert!(matches!(result, Err(BookRepositoryError::Validation(..))));

        let list = repo.list_books().await.expect("Failed to list books");
        assert!(list.is_empty());
    }

    #[tokio::test]
    /// Tests if list_books returns books newest first
    async fn test_add_books_and_list_them() {
        let repo = InMemoryBookRepository::default();

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        let book1 = repo
            .add_book(details("title1", "author1"))
            .await
            .expect("Failed to add book");
        let book2 = repo
            .add_book(details("title2", "author2"))
            .await
            .expect("Failed to add book");
        let book3 = repo
            .add_book(details("title3", "author3"))
            .await
            .expect("Failed to add book");

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(
            list.iter().map(|book| book.id).collect::<Vec<_>>(),
            vec![book3.id, book2.id, book1.id]
        );
    }

    #[tokio::test]
    /// Tests if update_book patches only the submitted fields
    async fn test_add_book_patch_and_get_it() {
        let repo = InMemoryBookRepository::default();

        let not_existing_book = 2000;
        let result = repo
            .update_book(not_existing_book, BookDetailsPatch::default())
            .await;
        assert!(matches!(result, Err(BookRepositoryError::NotFound(..))));

        let book = repo
            .add_book(details("Dune", "Herbert"))
            .await
            .expect("Failed to add book");

        let patch_title_only = BookDetailsPatch {
            title: Some("Dune Messiah".to_string()),
            ..BookDetailsPatch::default()
        };
        let patched = repo
            .update_book(book.id, patch_title_only)
            .await
            .expect("Failed to patch");

        assert_eq!(patched.id, book.id);
        assert_eq!(patched.title, "Dune Messiah");
        assert_eq!(patched.author, book.author);
        assert_eq!(patched.created_at, book.created_at);
        assert!(patched.updated_at > book.updated_at);

        assert_eq!(repo.get_book(book.id).await.unwrap(), patched);

        let empty_title = BookDetailsPatch {
            title: Some("".to_string()),
            ..BookDetailsPatch::default()
        };
        let result = repo.update_book(book.id, empty_title).await;
        assert!(matches!(result, Err(BookRepositoryError::Validation(..))));
        // failed update must not change the stored book
        assert_eq!(repo.get_book(book.id).await.unwrap(), patched);
    }

    #[tokio::test]
    /// Tests if delete_book removes the book and a second delete misses
    async fn test_add_book_delete_and_delete_again() {
        let repo = InMemoryBookRepository::default();

        let book = repo
            .add_book(details("Dune", "Herbert"))
            .await
            .expect("Failed to add book");

        repo.delete_book(book.id).await.expect("Failed to delete");

        let get_result = repo.get_book(book.id).await;
        assert!(matches!(get_result, Err(BookRepositoryError::NotFound(..))));

        let second_delete = repo.delete_book(book.id).await;
        assert!(matches!(
            second_delete,
            Err(BookRepositoryError::NotFound(..))
        ));
    }
}
