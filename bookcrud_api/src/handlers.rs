use std::sync::Arc;

use actix_web::web::Data;
use actix_web::{Error, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{ApiStatusResponse, BookDetailsPatch, DeleteBookResponse, ErrorResponse};
use crate::books_repository::{parse_book_id, BookRepository, BookRepositoryError};

/// Single place where repository errors become HTTP responses, so that every
/// route maps the taxonomy the same way and internals never leak to callers.
fn error_response(operation: &str, err: BookRepositoryError) -> HttpResponse {
    match err {
        BookRepositoryError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Book not found".to_string(),
        }),
        BookRepositoryError::MalformedId(_) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid ID format".to_string(),
        }),
        BookRepositoryError::Validation(reason) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: reason })
        }
        err => {
            tracing::error!("{} failed {}", operation, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal server error".to_string(),
            })
        }
    }
}

#[api_v2_operation]
pub async fn api_status() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(ApiStatusResponse {
        message: "Books CRUD API".to_string(),
        status: "OK".to_string(),
    }))
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository + Send + Sync>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books().await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => error_response("Get all books", err),
    })
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository + Send + Sync>>,
    details: web::Json<BookDetailsPatch>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.add_book(details.into_inner()).await {
            Ok(book) => HttpResponse::Created().json(book),
            Err(err) => error_response("Add book", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository + Send + Sync>>,
    book_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let result = match parse_book_id(&book_id.into_inner()) {
        Ok(book_id) => books_repository.get_book(book_id).await,
        Err(err) => Err(err),
    };
    Ok(match result {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => error_response("Get book", err),
    })
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository + Send + Sync>>,
    book_id: web::Path<String>,
    patch: web::Json<BookDetailsPatch>,
) -> Result<HttpResponse, Error> {
    let result = match parse_book_id(&book_id.into_inner()) {
        Ok(book_id) => {
            books_repository
                .update_book(book_id, patch.into_inner())
                .await
        }
        Err(err) => Err(err),
    };
    Ok(match result {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => error_response("Update book", err),
    })
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository + Send + Sync>>,
    book_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let result = match parse_book_id(&book_id.into_inner()) {
        Ok(book_id) => books_repository.delete_book(book_id).await,
        Err(err) => Err(err),
    };
    Ok(match result {
        Ok(()) => HttpResponse::Ok().json(DeleteBookResponse {
            message: "Book deleted successfully".to_string(),
        }),
        Err(err) => error_response("Delete book", err),
    })
}
