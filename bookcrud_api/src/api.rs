use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

pub type BookId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// A stored book together with its server-assigned id and timestamps
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn from_document(id: BookId, document: BookDocument) -> Self {
        Self {
            id,
            title: document.title,
            author: document.author,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The document shape persisted in the store; the id lives next to it
/// (table column or map key), never inside it
pub struct BookDocument {
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
/// Struct representing the caller-supplied book fields. Used both to create
/// a book (all required fields must be present) and to patch one (absent
/// fields keep their current value)
pub struct BookDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ApiStatusResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct DeleteBookResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
/// Body of every non-2xx response
pub struct ErrorResponse {
    pub error: String,
}
