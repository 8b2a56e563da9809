use anyhow::{bail, Context};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_tracing::TracingMiddleware;

use crate::api::{ApiStatusResponse, Book, BookDetailsPatch, BookId, ErrorResponse};

pub struct BookCrudApiClient {
    url: String,
    client: ClientWithMiddleware,
}

impl BookCrudApiClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub async fn status(&self) -> anyhow::Result<ApiStatusResponse> {
        let response = self.client.get(format!("{}/", self.url)).send().await?;
        if !response.status().is_success() {
            bail!("Failed to get api status {}", response.status())
        }
        response.json().await.context("Failed to parse api status")
    }

    pub async fn add_book(&self, details: BookDetailsPatch) -> anyhow::Result<Book> {
        let response = self
            .client
            .post(format!("{}/books", self.url))
            .json(&details)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Failed to add book: {}", error_body(response).await)
        }
        response.json().await.context("Failed to parse added book")
    }

    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self.client.get(format!("{}/books", self.url)).send().await?;
        if !response.status().is_success() {
            bail!("Failed to list books: {}", error_body(response).await)
        }
        response.json().await.context("Failed to parse book list")
    }

    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/books/{}", self.url, book_id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("Failed to get book: {}", error_body(response).await)
        }
        Ok(Some(response.json().await.context("Failed to parse book")?))
    }

    pub async fn update_book(
        &self,
        book_id: BookId,
        patch: BookDetailsPatch,
    ) -> anyhow::Result<Book> {
        let response = self
            .client
            .put(format!("{}/books/{}", self.url, book_id))
            .json(&patch)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Failed to update book: {}", error_body(response).await)
        }
        response.json().await.context("Failed to parse updated book")
    }

    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(format!("{}/books/{}", self.url, book_id))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Failed to delete book: {}", error_body(response).await)
        }
        Ok(())
    }
}

async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => format!("{} ({})", body.error, status),
        Err(_) => status.to_string(),
    }
}
