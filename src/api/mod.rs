//! HTTP client for the Bookworm REST API.
//!
//! One shared [`reqwest::Client`] behind a thin endpoint-per-method
//! wrapper. Authenticated endpoints take the bearer token explicitly;
//! the session manager owns the token, not this layer.

mod error;
pub mod types;

pub use error::{ApiError, GENERIC_ERROR_MESSAGE};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use types::{AuthResponse, ErrorBody, FeedPage, LoginRequest, RegisterRequest, UserBooks};

/// Client for the remote API. Cheap to share behind an `Arc`.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`
    /// (e.g. `https://bookworm.example/api`). A trailing slash is
    /// tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let endpoint = "/auth/register";
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        read_json(endpoint, response).await
    }

    /// `POST /auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let endpoint = "/auth/login";
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        read_json(endpoint, response).await
    }

    /// `GET /books?page=&limit=` with a bearer token.
    pub async fn feed_page(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> Result<FeedPage, ApiError> {
        let endpoint = "/books";
        let response = self
            .client
            .get(format!(
                "{}{}?page={}&limit={}",
                self.base_url, endpoint, page, limit
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        read_json(endpoint, response).await
    }

    /// `GET /books/user` with a bearer token: the signed-in user's own
    /// recommendations.
    pub async fn user_books(&self, token: &str) -> Result<Vec<types::Book>, ApiError> {
        let endpoint = "/books/user";
        let response = self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;
        let body: UserBooks = read_json(endpoint, response).await?;
        Ok(body.books)
    }

    /// `DELETE /books/{id}` with a bearer token.
    pub async fn delete_book(&self, token: &str, book_id: &str) -> Result<(), ApiError> {
        let endpoint = "/books/{id}";
        let response = self
            .client
            .delete(format!("{}/books/{}", self.base_url, book_id))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(response).await,
            });
        }
        Ok(())
    }
}

/// Decode a success body, or turn a non-success response into
/// [`ApiError::Api`] carrying the server's `message` field.
async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: extract_message(response).await,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { endpoint, source })
}

async fn extract_message(response: Response) -> String {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
