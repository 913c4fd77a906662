//! Wire types for the Bookworm REST API.
//!
//! Field names follow the service's JSON exactly (`_id`, `createdAt`,
//! `totalPages`, ...); the Rust side uses idiomatic names via serde
//! renames.

use serde::{Deserialize, Serialize};

/// Profile snapshot returned by the auth endpoints and persisted with
/// the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "profileImage", default)]
    pub profile_image: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Author snapshot denormalized into each book at post time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

/// A posted recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub caption: String,
    /// Star rating, 0-5.
    pub rating: u8,
    pub image: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<Author>,
}

/// One page of the community feed (`GET /books`).
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPage {
    pub books: Vec<Book>,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful response from either auth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Response from `GET /books/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserBooks {
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Error body the service attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
