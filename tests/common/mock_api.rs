//! Scripted in-process mock of the Bookworm API.
//!
//! Responses are served in FIFO order regardless of route, and every
//! request is captured for assertions.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    /// The bearer token from the Authorization header, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .and_then(|(_, value)| value.strip_prefix("Bearer "))
    }
}

/// A scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            delay_ms: 0,
        }
    }

    /// Non-success response with the service's `{message}` error shape.
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "message": message }).to_string().into_bytes(),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

struct MockState {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Handle to a running mock server.
pub struct MockApi {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock api");
        });

        Self { addr, state }
    }

    /// Base URL to hand to `ApiClient::new`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub async fn enqueue(&self, response: MockResponse) {
        self.state.responses.lock().await.push_back(response);
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.state.requests.lock().await.len()
    }
}

async fn handle(State(state): State<Arc<MockState>>, req: Request<Body>) -> Response<Body> {
    let (parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    state.requests.lock().await.push(CapturedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(String::from),
        headers: parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect(),
        body: body_bytes.to_vec(),
    });

    let scripted = state.responses.lock().await.pop_front();
    let mock = scripted.unwrap_or_else(|| MockResponse::error(500, "no scripted response"));

    if mock.delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(mock.delay_ms)).await;
    }

    Response::builder()
        .status(StatusCode::from_u16(mock.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .header("content-type", "application/json")
        .body(Body::from(mock.body))
        .expect("build mock response")
}

/// JSON for one book, with the service's wire field names.
pub fn book_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": title,
        "caption": format!("caption for {title}"),
        "rating": 4,
        "image": format!("https://res.cloudinary.com/demo/image/upload/v1/{id}.jpg"),
        "createdAt": "2025-01-02T03:04:05.000Z",
        "user": { "_id": "u1", "username": "paul" }
    })
}

/// JSON body of a `GET /books` feed page.
pub fn feed_page_json(books: &[serde_json::Value], total_pages: u32) -> String {
    json!({ "books": books, "totalPages": total_pages }).to_string()
}

/// JSON body of a `GET /books/user` response.
pub fn user_books_json(books: &[serde_json::Value]) -> String {
    json!({ "books": books }).to_string()
}

/// JSON body of a successful auth response.
pub fn auth_json(token: &str, username: &str, email: &str) -> String {
    json!({
        "token": token,
        "user": {
            "_id": "u1",
            "username": username,
            "email": email,
            "createdAt": "2025-01-01T00:00:00.000Z"
        }
    })
    .to_string()
}
