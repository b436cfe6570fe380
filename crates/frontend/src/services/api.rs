use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared_types::{
    ErrorResponse, FoodRecord, FoodRecordQuery, FoodRecordRequest, LoginRequest, LoginResponse,
    RegisterRequest, UserProfile,
};
use std::fmt;
use uuid::Uuid;

use crate::services::storage;

const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "/api",
};

const LOGIN_PATH: &str = "/login";

/// Failure of an API call, ready to show to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status, absent for network and serialization failures.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn local(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Whether to attach the stored bearer token and treat a 401 as an expired
/// session.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Auth {
    Anonymous,
    Bearer,
}

fn url(path: &str) -> String {
    format!("{}{}", API_BASE_URL, path)
}

/// Session is gone: forget the credentials and send the browser to the
/// login page.
fn expire_session() {
    storage::clear_auth();
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(LOGIN_PATH) {
            tracing::error!("Failed to redirect to login: {:?}", e);
        }
    }
}

pub struct ApiService;

impl ApiService {
    fn prepare(builder: RequestBuilder, auth: Auth) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match (auth, storage::get_token()) {
            (Auth::Bearer, Some(token)) => {
                builder.header("Authorization", &format!("Bearer {}", token))
            }
            _ => builder,
        }
    }

    async fn dispatch(request: Request, auth: Auth) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::local(format!("Network error: {}", e)))?;

        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        if status == 401 && auth == Auth::Bearer {
            tracing::warn!("Session rejected by server, returning to login");
            expire_session();
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => format!("Request failed ({})", status),
        };

        Err(ApiError {
            status: Some(status),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(request: Request, auth: Auth) -> Result<T, ApiError> {
        Self::dispatch(request, auth)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::local(format!("Failed to parse response: {}", e)))
    }

    fn with_json<B: serde::Serialize>(
        builder: RequestBuilder,
        auth: Auth,
        body: &B,
    ) -> Result<Request, ApiError> {
        Self::prepare(builder, auth)
            .json(body)
            .map_err(|e| ApiError::local(format!("Failed to serialize request: {}", e)))
    }

    fn without_body(builder: RequestBuilder, auth: Auth) -> Result<Request, ApiError> {
        Self::prepare(builder, auth)
            .build()
            .map_err(|e| ApiError::local(format!("Failed to build request: {}", e)))
    }

    // Auth

    pub async fn register(request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        let req = Self::with_json(Request::post(&url("/register")), Auth::Anonymous, request)?;
        Self::send(req, Auth::Anonymous).await
    }

    pub async fn login(request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let req = Self::with_json(Request::post(&url("/login")), Auth::Anonymous, request)?;
        Self::send(req, Auth::Anonymous).await
    }

    pub async fn profile() -> Result<UserProfile, ApiError> {
        let req = Self::without_body(Request::get(&url("/profile")), Auth::Bearer)?;
        Self::send(req, Auth::Bearer).await
    }

    // Food records

    pub async fn list_records(query: &FoodRecordQuery) -> Result<Vec<FoodRecord>, ApiError> {
        let pairs = query.to_pairs();
        let builder = Request::get(&url("/food-records"))
            .query(pairs.iter().map(|(key, value)| (*key, value.as_str())));
        let req = Self::without_body(builder, Auth::Bearer)?;
        Self::send(req, Auth::Bearer).await
    }

    pub async fn create_record(request: &FoodRecordRequest) -> Result<FoodRecord, ApiError> {
        let req = Self::with_json(Request::post(&url("/food-records")), Auth::Bearer, request)?;
        Self::send(req, Auth::Bearer).await
    }

    pub async fn update_record(
        id: Uuid,
        request: &FoodRecordRequest,
    ) -> Result<FoodRecord, ApiError> {
        let path = url(&format!("/food-records/{}", id));
        let req = Self::with_json(Request::put(&path), Auth::Bearer, request)?;
        Self::send(req, Auth::Bearer).await
    }

    pub async fn delete_record(id: Uuid) -> Result<(), ApiError> {
        let path = url(&format!("/food-records/{}", id));
        let req = Self::without_body(Request::delete(&path), Auth::Bearer)?;
        Self::dispatch(req, Auth::Bearer).await.map(|_| ())
    }
}
