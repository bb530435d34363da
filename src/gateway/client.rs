//! HTTP client for the voting API
//!
//! Wraps a `reqwest::Client` with the API root, bearer-token injection and the
//! status handling every endpoint shares:
//! - 401 drops the in-memory token and yields `ClientError::Unauthorized`
//! - 403/404/5xx are logged and mapped to typed errors
//! - success bodies are unwrapped from the `{ data, message }` envelope

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::model::{
    Candidate, CandidateFilter, Election, ElectionCreate, ElectionStatus, Envelope, LoginRequest,
    LoginResponse, Position, PositionCreate, ResultRecord, User, VoteRequest,
};
use crate::utils::{ClientError, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root: String,
    pub(super) token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let root = Url::parse(&settings.root())?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, root.as_str()))
    }

    /// Build around an existing `reqwest::Client` and API root.
    pub fn with_client(http: reqwest::Client, root: &str) -> Self {
        Self {
            http,
            root: root.trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.root, path);
        debug!("{method} {url}");
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body);

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Unauthorized response, dropping session token");
                self.set_token(None);
                Err(ClientError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                error!("Forbidden access");
                Err(ClientError::Forbidden)
            }
            StatusCode::NOT_FOUND => {
                error!("Resource not found");
                Err(ClientError::NotFound)
            }
            s if s.is_server_error() => {
                error!("Server error occurred: {s}");
                Err(ClientError::Status {
                    status: s.as_u16(),
                    message,
                })
            }
            s => {
                error!("An error occurred: {s} {message}");
                Err(ClientError::Status {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        self.check(response).await
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Envelope<T>> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.data(self.request(Method::GET, path)).await?.data)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        Ok(self
            .data(self.request(Method::POST, path).json(body))
            .await?
            .data)
    }

    // auth

    /// Log in with corporate id and PIN. On success the returned token is
    /// also installed on this client. Returns the server's message alongside.
    pub async fn login(&self, corporate_id: &str, pin: &str) -> Result<(LoginResponse, String)> {
        let body = LoginRequest {
            corporate_id: corporate_id.to_string(),
            pin: pin.to_string(),
        };
        let envelope: Envelope<LoginResponse> = self
            .data(self.request(Method::POST, "/auth/login").json(&body))
            .await?;
        self.set_token(Some(envelope.data.token.clone()));
        Ok((envelope.data, envelope.message.unwrap_or_default()))
    }

    pub async fn me(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> Result<()> {
        self.send(self.request(Method::POST, "/auth/logout")).await?;
        Ok(())
    }

    // elections

    pub async fn elections(&self) -> Result<Vec<Election>> {
        self.get("/elections").await
    }

    pub async fn election(&self, election_id: &str) -> Result<Election> {
        self.get(&format!("/elections/{election_id}")).await
    }

    pub async fn create_election(&self, election: &ElectionCreate) -> Result<Election> {
        self.post("/elections/create", election).await
    }

    pub async fn update_election_status(
        &self,
        election_id: &str,
        status: ElectionStatus,
    ) -> Result<Election> {
        let builder = self
            .request(Method::PATCH, &format!("/elections/{election_id}/status"))
            .json(&json!({ "status": status }));
        Ok(self.data(builder).await?.data)
    }

    pub async fn delete_election(&self, election_id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/elections/{election_id}/delete")))
            .await?;
        Ok(())
    }

    // positions

    pub async fn positions(&self, election_id: Option<&str>) -> Result<Vec<Position>> {
        let builder = self.request(Method::GET, "/positions");
        let builder = match election_id {
            Some(id) => builder.query(&[("electionId", id)]),
            None => builder,
        };
        Ok(self.data(builder).await?.data)
    }

    pub async fn create_position(&self, position: &PositionCreate) -> Result<Position> {
        self.post("/positions", position).await
    }

    pub async fn toggle_position(&self, position_id: &str) -> Result<Position> {
        let builder = self.request(Method::PATCH, &format!("/positions/{position_id}/status"));
        Ok(self.data(builder).await?.data)
    }

    pub async fn delete_position(&self, position_id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/positions/{position_id}/delete")))
            .await?;
        Ok(())
    }

    // candidates

    pub async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let builder = self.request(Method::GET, "/candidates").query(filter);
        Ok(self.data(builder).await?.data)
    }

    // votes

    /// Cast a vote. Success or failure only; the response body is ignored.
    pub async fn cast_vote(&self, position_id: &str, candidate_id: &str) -> Result<()> {
        let body = VoteRequest {
            position_id: position_id.to_string(),
            candidate_id: candidate_id.to_string(),
        };
        self.send(self.request(Method::POST, "/votes/cast").json(&body))
            .await?;
        Ok(())
    }

    pub async fn results(&self, position_id: &str) -> Result<Vec<ResultRecord>> {
        self.get(&format!("/votes/{position_id}/results")).await
    }
}

/// Pull a human readable message out of an error body, if there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default()
}
