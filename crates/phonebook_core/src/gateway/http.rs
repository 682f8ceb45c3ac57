//! `reqwest`-backed gateway for the contacts REST backend.
//!
//! # Responsibility
//! - Build requests for `/auth/*` and `/contacts` endpoints.
//! - Attach `Authorization: Bearer <token>` whenever the session holds one.
//! - Map HTTP status codes onto `GatewayError` kinds.
//!
//! # Invariants
//! - The token is read from the session store on every request, never cached.
//! - Token, password and email values are never logged.

use super::{AuthApi, ContactApi, Credentials, GatewayError, GatewayResult};
use crate::config::ClientConfig;
use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::session::{BearerToken, SessionStore};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Remote operation being performed, used for status mapping and log events.
#[derive(Debug, Clone)]
enum Operation {
    List,
    Create,
    Update(ContactId),
    Delete(ContactId),
    Login,
    Signup,
}

impl Operation {
    fn target(&self) -> Option<&ContactId> {
        match self {
            Self::Update(id) | Self::Delete(id) => Some(id),
            _ => None,
        }
    }

    fn is_auth_endpoint(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::List => "list_contacts",
            Self::Create => "create_contact",
            Self::Update(_) => "update_contact",
            Self::Delete(_) => "delete_contact",
            Self::Login => "login",
            Self::Signup => "signup",
        };
        f.write_str(name)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(alias = "access_token")]
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP gateway over the contacts backend.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl HttpGateway {
    /// Creates a gateway rooted at `base_url`.
    ///
    /// # Errors
    /// - `Network` when the base URL cannot carry a path or the HTTP client
    ///   cannot be built.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> GatewayResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Network(format!(
                "base url `{base_url}` cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Network(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// Creates a gateway from loaded client configuration.
    pub fn from_config(
        config: &ClientConfig,
        session: Arc<dyn SessionStore>,
    ) -> GatewayResult<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout, session)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> GatewayResult<(RequestBuilder, String)> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if let Some(token) = self.session.get_token()? {
            builder = builder.bearer_auth(token.expose());
        }
        Ok((builder, request_id))
    }

    async fn execute(
        &self,
        operation: &Operation,
        builder: RequestBuilder,
        request_id: &str,
    ) -> GatewayResult<Response> {
        let started_at = Instant::now();
        debug!("event=api_call module=gateway status=start op={operation} request_id={request_id}");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "event=api_call module=gateway status=error op={operation} request_id={request_id} duration_ms={} error_code=network",
                    started_at.elapsed().as_millis()
                );
                return Err(GatewayError::Network(err.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            info!(
                "event=api_call module=gateway status=ok op={operation} request_id={request_id} http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Ok(response);
        }

        let message = error_message(response, status).await;
        let err = classify(operation, status, message);
        warn!(
            "event=api_call module=gateway status=error op={operation} request_id={request_id} http_status={} duration_ms={} error_code={}",
            status.as_u16(),
            started_at.elapsed().as_millis(),
            err.code()
        );
        Err(err)
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        method: Method,
        url: Url,
        body: Option<&ContactFields>,
    ) -> GatewayResult<T> {
        let (mut builder, request_id) = self.request(method, url)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(&operation, builder, &request_id).await?;
        Ok(response.json::<T>().await?)
    }

    async fn authenticate(
        &self,
        operation: Operation,
        credentials: &Credentials,
    ) -> GatewayResult<BearerToken> {
        let url = self.endpoint(&[
            "auth",
            if matches!(operation, Operation::Signup) {
                "signup"
            } else {
                "login"
            },
        ]);
        let (builder, request_id) = self.request(Method::POST, url)?;
        let response = self
            .execute(&operation, builder.json(credentials), &request_id)
            .await?;
        let body: TokenResponse = response.json().await?;
        if body.token.trim().is_empty() {
            return Err(GatewayError::InvalidResponse(
                "token missing from auth response".to_string(),
            ));
        }
        Ok(BearerToken::new(body.token))
    }
}

#[async_trait]
impl ContactApi for HttpGateway {
    async fn list_contacts(&self) -> GatewayResult<Vec<Contact>> {
        let url = self.endpoint(&["contacts"]);
        self.call_json(Operation::List, Method::GET, url, None).await
    }

    async fn create_contact(&self, fields: &ContactFields) -> GatewayResult<Contact> {
        let url = self.endpoint(&["contacts"]);
        self.call_json(Operation::Create, Method::POST, url, Some(fields))
            .await
    }

    async fn update_contact(
        &self,
        id: &ContactId,
        fields: &ContactFields,
    ) -> GatewayResult<Contact> {
        let url = self.endpoint(&["contacts", id.as_str()]);
        self.call_json(Operation::Update(id.clone()), Method::PUT, url, Some(fields))
            .await
    }

    async fn delete_contact(&self, id: &ContactId) -> GatewayResult<()> {
        let url = self.endpoint(&["contacts", id.as_str()]);
        let (builder, request_id) = self.request(Method::DELETE, url)?;
        self.execute(&Operation::Delete(id.clone()), builder, &request_id)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<BearerToken> {
        self.authenticate(Operation::Login, credentials).await
    }

    async fn signup(&self, credentials: &Credentials) -> GatewayResult<BearerToken> {
        self.authenticate(Operation::Signup, credentials).await
    }
}

fn classify(operation: &Operation, status: StatusCode, message: String) -> GatewayError {
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = operation.target() {
            return GatewayError::NotFound(id.clone());
        }
    }
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Validation(message)
        }
        StatusCode::UNAUTHORIZED if operation.is_auth_endpoint() => {
            GatewayError::InvalidCredentials
        }
        StatusCode::UNAUTHORIZED => GatewayError::Auth,
        StatusCode::CONFLICT => GatewayError::Conflict(message),
        other => GatewayError::UnexpectedStatus {
            status: other.as_u16(),
            message,
        },
    }
}

async fn error_message(response: Response, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    };
    let Ok(text) = response.text().await else {
        return fallback();
    };

    let from_json = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.message.or(body.error));
    let message = from_json.unwrap_or(text);
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return fallback();
    }
    trimmed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}
