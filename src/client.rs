//! Remote schema service access
//!
//! [`SchemaService`] is the seam between the downloader and the registry.
//! [`HttpSchemaService`] talks to the Pub/Sub v1 REST API; tests plug in
//! their own implementation.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::schema::{Schema, SchemaName};

/// Default Pub/Sub REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com/v1";

/// Operations the downloader needs from a schema registry
pub trait SchemaService {
    /// List every schema in `project` (names and types; definitions may be empty)
    fn list_schemas(&self, project: &str) -> Result<Vec<Schema>>;

    /// Fetch a schema with its definition by qualified name
    fn get_schema(&self, name: &str) -> Result<Schema>;

    /// Release any connection state. Called once by [`ClientGuard`].
    fn close(&mut self) {}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSchemasResponse {
    #[serde(default)]
    schemas: Vec<Schema>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Blocking REST client for the Pub/Sub schema API
#[derive(Debug)]
pub struct HttpSchemaService {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpSchemaService {
    /// Create a client for `endpoint` with an optional OAuth2 bearer token
    pub fn new(endpoint: impl Into<String>, access_token: Option<String>) -> Result<Self> {
        Self::with_timeout(endpoint, access_token, Duration::from_secs(30))
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Get the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) => format!("{}: {}", code, envelope.error.message),
                None => envelope.error.message,
            },
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };

        Err(SchemaError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

impl SchemaService for HttpSchemaService {
    fn list_schemas(&self, project: &str) -> Result<Vec<Schema>> {
        let url = format!("{}/projects/{}/schemas", self.endpoint, project);
        let mut schemas = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).query(&[("view", "BASIC")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = Self::check(self.authorized(request).send()?)?;
            let page: ListSchemasResponse = decode(response)?;
            debug!(project, count = page.schemas.len(), "listed schema page");
            schemas.extend(page.schemas);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(schemas)
    }

    fn get_schema(&self, name: &str) -> Result<Schema> {
        let url = format!("{}/{}", self.endpoint, name);
        let request = self.client.get(&url).query(&[("view", "FULL")]);
        let response = Self::check(self.authorized(request).send()?)?;
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    parse_body(&response.text()?)
}

/// Parse a registry response body; malformed JSON is a [`SchemaError::Json`]
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Owns a [`SchemaService`] and closes it exactly once, either on an
/// explicit [`close`](ClientGuard::close) or when dropped.
pub struct ClientGuard {
    service: Option<Box<dyn SchemaService>>,
}

impl ClientGuard {
    pub fn new(service: Box<dyn SchemaService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    /// The wrapped service, or `None` once closed
    pub fn service(&self) -> Option<&dyn SchemaService> {
        self.service.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.service.is_none()
    }

    /// Close the service. Later calls are no-ops.
    pub fn close(&mut self) {
        if let Some(mut service) = self.service.take() {
            debug!("closing schema service client");
            service.close();
        }
    }
}

impl Drop for ClientGuard {
    fn drop(&mut self) {
        if self.service.is_some() {
            debug!("schema service client was not closed explicitly; closing on drop");
            self.close();
        }
    }
}

/// Qualified name for `schema` (which may carry `@revision`) in `project`
pub fn qualified_name(project: &str, schema: &str) -> String {
    SchemaName::new(project, schema).to_string()
}
