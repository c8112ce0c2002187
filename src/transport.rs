use crate::decoder::{decode_body, ContentEncoding};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_ENCODING},
    Certificate, Client, StatusCode, Url,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(String),
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GraphQL request failed with status {status}: {message}")]
    GraphQL {
        status: u16,
        message: String,
        response: Value,
    },
}

/// A single GraphQL round trip. `variables: None` is the two-argument form
/// of the call; `Some` is the three-argument form.
#[async_trait]
pub trait Transport {
    async fn request(
        &self,
        endpoint: &str,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<Value, TransportError>;
}

pub trait ConnectionProfile {
    fn user(&self) -> Option<&String>;
    fn password(&self) -> Option<&String>;
    fn insecure(&self) -> bool;
    fn ca_cert(&self) -> Option<&String>;
    fn headers(&self) -> &HashMap<String, String>;
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Value>,
}

#[derive(Deserialize, Debug)]
struct GraphQLResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQLErrorEntry>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLErrorEntry {
    #[serde(default)]
    message: String,
}

pub struct HttpTransport {
    client: Client,
    user: Option<String>,
    password: Option<String>,
}

impl Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &"Client")
            .field("user", &self.user)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(profile: &impl ConnectionProfile) -> anyhow::Result<Self> {
        Ok(HttpTransport {
            client: Self::build_client(profile)?,
            user: profile.user().cloned(),
            password: profile.password().cloned(),
        })
    }

    fn build_client(profile: &impl ConnectionProfile) -> anyhow::Result<Client> {
        let insecure_access = profile.insecure();
        let mut cli_builder = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(insecure_access)
            .danger_accept_invalid_hostnames(insecure_access);

        if let Some(ca_cert) = profile.ca_cert() {
            let ca_cert = shellexpand::tilde(ca_cert).to_string();
            let cert = Certificate::from_pem(&std::fs::read(&ca_cert)?)?;
            cli_builder = cli_builder.add_root_certificate(cert);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in profile.headers() {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        Ok(cli_builder.default_headers(headers).build()?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        endpoint: &str,
        query: &str,
        variables: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = Url::parse(endpoint.trim())
            .map_err(|_| TransportError::InvalidEndpoint(endpoint.to_string()))?;

        let mut req_builder = self
            .client
            .post(url)
            .json(&GraphQLRequest { query, variables });

        if let Some(user) = &self.user {
            req_builder = req_builder.basic_auth(user, self.password.clone());
        }

        debug!(endpoint, with_variables = variables.is_some(), "sending GraphQL request");
        let res = req_builder.send().await?;
        let status = res.status();
        let encoding = ContentEncoding::from_header(
            res.headers()
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok()),
        );
        let body_bytes = res.bytes().await?;
        let body = decode_body(&body_bytes, encoding)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        trace!(%status, body = %body, "received GraphQL response");

        if !status.is_success() {
            // error pages are often HTML; keep the status rather than a parse error
            let response = serde_json::from_str(&body).unwrap_or(Value::Null);
            return Err(failure(status, response));
        }

        let response: Value = serde_json::from_str(&body)?;
        let envelope: GraphQLResponse = serde_json::from_value(response.clone())?;
        if envelope.errors.as_ref().is_some_and(|e| !e.is_empty()) {
            return Err(failure(status, response));
        }

        Ok(envelope.data.unwrap_or(Value::Null))
    }
}

fn failure(status: StatusCode, response: Value) -> TransportError {
    let messages = serde_json::from_value::<GraphQLResponse>(response.clone())
        .ok()
        .and_then(|envelope| envelope.errors)
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>();

    let message = if messages.is_empty() {
        status.canonical_reason().unwrap_or("unexpected status").to_string()
    } else {
        messages.join("; ")
    };

    TransportError::GraphQL {
        status: status.as_u16(),
        message,
        response,
    }
}
