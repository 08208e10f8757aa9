// API client module: a small blocking HTTP client that talks to a
// Portainer instance. Every public method maps to exactly one endpoint
// call; all of them funnel through the low-level `request` helper.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Login request payload. Portainer expects PascalCase field names.
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// Expected response from the auth endpoint. `jwt` is optional so a
/// 2xx response without a token can be detected instead of failing to
/// deserialize.
#[derive(Deserialize, Debug)]
pub struct AuthResponse {
    pub jwt: Option<String>,
}

/// Response from the status endpoint.
#[derive(Deserialize, Debug)]
pub struct StatusResponse {
    #[serde(rename = "Version")]
    pub version: Option<String>,
}

/// One environment variable pair as Portainer represents it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Subset of the stack detail response we care about.
#[derive(Deserialize, Debug)]
pub struct StackDetail {
    #[serde(rename = "Env")]
    pub env: Option<Vec<EnvVar>>,
}

/// Body for the stack update endpoint.
#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StackUpdateRequest {
    pub stack_file_content: String,
    pub prune: bool,
    pub env: Vec<EnvVar>,
}

/// A parsed response body. Portainer answers most calls with JSON, but
/// some successes carry an empty or non-JSON body (e.g. a 204); those
/// come back as `Raw` instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
}

impl Payload {
    /// The JSON value if the body parsed as JSON.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }
}

/// Blocking client for the Portainer REST API. Holds the base host URL
/// and, after a successful login, the bearer token attached to every
/// subsequent request. One instance per logical session; the token is
/// not meant for concurrent mutation.
pub struct PortainerClient {
    http: Client,
    host: String,
    token: Option<String>,
}

impl PortainerClient {
    /// Create a client for the given host. Requests carry a fixed
    /// 30-second timeout; nothing is retried.
    pub fn new(host: &str) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(PortainerClient {
            http,
            host: host.to_string(),
            token: None,
        })
    }

    /// Convenience constructor reading `PORTAINER_HOST`, falling back
    /// to a local default.
    pub fn from_env() -> ApiResult<Self> {
        let host = std::env::var("PORTAINER_HOST")
            .unwrap_or_else(|_| "http://localhost:9000".into());
        Self::new(&host)
    }

    /// Whether a token has been obtained.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Authenticate and store the returned bearer token. A 2xx response
    /// without a `jwt` field leaves the token unset and fails with
    /// `NotAuthenticated`.
    pub fn login(&mut self, username: &str, password: &str) -> ApiResult<()> {
        let body = serde_json::to_value(AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let payload = self.request(Method::POST, "api/auth", Some(body))?;
        let auth: AuthResponse = match payload.into_json() {
            Some(v) => serde_json::from_value(v)?,
            None => return Err(ApiError::NotAuthenticated),
        };
        match auth.jwt {
            Some(token) => {
                self.token = Some(token);
                Ok(())
            }
            None => Err(ApiError::NotAuthenticated),
        }
    }

    /// True iff the remote-reported version string equals
    /// `expected_version`. A mismatch or a missing field is `false`,
    /// not an error.
    pub fn check_status(&self, expected_version: &str) -> ApiResult<bool> {
        let payload = self.request(Method::GET, "api/status", None)?;
        let status: StatusResponse = match payload.into_json() {
            Some(v) => serde_json::from_value(v)?,
            None => return Ok(false),
        };
        Ok(status.version.as_deref() == Some(expected_version))
    }

    /// Raw payload of the endpoints collection.
    pub fn list_endpoints(&self) -> ApiResult<Payload> {
        self.request(Method::GET, "api/endpoints", None)
    }

    /// Raw payload of the stacks collection.
    pub fn list_stacks(&self) -> ApiResult<Payload> {
        self.request(Method::GET, "api/stacks", None)
    }

    /// Fetch a stack and extract its environment variables as a
    /// name-to-value map. Fails with `MalformedResponse` if the `Env`
    /// list is absent; never returns a partial map.
    pub fn get_env_vars(&self, stack_id: &str) -> ApiResult<HashMap<String, String>> {
        let path = format!("api/endpoints/1/stacks/{}", stack_id);
        let payload = self.request(Method::GET, &path, None)?;
        let detail: StackDetail = match payload.into_json() {
            Some(v) => serde_json::from_value(v)?,
            None => {
                return Err(ApiError::MalformedResponse(
                    "stack detail body was not JSON".into(),
                ))
            }
        };
        let env = detail.env.ok_or_else(|| {
            ApiError::MalformedResponse("stack detail missing Env list".into())
        })?;
        Ok(env.into_iter().map(|e| (e.name, e.value)).collect())
    }

    /// Push new file content and environment variables to a stack.
    pub fn update_stack(
        &self,
        stack_id: &str,
        stack_file_content: &str,
        env_vars: &HashMap<String, String>,
        prune: bool,
    ) -> ApiResult<Payload> {
        let path = format!("api/endpoints/1/stacks/{}", stack_id);
        let body = serde_json::to_value(StackUpdateRequest {
            stack_file_content: stack_file_content.to_string(),
            prune,
            env: env_vars
                .iter()
                .map(|(k, v)| EnvVar {
                    name: k.clone(),
                    value: v.clone(),
                })
                .collect(),
        })?;
        self.request(Method::PUT, &path, Some(body))
    }

    /// Read a stack file from disk and push it. A read failure (missing
    /// file, permissions) propagates as `Io` before any network call.
    pub fn update_stack_from_file(
        &self,
        stack_id: &str,
        stack_file_path: &Path,
        env_vars: &HashMap<String, String>,
        prune: bool,
    ) -> ApiResult<Payload> {
        let content = fs::read_to_string(stack_file_path)?;
        self.update_stack(stack_id, &content, env_vars, prune)
    }

    /// Low-level request primitive. Joins host and path, attaches the
    /// bearer header only when a token is present, sends a JSON body for
    /// non-GET methods, and parses the response. Non-2xx responses fail
    /// with `HttpStatus`; 2xx bodies that are not valid JSON come back
    /// as `Payload::Raw`.
    fn request(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Payload> {
        let url = join_url(&self.host, path);
        let mut req = self.http.request(method, url).headers(self.auth_headers());
        if let Some(body) = &body {
            req = req.json(body);
        }
        let response = req.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes()?;
        Ok(parse_payload(&bytes))
    }

    /// Authorization header map; empty when no token has been obtained.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}

/// Join host and path with exactly one separator, whatever combination
/// of trailing/leading slashes the inputs carry.
fn join_url(host: &str, path: &str) -> String {
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Parse a response body as JSON, falling back to the raw bytes when it
/// is not valid JSON (empty 204 bodies, plain-text responses).
fn parse_payload(bytes: &[u8]) -> Payload {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(v) => Payload::Json(v),
        Err(_) => Payload::Raw(bytes.to_vec()),
    }
}

/// Merge a remote environment set with local overrides. The result is
/// the union of keys; overrides win on collision.
pub fn merge_env_vars(
    remote: HashMap<String, String>,
    overrides: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = remote;
    merged.extend(overrides);
    merged
}
