// src/executor.rs
use crate::account::AccountStore;
use crate::error::{ErrorCode, GraphError};
use crate::odata::GraphQueryOptions;
use crate::session::Session;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Microsoft Graph v1.0 API root.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const USER_AGENT: &str = concat!("graphlink/", env!("CARGO_PKG_VERSION"));

/// HTTP methods Graph operations use. Defaults to GET.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GraphMethod {
    #[default]
    Get,
    Post,
    Patch,
    Delete,
}

impl GraphMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            GraphMethod::Get => reqwest::Method::GET,
            GraphMethod::Post => reqwest::Method::POST,
            GraphMethod::Patch => reqwest::Method::PATCH,
            GraphMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Declared payload shape of a Graph response: one object, or the items of
/// an OData collection's `value` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    Single,
    Array,
}

/// Resolved parameters for one outbound Graph call.
#[derive(Debug, Clone, Default)]
pub struct GraphRequest {
    /// Endpoint path under the API root, e.g. "me/messages".
    pub endpoint: String,
    pub method: GraphMethod,
    pub options: Option<GraphQueryOptions>,
    /// Attached only for POST/PATCH.
    pub body: Option<Value>,
}

impl GraphRequest {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: GraphMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_options(mut self, options: GraphQueryOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The uniform output of every operation. Exactly one of `data`/`error` is
/// populated. `status_code` is the upstream HTTP status, or 0 when the
/// request never produced a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphResult<T> {
    pub success: bool,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<GraphError>,
}

impl<T> GraphResult<T> {
    pub fn ok(status_code: u16, data: T) -> Self {
        Self {
            success: true,
            status_code,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(status_code: u16, error: GraphError) -> Self {
        Self {
            success: false,
            status_code,
            data: None,
            error: Some(error),
        }
    }

    /// Carry an error envelope across a change of payload type.
    pub fn recode<U>(self) -> GraphResult<U> {
        GraphResult {
            success: self.success,
            status_code: self.status_code,
            data: None,
            error: self.error,
        }
    }
}

/// Best-effort view of a Graph error body. Absence of any field is a
/// distinct branch, never a failure.
#[derive(Debug, Default, Deserialize)]
struct GraphErrorBody {
    #[serde(default)]
    error: Option<GraphErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct GraphErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Issues authenticated requests against Microsoft Graph and maps every
/// outcome into a [`GraphResult`]. One outbound request per call, no
/// retries, no shared state between calls.
pub struct GraphExecutor {
    client: reqwest::Client,
    base_url: String,
    debug_logs: bool,
}

impl GraphExecutor {
    pub fn new(base_url: impl Into<String>, debug_logs: bool) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            debug_logs,
        })
    }

    /// Resolve the caller's account, issue the request, and classify the
    /// outcome. Preconditions are checked in order (session, account,
    /// token); each miss short-circuits without touching the network.
    pub async fn execute(
        &self,
        session: &Session,
        store: &dyn AccountStore,
        provider_id: &str,
        request: &GraphRequest,
        shape: ResponseShape,
    ) -> GraphResult<Value> {
        let Some(user_id) = session.user_id.as_deref() else {
            return GraphResult::err(
                401,
                GraphError::new(ErrorCode::AccountNotFound, "No user session found"),
            );
        };

        let Some(account) = store.find_one(user_id, provider_id).await else {
            return GraphResult::err(404, GraphError::coded(ErrorCode::AccountNotFound));
        };

        let Some(token) = account.access_token.filter(|t| !t.is_empty()) else {
            return GraphResult::err(401, GraphError::coded(ErrorCode::NoAccessToken));
        };

        let mut url = format!(
            "{}/{}",
            self.base_url,
            request.endpoint.trim_start_matches('/')
        );
        if let Some(query) = request.options.as_ref().and_then(|o| o.query.as_ref()) {
            if let Some(qs) = query.to_query_string() {
                url.push('?');
                url.push_str(&qs);
            }
        }

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(custom) = request.options.as_ref().and_then(|o| o.headers.as_ref()) {
            for (key, value) in custom {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        for (key, value) in &headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            if matches!(request.method, GraphMethod::Post | GraphMethod::Patch) {
                builder = builder.json(body);
            }
        }

        if self.debug_logs {
            tracing::debug!(%url, method = ?request.method, "making Graph API request");
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                if self.debug_logs {
                    tracing::debug!(error = %e, "Graph API request failed before a response");
                }
                return GraphResult::err(
                    0,
                    GraphError::new(
                        ErrorCode::NetworkError,
                        format!("{}: {}", ErrorCode::NetworkError.message(), e),
                    ),
                );
            }
        };

        let status = response.status();
        if self.debug_logs {
            tracing::debug!(status = status.as_u16(), "Graph API response received");
        }

        if !status.is_success() {
            return self.classify_failure(status, response).await;
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                return GraphResult::err(
                    0,
                    GraphError::new(
                        ErrorCode::NetworkError,
                        format!("{}: {}", ErrorCode::NetworkError.message(), e),
                    ),
                );
            }
        };

        if self.debug_logs {
            tracing::debug!(body = %data, "Graph API response parsed");
        }

        match shape {
            ResponseShape::Array => match data.get("value") {
                Some(Value::Array(items)) => {
                    GraphResult::ok(status.as_u16(), Value::Array(items.clone()))
                }
                // Collection responses without the expected `value` field
                // fall through unchanged; callers should not rely on this.
                _ => GraphResult::ok(status.as_u16(), data),
            },
            ResponseShape::Single => GraphResult::ok(status.as_u16(), data),
        }
    }

    /// Fetch a single object, decoded into `T`.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        session: &Session,
        store: &dyn AccountStore,
        provider_id: &str,
        request: &GraphRequest,
    ) -> GraphResult<T> {
        decode(
            self.execute(session, store, provider_id, request, ResponseShape::Single)
                .await,
        )
    }

    /// Fetch a collection, decoded into `Vec<T>` from the response's
    /// `value` field. A 2xx response without that field cannot be decoded
    /// and is reported as a `GRAPH_API_ERROR` envelope.
    pub async fn fetch_many<T: DeserializeOwned>(
        &self,
        session: &Session,
        store: &dyn AccountStore,
        provider_id: &str,
        request: &GraphRequest,
    ) -> GraphResult<Vec<T>> {
        decode(
            self.execute(session, store, provider_id, request, ResponseShape::Array)
                .await,
        )
    }
}

fn decode<T: DeserializeOwned>(result: GraphResult<Value>) -> GraphResult<T> {
    if !result.success {
        return result.recode();
    }
    let status_code = result.status_code;
    match result.data {
        Some(data) => match serde_json::from_value(data) {
            Ok(decoded) => GraphResult::ok(status_code, decoded),
            Err(e) => GraphResult::err(
                status_code,
                GraphError::new(
                    ErrorCode::GraphApiError,
                    format!("unexpected response shape: {}", e),
                ),
            ),
        },
        None => GraphResult::err(status_code, GraphError::coded(ErrorCode::GraphApiError)),
    }
}

impl GraphExecutor {
    async fn classify_failure(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GraphResult<Value> {
        let status_code = status.as_u16();

        if status_code == 401 {
            return GraphResult::err(401, GraphError::coded(ErrorCode::TokenExpired));
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<GraphErrorBody> = serde_json::from_str(&body).ok();

        if status_code == 403 {
            let Some(parsed) = parsed else {
                // Ambiguous upstream failures are assumed to be permission
                // issues.
                return GraphResult::err(403, GraphError::coded(ErrorCode::InvalidScopes));
            };
            let code = parsed.error.as_ref().and_then(|e| e.code.as_deref());
            let message = parsed.error.as_ref().and_then(|e| e.message.as_deref());
            let scope_problem =
                code == Some("Forbidden") || message.is_some_and(|m| m.contains("scope"));
            if scope_problem {
                return GraphResult::err(403, GraphError::coded(ErrorCode::InvalidScopes));
            }
            let message = message.unwrap_or(ErrorCode::GraphApiError.message());
            return GraphResult::err(403, GraphError::new(ErrorCode::GraphApiError, message));
        }

        let embedded = parsed.and_then(|b| b.error).and_then(|e| e.message);
        let message = embedded.unwrap_or_else(|| {
            format!(
                "{}: {} {}",
                ErrorCode::GraphApiError.message(),
                status_code,
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        });
        GraphResult::err(
            status_code,
            GraphError::new(ErrorCode::GraphApiError, message),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_camel_case_and_omits_absent_half() {
        let ok: GraphResult<Value> = GraphResult::ok(200, serde_json::json!({"id": "1"}));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());

        let err: GraphResult<Value> =
            GraphResult::err(401, GraphError::coded(ErrorCode::TokenExpired));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"]["code"], "TOKEN_EXPIRED");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn method_default_is_get() {
        assert_eq!(GraphMethod::default(), GraphMethod::Get);
        let json = serde_json::to_string(&GraphMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }
}
