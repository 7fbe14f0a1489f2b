// src/plugin.rs
use crate::account::{AccountStore, MICROSOFT_PROVIDER_ID};
use crate::error::{ErrorCode, GraphError};
use crate::executor::{GraphExecutor, GraphRequest, GraphResult, ResponseShape, GRAPH_BASE_URL};
use crate::odata::GraphQueryOptions;
use crate::session::Session;
use crate::types::{Calendar, Contact, Drive, Event, Message, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Plugin id, also the provider id accounts are stored under.
pub const PLUGIN_ID: &str = "microsoft";

/// Plugin configuration.
#[derive(Debug, Clone)]
pub struct GraphPluginOptions {
    /// Log outbound URLs and response statuses/bodies at debug level.
    pub debug_logs: bool,
    /// API root; overridable for tests against a local stub.
    pub base_url: String,
}

impl Default for GraphPluginOptions {
    fn default() -> Self {
        Self {
            debug_logs: false,
            base_url: GRAPH_BASE_URL.to_string(),
        }
    }
}

/// One exposed operation: route path for host registration, resource path
/// issued upstream, declared response shape, and the Graph permission the
/// stored token needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub route: &'static str,
    pub resource: &'static str,
    pub shape: ResponseShape,
    pub scope: &'static str,
}

/// The six resource operations, all GET, all `/me`-scoped.
pub const ENDPOINTS: [EndpointSpec; 6] = [
    EndpointSpec {
        name: "me",
        route: "/microsoft/me",
        resource: "me",
        shape: ResponseShape::Single,
        scope: "User.Read",
    },
    EndpointSpec {
        name: "me_calendar",
        route: "/microsoft/me/calendar",
        resource: "me/calendar",
        shape: ResponseShape::Single,
        scope: "Calendars.Read",
    },
    EndpointSpec {
        name: "me_events",
        route: "/microsoft/me/events",
        resource: "me/events",
        shape: ResponseShape::Array,
        scope: "Calendars.Read",
    },
    EndpointSpec {
        name: "me_contacts",
        route: "/microsoft/me/contacts",
        resource: "me/contacts",
        shape: ResponseShape::Array,
        scope: "Contacts.Read",
    },
    EndpointSpec {
        name: "me_messages",
        route: "/microsoft/me/messages",
        resource: "me/messages",
        shape: ResponseShape::Array,
        scope: "Mail.Read",
    },
    EndpointSpec {
        name: "me_drive",
        route: "/microsoft/me/drive",
        resource: "me/drive",
        shape: ResponseShape::Single,
        scope: "Files.Read",
    },
];

/// Microsoft Graph plugin: resolves the caller's linked account and serves
/// the `/me`-scoped resource operations as normalized envelopes. Construct
/// one instance and share it by reference; it holds no per-request state.
pub struct GraphPlugin {
    executor: GraphExecutor,
    store: Arc<dyn AccountStore>,
}

impl GraphPlugin {
    pub fn new(
        options: GraphPluginOptions,
        store: Arc<dyn AccountStore>,
    ) -> Result<Self, reqwest::Error> {
        let executor = GraphExecutor::new(options.base_url, options.debug_logs)?;
        Ok(Self { executor, store })
    }

    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    pub fn endpoints(&self) -> &'static [EndpointSpec] {
        &ENDPOINTS
    }

    /// Signed-in user's profile. Requires User.Read.
    pub async fn me(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<User> {
        self.one(session, "me", options).await
    }

    /// Default calendar. Requires Calendars.Read.
    pub async fn me_calendar(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Calendar> {
        self.one(session, "me/calendar", options).await
    }

    /// Calendar events. Requires Calendars.Read.
    pub async fn me_events(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Vec<Event>> {
        self.many(session, "me/events", options).await
    }

    /// Contacts. Requires Contacts.Read.
    pub async fn me_contacts(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Vec<Contact>> {
        self.many(session, "me/contacts", options).await
    }

    /// Mail messages. Requires Mail.Read.
    pub async fn me_messages(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Vec<Message>> {
        self.many(session, "me/messages", options).await
    }

    /// OneDrive root. Requires Files.Read.
    pub async fn me_drive(
        &self,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Drive> {
        self.one(session, "me/drive", options).await
    }

    /// Dispatch an operation by its [`EndpointSpec`] name, returning the
    /// raw JSON envelope. `None` for an unknown operation name.
    pub async fn call_raw(
        &self,
        operation: &str,
        session: &Session,
        options: Option<GraphQueryOptions>,
    ) -> Option<GraphResult<Value>> {
        let spec = ENDPOINTS.iter().find(|e| e.name == operation)?;
        if let Some(invalid) = validate(&options) {
            return Some(invalid);
        }
        let request = request_for(spec.resource, options);
        Some(
            self.executor
                .execute(
                    session,
                    self.store.as_ref(),
                    MICROSOFT_PROVIDER_ID,
                    &request,
                    spec.shape,
                )
                .await,
        )
    }

    async fn one<T: DeserializeOwned>(
        &self,
        session: &Session,
        resource: &str,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<T> {
        if let Some(invalid) = validate(&options) {
            return invalid.recode();
        }
        let request = request_for(resource, options);
        self.executor
            .fetch_one(session, self.store.as_ref(), MICROSOFT_PROVIDER_ID, &request)
            .await
    }

    async fn many<T: DeserializeOwned>(
        &self,
        session: &Session,
        resource: &str,
        options: Option<GraphQueryOptions>,
    ) -> GraphResult<Vec<T>> {
        if let Some(invalid) = validate(&options) {
            return invalid.recode();
        }
        let request = request_for(resource, options);
        self.executor
            .fetch_many(session, self.store.as_ref(), MICROSOFT_PROVIDER_ID, &request)
            .await
    }
}

fn request_for(resource: &str, options: Option<GraphQueryOptions>) -> GraphRequest {
    let mut request = GraphRequest::get(resource);
    if let Some(options) = options {
        request = request.with_options(options);
    }
    request
}

/// Guard against query options the host failed to validate. Hosts normally
/// reject these at their own 400 boundary via
/// [`GraphQueryOptions::from_json`]; this keeps the envelope contract for
/// callers that skip that step.
fn validate(options: &Option<GraphQueryOptions>) -> Option<GraphResult<Value>> {
    let options = options.as_ref()?;
    let err = options.validate().err()?;
    Some(GraphResult::err(
        400,
        GraphError::new(ErrorCode::GraphApiError, err.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_table_covers_all_six_operations() {
        assert_eq!(ENDPOINTS.len(), 6);
        let singles: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|e| e.shape == ResponseShape::Single)
            .map(|e| e.name)
            .collect();
        assert_eq!(singles, ["me", "me_calendar", "me_drive"]);
        let arrays: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|e| e.shape == ResponseShape::Array)
            .map(|e| e.name)
            .collect();
        assert_eq!(arrays, ["me_events", "me_contacts", "me_messages"]);
    }

    #[test]
    fn routes_mirror_resource_paths() {
        for spec in &ENDPOINTS {
            assert_eq!(spec.route, format!("/microsoft/{}", spec.resource));
        }
    }
}
