// src/lib.rs
//! Graphlink: Microsoft Graph access for session-authenticated applications.
//!
//! The host application authenticates users and stores their Microsoft
//! OAuth tokens; this crate exchanges a stored token for Graph data and
//! returns a normalized success/error envelope. Nothing is thrown across
//! the public boundary: every operation resolves to a [`GraphResult`] and
//! callers branch on `success`.
//!
//! ```no_run
//! use graphlink_core::{
//!     GraphPlugin, GraphPluginOptions, LinkedAccount, MemoryAccountStore, Session,
//!     MICROSOFT_PROVIDER_ID,
//! };
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), reqwest::Error> {
//! let store = Arc::new(MemoryAccountStore::new());
//! store.insert(
//!     LinkedAccount::new("user-1", MICROSOFT_PROVIDER_ID).with_access_token("token"),
//! );
//! let plugin = GraphPlugin::new(GraphPluginOptions::default(), store)?;
//!
//! let session = Session::authenticated("user-1");
//! let profile = plugin.me(&session, None).await;
//! if profile.success {
//!     println!("{:?}", profile.data);
//! }
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod client;
pub mod error;
pub mod executor;
pub mod odata;
pub mod plugin;
pub mod session;
pub mod types;

pub use account::{AccountStore, LinkedAccount, MemoryAccountStore, MICROSOFT_PROVIDER_ID};
pub use client::GraphClientPlugin;
pub use error::{ErrorCode, GraphError, QueryError};
pub use executor::{
    GraphExecutor, GraphMethod, GraphRequest, GraphResult, ResponseShape, GRAPH_BASE_URL,
};
pub use odata::{GraphQueryOptions, ODataQuery, MAX_PAGE_SIZE};
pub use plugin::{EndpointSpec, GraphPlugin, GraphPluginOptions, ENDPOINTS, PLUGIN_ID};
pub use session::Session;
