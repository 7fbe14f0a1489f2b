// src/client.rs
//! Companion client-side descriptor. Declares the operation set the server
//! plugin exposes so client codegen/type inference can mirror it; carries
//! no executable logic.

use crate::plugin::{EndpointSpec, ENDPOINTS, PLUGIN_ID};

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphClientPlugin;

impl GraphClientPlugin {
    pub fn new() -> Self {
        Self
    }

    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    /// Operation names, in server declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> {
        ENDPOINTS.iter().map(|e| e.name)
    }

    /// Route paths the server registers, for client-side path construction.
    pub fn routes(&self) -> impl Iterator<Item = &'static EndpointSpec> {
        ENDPOINTS.iter()
    }
}
