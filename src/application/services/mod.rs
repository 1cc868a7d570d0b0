// src/application/services/mod.rs
pub mod auth_flow;
pub mod gateway;

use std::sync::Arc;

use crate::application::services::{auth_flow::AuthFlowService, gateway::GatewayService};

/// Aggregate handed to the HTTP layer. The auth router and the gateway
/// router share a single instance.
pub struct ApplicationServices {
    pub auth_flow: Arc<AuthFlowService>,
    pub gateway: Arc<GatewayService>,
}

impl ApplicationServices {
    pub fn new(auth_flow: Arc<AuthFlowService>, gateway: Arc<GatewayService>) -> Self {
        Self { auth_flow, gateway }
    }
}
