//! Startup wiring shared by the binary and the integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use dispatch::Dispatcher;
use dispatch::agent::{AgentId, LocalBus, MessageServiceHandle, PriceMessageService};
use market::PricingEngine;
use tracing::info;

use crate::config::AppConfig;
use crate::error::ServerError;
use crate::server::{SellerServer, ServerHandle};

/// A running seller: both interfaces over one pricing engine.
pub struct SellerApp {
    pub agent: AgentId,
    pub bus: Arc<LocalBus>,
    pub dispatcher: Dispatcher,
    server: ServerHandle,
    messages: MessageServiceHandle,
}

impl SellerApp {
    /// Builds the engine, registers the agent and binds the listener.
    /// A bind failure aborts startup.
    pub async fn start(cfg: &AppConfig) -> Result<Self, ServerError> {
        let catalog = cfg.build_catalog()?;
        info!(items = catalog.len(), "catalog loaded");

        let engine = Arc::new(PricingEngine::new(catalog, cfg.demand_seed));
        let dispatcher = Dispatcher::new(engine);

        let server = SellerServer::bind(cfg.listen_addr(), dispatcher.clone(), cfg.max_connections)
            .await?
            .spawn();

        let bus = Arc::new(LocalBus::new());
        let agent = AgentId::new(cfg.agent_name.as_str());
        let mailbox = bus
            .register(agent.clone())
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let messages = PriceMessageService::new(dispatcher.clone(), Arc::clone(&bus), mailbox).spawn();

        info!(%agent, addr = %server.local_addr(), "seller ready");

        Ok(Self {
            agent,
            bus,
            dispatcher,
            server,
            messages,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    pub fn active_connections(&self) -> usize {
        self.server.active_connections()
    }

    /// Closes the listener and the mailbox, then waits for every loop.
    pub async fn stop(self) {
        self.server.shutdown();
        self.messages.shutdown();

        self.server.join().await;
        self.messages.join().await;
        self.bus.deregister(&self.agent);

        info!("seller stopped");
    }
}
