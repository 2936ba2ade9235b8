use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

use super::mailbox::Mailbox;
use super::message::{AclMessage, AgentId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("agent already registered: {0}")]
    AlreadyRegistered(String),

    #[error("mailbox closed: {0}")]
    MailboxClosed(String),
}

/// Delivery side of the agent platform.
#[async_trait]
pub trait AgentBus: Send + Sync + 'static {
    async fn send(&self, msg: AclMessage) -> Result<(), BusError>;
}

/// In-process bus: one mailbox per registered agent.
#[derive(Default)]
pub struct LocalBus {
    agents: RwLock<HashMap<AgentId, Mailbox>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` and returns its mailbox.
    pub fn register(&self, id: impl Into<AgentId>) -> Result<Mailbox, BusError> {
        let id = id.into();
        let mut agents = self.agents.write();
        if agents.contains_key(&id) {
            return Err(BusError::AlreadyRegistered(id.to_string()));
        }

        let mailbox = Mailbox::new(id.clone());
        agents.insert(id.clone(), mailbox.clone());

        info!(agent = %id, "agent registered");
        Ok(mailbox)
    }

    /// Removes `id` and closes its mailbox.
    pub fn deregister(&self, id: &AgentId) {
        if let Some(mb) = self.agents.write().remove(id) {
            mb.close();
            info!(agent = %id, "agent deregistered");
        }
    }

    pub fn is_registered(&self, id: &AgentId) -> bool {
        self.agents.read().contains_key(id)
    }
}

#[async_trait]
impl AgentBus for LocalBus {
    async fn send(&self, msg: AclMessage) -> Result<(), BusError> {
        let mailbox = self
            .agents
            .read()
            .get(&msg.receiver)
            .cloned()
            .ok_or_else(|| BusError::UnknownAgent(msg.receiver.to_string()))?;

        debug!(
            from = %msg.sender,
            to = %msg.receiver,
            performative = ?msg.performative,
            "message delivered"
        );
        mailbox.post(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{MessageTemplate, Performative};

    #[tokio::test]
    async fn routes_to_receiver_mailbox() {
        let bus = LocalBus::new();
        let seller = bus.register("seller").unwrap();

        bus.send(AclMessage::new(Performative::Request, "buyer", "seller", "hi"))
            .await
            .unwrap();

        let m = seller.receive(&MessageTemplate::any()).unwrap();
        assert_eq!(m.content, "hi");
    }

    #[tokio::test]
    async fn unknown_receiver_is_an_error() {
        let bus = LocalBus::new();
        let err = bus
            .send(AclMessage::new(Performative::Request, "buyer", "nobody", ""))
            .await
            .unwrap_err();

        assert_eq!(err, BusError::UnknownAgent("nobody".into()));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let bus = LocalBus::new();
        bus.register("seller").unwrap();

        assert!(matches!(
            bus.register("seller"),
            Err(BusError::AlreadyRegistered(_))
        ));

        bus.deregister(&"seller".into());
        assert!(!bus.is_registered(&"seller".into()));
        assert!(bus.register("seller").is_ok());
    }
}
