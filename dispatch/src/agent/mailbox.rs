use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::warn;

use super::bus::BusError;
use super::message::{AclMessage, AgentId, MessageTemplate};

/// Messages a mailbox holds before the oldest is dropped.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1024;

/// Inbound queue of one agent.
///
/// Supports selective receive: several loops may wait on the same mailbox
/// with different templates and each only ever takes messages it matches.
/// Cloning yields another handle to the same queue. The queue is bounded:
/// once full, each post evicts the oldest message, matched or not.
#[derive(Clone)]
pub struct Mailbox {
    inner: Arc<MailboxInner>,
}

struct MailboxInner {
    owner: AgentId,
    queue: Mutex<VecDeque<AclMessage>>,
    capacity: usize,
    arrived: Notify,
    closed: AtomicBool,
}

impl Mailbox {
    pub fn new(owner: AgentId) -> Self {
        Self::with_capacity(owner, DEFAULT_MAILBOX_CAPACITY)
    }

    pub fn with_capacity(owner: AgentId, capacity: usize) -> Self {
        Self {
            inner: Arc::new(MailboxInner {
                owner,
                queue: Mutex::new(VecDeque::new()),
                capacity: capacity.max(1),
                arrived: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn owner(&self) -> &AgentId {
        &self.inner.owner
    }

    /// Enqueues `msg` and wakes every waiting receiver so each can re-check
    /// its own template.
    pub fn post(&self, msg: AclMessage) -> Result<(), BusError> {
        if self.is_closed() {
            return Err(BusError::MailboxClosed(self.inner.owner.to_string()));
        }
        {
            let mut q = self.inner.queue.lock();
            if q.len() >= self.inner.capacity {
                let dropped = q.pop_front().map(|m| m.performative);
                warn!(
                    agent = %self.inner.owner,
                    performative = ?dropped,
                    "mailbox full, dropping oldest message"
                );
            }
            q.push_back(msg);
        }
        self.inner.arrived.notify_waiters();
        Ok(())
    }

    /// Removes and returns the oldest message matching `template`, if any.
    /// Non-matching messages stay queued in order.
    pub fn receive(&self, template: &MessageTemplate) -> Option<AclMessage> {
        let mut q = self.inner.queue.lock();
        let idx = q.iter().position(|m| template.matches(m))?;
        q.remove(idx)
    }

    /// Suspends until a matching message is queued. Returns `None` once the
    /// mailbox is closed and no matching message remains.
    pub async fn receive_matching(&self, template: &MessageTemplate) -> Option<AclMessage> {
        loop {
            // Register interest before checking so a post between the check
            // and the await is not missed.
            let arrived = self.inner.arrived.notified();
            tokio::pin!(arrived);
            arrived.as_mut().enable();

            if let Some(msg) = self.receive(template) {
                return Some(msg);
            }
            if self.is_closed() {
                return None;
            }

            arrived.await;
        }
    }

    /// Stops accepting messages and releases every waiting receiver.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.arrived.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
