//! Price protocol behaviours of the seller agent.
//!
//! Two independent loops share the seller's mailbox:
//!   • static prices answer `Request` messages (`STATIC_PRICE:<item>`)
//!   • dynamic prices answer `QueryRef` messages (`DYNAMIC_PRICE:<item>`)
//!
//! Each loop takes only its own performative, so neither consumes the
//! other's traffic. Content that names no item gets no reply at all.

use std::sync::Arc;

use common::TraceId;
use common::logger::conversation_span;
use market::Strategy;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use super::bus::AgentBus;
use super::mailbox::Mailbox;
use super::message::{AclMessage, MessageTemplate, Performative};
use crate::codec::{content_request_prefix, encode_content_quote};
use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, ITEM_NOT_FOUND};
use crate::request::{PriceRequest, split_fields};

/// Performative each strategy listens for.
pub fn performative_for(strategy: Strategy) -> Performative {
    match strategy {
        Strategy::Static => Performative::Request,
        Strategy::Dynamic => Performative::QueryRef,
    }
}

/// Extracts the item from `<STRATEGY>_PRICE:<item>`; `None` when the prefix
/// or the item field is missing.
pub fn parse_content(strategy: Strategy, content: &str) -> Option<String> {
    if !content.starts_with(&content_request_prefix(strategy)) {
        return None;
    }
    split_fields(content).get(1).map(|s| s.to_string())
}

pub struct PriceMessageService<B: AgentBus> {
    dispatcher: Dispatcher,
    bus: Arc<B>,
    mailbox: Mailbox,
}

impl<B: AgentBus> PriceMessageService<B> {
    pub fn new(dispatcher: Dispatcher, bus: Arc<B>, mailbox: Mailbox) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            bus,
            mailbox,
        })
    }

    /// Starts both protocol loops.
    pub fn spawn(self: Arc<Self>) -> MessageServiceHandle {
        let static_loop = tokio::spawn(Arc::clone(&self).run_protocol(Strategy::Static));
        let dynamic_loop = tokio::spawn(Arc::clone(&self).run_protocol(Strategy::Dynamic));

        info!(agent = %self.mailbox.owner(), "static and dynamic price protocols active");

        MessageServiceHandle {
            mailbox: self.mailbox.clone(),
            tasks: vec![static_loop, dynamic_loop],
        }
    }

    /// Listen, match, reply until the mailbox closes.
    pub async fn run_protocol(self: Arc<Self>, strategy: Strategy) {
        let template = MessageTemplate::match_performative(performative_for(strategy));
        debug!(%strategy, "price protocol loop started");

        while let Some(msg) = self.mailbox.receive_matching(&template).await {
            let span = conversation_span(msg.sender.as_str(), &TraceId::new());

            async {
                let Some(reply) = self.answer(strategy, &msg) else {
                    debug!(content = %msg.content, "ignoring malformed price request");
                    return;
                };

                if let Err(e) = self.bus.send(reply).await {
                    warn!(error = %e, "failed to deliver price reply");
                }
            }
            .instrument(span)
            .await;
        }

        debug!(%strategy, "price protocol loop stopped");
    }

    /// Builds the reply for one matching message, or `None` when the
    /// message must be dropped silently.
    pub fn answer(&self, strategy: Strategy, msg: &AclMessage) -> Option<AclMessage> {
        let item = parse_content(strategy, &msg.content)?;
        tracing::Span::current().record("item", item.as_str());

        match self.dispatcher.dispatch(&PriceRequest::new(strategy, item)) {
            Ok(quote) => {
                info!(
                    item = %quote.item,
                    %strategy,
                    price = %format!("{:.0}", quote.price),
                    "sending price"
                );
                Some(msg.create_reply(Performative::Inform, encode_content_quote(&quote)))
            }
            Err(DispatchError::ItemNotFound(item)) => {
                debug!(%item, "refusing unknown item");
                Some(msg.create_reply(Performative::Refuse, ITEM_NOT_FOUND))
            }
            Err(e) => {
                debug!(error = %e, "dropping price request without reply");
                None
            }
        }
    }
}

/// Running protocol loops. Dropping the handle leaves them running.
pub struct MessageServiceHandle {
    mailbox: Mailbox,
    tasks: Vec<JoinHandle<()>>,
}

impl MessageServiceHandle {
    /// Closes the mailbox; both loops finish their current message and exit.
    pub fn shutdown(&self) {
        self.mailbox.close();
    }

    pub async fn join(self) {
        for t in self.tasks {
            if let Err(e) = t.await {
                warn!(error = %e, "price protocol loop aborted");
            }
        }
    }
}
