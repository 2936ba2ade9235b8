//! Message Interface
//!
//! Request/reply exchange with an agent bus. The bus here is in-process
//! ([`LocalBus`]); [`AgentBus`] is the seam a remote transport would plug into.

pub mod bus;
pub mod mailbox;
pub mod message;
pub mod service;

pub use bus::{AgentBus, BusError, LocalBus};
pub use mailbox::{DEFAULT_MAILBOX_CAPACITY, Mailbox};
pub use message::{AclMessage, AgentId, MessageTemplate, Performative};
pub use service::{MessageServiceHandle, PriceMessageService};
