use std::fmt;

/// Communicative act of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Performative {
    /// Ask the receiver to perform an action; used for static price requests.
    Request,
    /// Ask the receiver for the current value of something; dynamic price requests.
    QueryRef,
    Inform,
    Refuse,
    NotUnderstood,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AclMessage {
    pub performative: Performative,
    pub sender: AgentId,
    pub receiver: AgentId,
    pub content: String,
    pub conversation_id: Option<String>,
    pub reply_with: Option<String>,
    pub in_reply_to: Option<String>,
}

impl AclMessage {
    pub fn new(
        performative: Performative,
        sender: impl Into<AgentId>,
        receiver: impl Into<AgentId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            performative,
            sender: sender.into(),
            receiver: receiver.into(),
            content: content.into(),
            conversation_id: None,
            reply_with: None,
            in_reply_to: None,
        }
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_reply_with(mut self, tag: impl Into<String>) -> Self {
        self.reply_with = Some(tag.into());
        self
    }

    /// Reply addressed back to the sender, in the same conversation.
    pub fn create_reply(&self, performative: Performative, content: impl Into<String>) -> Self {
        Self {
            performative,
            sender: self.receiver.clone(),
            receiver: self.sender.clone(),
            content: content.into(),
            conversation_id: self.conversation_id.clone(),
            reply_with: None,
            in_reply_to: self.reply_with.clone(),
        }
    }
}

/// Predicate used for selective receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageTemplate {
    performative: Option<Performative>,
}

impl MessageTemplate {
    /// Matches every message.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn match_performative(p: Performative) -> Self {
        Self {
            performative: Some(p),
        }
    }

    pub fn matches(&self, msg: &AclMessage) -> bool {
        self.performative.is_none_or(|p| p == msg.performative)
    }
}
