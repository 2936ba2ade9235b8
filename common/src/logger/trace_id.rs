use std::fmt;

use uuid::Uuid;

/// Correlation ID that follows one client connection or one agent conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in log fields; the first uuid group is unique enough
    /// to follow one connection through interleaved output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_short_form_is_a_prefix() {
        let a = TraceId::new();
        let b = TraceId::new();

        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
        assert!(a.to_string().starts_with(&a.short()));
    }
}
