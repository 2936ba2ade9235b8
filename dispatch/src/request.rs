use std::fmt;

use market::Strategy;

use crate::error::DispatchError;

pub const STATIC_TOKEN: &str = "STATIC";
pub const DYNAMIC_TOKEN: &str = "DYNAMIC";
/// The only supported query type.
pub const PRICE_QUERY: &str = "PRICE";

pub fn strategy_token(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Static => STATIC_TOKEN,
        Strategy::Dynamic => DYNAMIC_TOKEN,
    }
}

/// Case-sensitive: only the upper-case tokens are accepted.
pub fn parse_strategy(token: &str) -> Option<Strategy> {
    match token {
        STATIC_TOKEN => Some(Strategy::Static),
        DYNAMIC_TOKEN => Some(Strategy::Dynamic),
        _ => None,
    }
}

/// Splits on `:` and discards trailing empty fields, so `"A:B:"` has two
/// fields and `"A::C"` has three.
pub fn split_fields(s: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = s.split(':').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Protocol-neutral price query, carrying the raw tokens so that the
/// dispatcher owns every validation decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub strategy: String,
    pub query_type: String,
    pub item: String,
}

impl PriceRequest {
    pub fn new(strategy: Strategy, item: impl Into<String>) -> Self {
        Self {
            strategy: strategy_token(strategy).to_string(),
            query_type: PRICE_QUERY.to_string(),
            item: item.into(),
        }
    }

    /// Decodes `STRATEGY:QUERY:ITEM`. Fields past the third are ignored.
    pub fn from_line(line: &str) -> Result<Self, DispatchError> {
        let fields = split_fields(line);
        match fields.as_slice() {
            [strategy, query_type, item, ..] => Ok(Self {
                strategy: strategy.to_string(),
                query_type: query_type.to_string(),
                item: item.to_string(),
            }),
            _ => Err(DispatchError::MalformedRequest(format!(
                "expected 3 fields, got {}",
                fields.len()
            ))),
        }
    }

    /// Line form without the trailing newline.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PriceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.strategy, self.query_type, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_only_trailing_empties() {
        assert_eq!(split_fields("STATIC:PRICE:"), ["STATIC", "PRICE"]);
        assert_eq!(split_fields("STATIC::laptop"), ["STATIC", "", "laptop"]);
        assert_eq!(split_fields("PRICE"), ["PRICE"]);
        assert!(split_fields("").is_empty());
        assert!(split_fields(":::").is_empty());
    }

    #[test]
    fn decodes_three_or_more_fields() {
        let r = PriceRequest::from_line("DYNAMIC:PRICE:smartphone:extra").unwrap();
        assert_eq!(r, PriceRequest::new(Strategy::Dynamic, "smartphone"));
    }

    #[test]
    fn short_lines_are_malformed() {
        for line in ["PRICE", "STATIC:PRICE", "STATIC:PRICE:", ""] {
            assert!(
                matches!(
                    PriceRequest::from_line(line),
                    Err(DispatchError::MalformedRequest(_))
                ),
                "{line:?}"
            );
        }
    }

    #[test]
    fn strategy_tokens_are_case_sensitive() {
        assert_eq!(parse_strategy("STATIC"), Some(Strategy::Static));
        assert_eq!(parse_strategy("DYNAMIC"), Some(Strategy::Dynamic));
        assert_eq!(parse_strategy("static"), None);
    }
}
