//! Text encodings of quotes for the two external interfaces.

use market::{Quote, Strategy};

use crate::dispatcher::Dispatcher;
use crate::error::INVALID_FORMAT;
use crate::request::{PRICE_QUERY, PriceRequest, strategy_token};

/// Prefix of the error reply on the line protocol.
pub const ERROR_PREFIX: &str = "ERROR";

/// Positional decimal text for a price; always carries a fractional part
/// (`15000000.0`, `7312345.678`, never `1e16`).
pub fn format_price(price: f64) -> String {
    let text = price.to_string();
    if price.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

/// `STRATEGY:PRICE:ITEM:PRICE`
pub fn encode_line_quote(quote: &Quote) -> String {
    format!(
        "{}:{}:{}:{}",
        strategy_token(quote.strategy),
        PRICE_QUERY,
        quote.item,
        format_price(quote.price)
    )
}

/// `ERROR:<message>`
pub fn encode_line_error(message: &str) -> String {
    format!("{ERROR_PREFIX}:{message}")
}

/// Answers one request line of the network protocol (no trailing newline on
/// either side).
pub fn respond_to_line(dispatcher: &Dispatcher, line: &str) -> String {
    let request = match PriceRequest::from_line(line) {
        Ok(r) => r,
        Err(_) => return encode_line_error(INVALID_FORMAT),
    };

    match dispatcher.dispatch(&request) {
        Ok(quote) => encode_line_quote(&quote),
        Err(e) => encode_line_error(e.wire_message()),
    }
}

/// `<STRATEGY>_PRICE`, the content prefix of agent requests.
pub fn content_request_prefix(strategy: Strategy) -> String {
    format!("{}_{}", strategy_token(strategy), PRICE_QUERY)
}

/// `<STRATEGY>_PRICE_RESPONSE:<item>:<price>`
pub fn encode_content_quote(quote: &Quote) -> String {
    format!(
        "{}_RESPONSE:{}:{}",
        content_request_prefix(quote.strategy),
        quote.item,
        format_price(quote.price)
    )
}
