//! Line-protocol client used by the buyer and by integration tests.

use std::io;

use dispatch::PriceRequest;
use dispatch::codec::ERROR_PREFIX;
use dispatch::request::{PRICE_QUERY, parse_strategy, split_fields};
use market::Strategy;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

use crate::error::ServerError;

/// Decoded server reply.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceReply {
    Quoted {
        strategy: Strategy,
        item: String,
        price: f64,
    },
    Error(String),
}

impl PriceReply {
    /// Parses `STRATEGY:PRICE:ITEM:PRICE` or `ERROR:<message>`.
    pub fn parse(line: &str) -> Result<Self, ServerError> {
        if let Some(msg) = line
            .strip_prefix(ERROR_PREFIX)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            return Ok(PriceReply::Error(msg.to_string()));
        }

        let bad = || ServerError::Protocol(line.to_string());
        let fields = split_fields(line);
        let [strategy, query, item, price] = fields.as_slice() else {
            return Err(bad());
        };
        if *query != PRICE_QUERY {
            return Err(bad());
        }

        Ok(PriceReply::Quoted {
            strategy: parse_strategy(strategy).ok_or_else(bad)?,
            item: item.to_string(),
            price: price.parse().map_err(|_| bad())?,
        })
    }
}

pub struct PriceClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl PriceClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ServerError> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
        })
    }

    /// Sends one raw line and returns the raw reply line.
    pub async fn request_line(&mut self, line: &str) -> Result<String, ServerError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;

        let reply = self.lines.next_line().await?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "server closed the connection")
        })?;
        debug!(request = line, %reply, "price exchange");
        Ok(reply)
    }

    pub async fn quote(
        &mut self,
        strategy: Strategy,
        item: &str,
    ) -> Result<PriceReply, ServerError> {
        let line = PriceRequest::new(strategy, item).to_line();
        let reply = self.request_line(&line).await?;
        PriceReply::parse(&reply)
    }

    pub async fn close(mut self) -> Result<(), ServerError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_errors() {
        assert_eq!(
            PriceReply::parse("STATIC:PRICE:laptop:15000000.0").unwrap(),
            PriceReply::Quoted {
                strategy: Strategy::Static,
                item: "laptop".into(),
                price: 15_000_000.0
            }
        );
        assert_eq!(
            PriceReply::parse("ERROR:Item not found").unwrap(),
            PriceReply::Error("Item not found".into())
        );
    }

    #[test]
    fn rejects_garbage() {
        for line in ["", "STATIC:PRICE:laptop", "STATIC:COST:laptop:1.0", "SPOT:PRICE:x:1.0", "STATIC:PRICE:x:abc"] {
            assert!(matches!(PriceReply::parse(line), Err(ServerError::Protocol(_))), "{line:?}");
        }
    }
}
