use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// The only fatal runtime condition: startup aborts.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// I/O failure scoped to a single connection.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    #[error("unexpected reply: {0:?}")]
    Protocol(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
