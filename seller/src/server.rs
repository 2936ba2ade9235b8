//! Connection Server
//!
//! TCP listener for the line protocol. Every accepted socket gets its own
//! handler task; handlers never share anything except the dispatcher.
//!
//! Guarantees:
//! - one client's stall or transport failure never touches another client
//! - at most `max_connections` handlers run at once; extra sockets wait for a slot
//! - after shutdown no new reads are started and the listener is closed

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::TraceId;
use common::logger::{connection_span, warn_if_slow};
use dispatch::Dispatcher;
use dispatch::codec::respond_to_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{Instrument, Span, debug, error, info, warn};

use crate::error::ServerError;

/// Dispatch budget before a request is logged as slow.
const SLOW_REQUEST: Duration = Duration::from_millis(50);

pub struct SellerServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Dispatcher,
    slots: Arc<Semaphore>,
    max_connections: usize,
    active: Arc<AtomicUsize>,
}

impl SellerServer {
    /// Binds the listening socket. Failure here is fatal for startup.
    pub async fn bind(
        addr: SocketAddr,
        dispatcher: Dispatcher,
        max_connections: usize,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        let max_connections = max_connections.max(1);

        info!(%local_addr, max_connections, "price server listening");

        Ok(Self {
            listener,
            local_addr,
            dispatcher,
            slots: Arc::new(Semaphore::new(max_connections)),
            max_connections,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Moves the accept loop onto the runtime.
    pub fn spawn(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let local_addr = self.local_addr;
        let active = Arc::clone(&self.active);

        let task = tokio::spawn(self.accept_loop(shutdown_rx));

        ServerHandle {
            local_addr,
            shutdown_tx,
            active,
            task: Some(task),
        }
    }

    async fn accept_loop(self, mut shutdown: watch::Receiver<bool>) {
        let mut handlers = JoinSet::new();

        loop {
            if *shutdown.borrow() {
                break;
            }

            let accepted = tokio::select! {
                _ = shutdown.changed() => break,
                Some(done) = handlers.join_next(), if !handlers.is_empty() => {
                    if let Err(e) = done {
                        error!(error = %e, "connection handler panicked");
                    }
                    continue;
                }
                r = self.listener.accept() => r,
            };

            let (stream, peer) = match accepted {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };

            let permit = match Arc::clone(&self.slots).try_acquire_owned() {
                Ok(p) => p,
                Err(_) => {
                    warn!(
                        %peer,
                        max = self.max_connections,
                        "connection limit reached; client waits for a free slot"
                    );
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        p = Arc::clone(&self.slots).acquire_owned() => match p {
                            Ok(p) => p,
                            Err(_) => break,
                        },
                    }
                }
            };

            let trace_id = TraceId::new();
            let span = connection_span(peer, &trace_id);
            let dispatcher = self.dispatcher.clone();
            let active = Arc::clone(&self.active);
            let conn_shutdown = shutdown.clone();

            handlers.spawn(
                async move {
                    let now_active = active.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(active = now_active, "client connected");

                    match handle_connection(stream, &dispatcher, conn_shutdown).await {
                        Ok(n) => {
                            Span::current().record("requests", n);
                            info!("client disconnected");
                        }
                        Err(e) => warn!(error = %e, "connection closed on transport error"),
                    }

                    active.fetch_sub(1, Ordering::Relaxed);
                    drop(permit);
                }
                .instrument(span),
            );
        }

        drop(self.listener);
        info!(local_addr = %self.local_addr, "listener closed");

        while let Some(done) = handlers.join_next().await {
            if let Err(e) = done {
                error!(error = %e, "connection handler panicked");
            }
        }
        debug!("all connection handlers finished");
    }
}

/// Serves one client until EOF, a transport error or shutdown.
/// Returns the number of requests answered.
async fn handle_connection(
    stream: TcpStream,
    dispatcher: &Dispatcher,
    shutdown: watch::Receiver<bool>,
) -> Result<u64, ServerError> {
    let (reader, mut writer) = stream.into_split();
    let mut served = 0u64;

    let outcome = serve_lines(
        BufReader::new(reader).lines(),
        &mut writer,
        dispatcher,
        shutdown,
        &mut served,
    )
    .await;

    // Best effort on every exit path.
    let _ = writer.shutdown().await;

    outcome.map(|()| served)
}

async fn serve_lines(
    mut lines: Lines<BufReader<OwnedReadHalf>>,
    writer: &mut OwnedWriteHalf,
    dispatcher: &Dispatcher,
    mut shutdown: watch::Receiver<bool>,
    served: &mut u64,
) -> Result<(), ServerError> {
    loop {
        if *shutdown.borrow() {
            debug!("shutdown observed; no further reads");
            return Ok(());
        }

        let line = tokio::select! {
            r = lines.next_line() => r?,
            _ = shutdown.changed() => return Ok(()),
        };

        let Some(line) = line else {
            return Ok(());
        };
        debug!(request = %line, "request received");

        let reply =
            warn_if_slow("dispatch", SLOW_REQUEST, async { respond_to_line(dispatcher, &line) })
                .await;

        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        *served += 1;

        debug!(%reply, "reply sent");
    }
}

/// Running server. Dropping the handle shuts the server down.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    active: Arc<AtomicUsize>,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Stops accepting, closes the listener and tells every handler to stop
    /// after its current request.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Waits for the accept loop and all handlers to finish.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "accept loop aborted");
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
