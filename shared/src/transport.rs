//! UDP transport: one socket, fire-and-forget sends, and a receive loop
//! feeding an inbound queue.
//!
//! The receive loop runs on its own task for the life of the process and
//! is the queue's only producer; the simulation tick is its only consumer.
//! The queue is the sole state shared between the two, so game state
//! itself needs no lock.

use crate::Message;
use log::{debug, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Owns the process-wide UDP socket and the inbound queue.
pub struct Transport {
    socket: Arc<UdpSocket>,
    inbound: mpsc::UnboundedReceiver<(String, SocketAddr)>,
}

impl Transport {
    /// Binds the host socket on the given port and starts the receive loop.
    /// Bind failure is an unrecoverable configuration error; callers abort
    /// startup on it.
    pub async fn bind(port: u16) -> io::Result<Self> {
        Ok(Self::start(UdpSocket::bind(("0.0.0.0", port)).await?).await)
    }

    /// Binds an ephemeral client socket and starts the receive loop.
    pub async fn bind_ephemeral() -> io::Result<Self> {
        Ok(Self::start(UdpSocket::bind("0.0.0.0:0").await?).await)
    }

    async fn start(socket: UdpSocket) -> Self {
        // try_send_to returns WouldBlock until the reactor has observed
        // write readiness once, so prime it here or every early send is
        // silently dropped.
        let _ = socket.writable().await;
        let socket = Arc::new(socket);
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_receive_loop(Arc::clone(&socket), tx);
        Self {
            socket,
            inbound: rx,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Best-effort datagram send; the result is deliberately discarded.
    /// Packet loss is the protocol's only loss-handling mechanism, so a
    /// failed send is indistinguishable from a lost packet.
    pub fn send(&self, message: &Message, dest: SocketAddr) {
        self.send_text(&message.encode(), dest);
    }

    /// Sends already-encoded wire text, used when relaying a datagram
    /// verbatim.
    pub fn send_text(&self, text: &str, dest: SocketAddr) {
        let _ = self.socket.try_send_to(text.as_bytes(), dest);
    }

    /// Drains one queued datagram without blocking. `None` means the queue
    /// is empty, or the receive loop has exited and drained dry.
    pub fn try_recv(&mut self) -> Option<(String, SocketAddr)> {
        self.inbound.try_recv().ok()
    }
}

/// Blocks on the next datagram, decodes it as text and enqueues
/// `(text, source)`. Terminates permanently on any receive error or when
/// the consumer side of the queue is gone; there is no restart policy.
fn spawn_receive_loop(
    socket: Arc<UdpSocket>,
    tx: mpsc::UnboundedSender<(String, SocketAddr)>,
) {
    tokio::spawn(async move {
        let mut buffer = [0u8; 2048];

        loop {
            match socket.recv_from(&mut buffer).await {
                Ok((len, addr)) => match std::str::from_utf8(&buffer[..len]) {
                    Ok(text) => {
                        if tx.send((text.to_owned(), addr)).is_err() {
                            break;
                        }
                    }
                    Err(_) => debug!("dropping non-UTF-8 datagram from {}", addr),
                },
                Err(e) => {
                    warn!("receive loop terminating: {}", e);
                    break;
                }
            }
        }
    });
}
