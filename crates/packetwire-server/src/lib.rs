//! Blocking TCP transport for packetwire packets.
//!
//! [`PacketServer`] accepts connections and runs one decode loop per
//! connection on its own thread. Lifecycle and traffic are reported through
//! an [`EventHandler`] keyed by event name:
//!
//! - `connected` when a peer is accepted
//! - `data` for every decoded packet
//! - `disconnected` when the peer's decode loop ends
//!
//! A decode error ends only the connection it happened on.
//! [`PacketConnection`] is the matching client side.

pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod server;

pub use config::ServerConfig;
pub use connection::PacketConnection;
pub use error::{Result, ServerError};
pub use event::{EventHandler, CONNECTED, DATA, DISCONNECTED};
pub use server::{PacketServer, Peer, ServerEvent, ServerHandle};
