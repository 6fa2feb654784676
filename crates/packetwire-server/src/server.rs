use std::fmt;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use packetwire_packet::{Packet, PacketError, PacketReader, PacketWriter, TypeRegistry};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::event::{EventHandler, CONNECTED, DATA, DISCONNECTED};

/// An accepted connection, as seen by event handlers.
///
/// Cloning is cheap; every clone writes to the same socket.
#[derive(Clone)]
pub struct Peer {
    id: u64,
    addr: SocketAddr,
    writer: Arc<Mutex<PacketWriter<TcpStream>>>,
}

impl Peer {
    /// Server-assigned id, unique for the server's lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Send a packet back to this peer.
    pub fn send(&self, packet: &Packet) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| ServerError::LockPoisoned("peer writer"))?;
        writer.write_packet(packet)?;
        Ok(())
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

/// Payload passed to server event handlers.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    Connected(Peer),
    Data(Peer, Packet),
    Disconnected(Peer),
}

impl ServerEvent {
    /// Name of the event this payload is triggered under.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected(_) => CONNECTED,
            ServerEvent::Data(..) => DATA,
            ServerEvent::Disconnected(_) => DISCONNECTED,
        }
    }

    pub fn peer(&self) -> &Peer {
        match self {
            ServerEvent::Connected(peer)
            | ServerEvent::Data(peer, _)
            | ServerEvent::Disconnected(peer) => peer,
        }
    }

    pub fn packet(&self) -> Option<&Packet> {
        match self {
            ServerEvent::Data(_, packet) => Some(packet),
            _ => None,
        }
    }
}

/// Accepts TCP connections and decodes packets from each on its own thread.
pub struct PacketServer {
    listener: TcpListener,
    registry: Arc<TypeRegistry>,
    events: Arc<EventHandler<ServerEvent>>,
    config: ServerConfig,
    next_peer_id: AtomicU64,
}

impl PacketServer {
    /// Bind a listening socket. `connected`, `data` and `disconnected` are
    /// added to the event handler.
    pub fn bind(addr: impl ToSocketAddrs, registry: Arc<TypeRegistry>) -> Result<Self> {
        let listener = TcpListener::bind(addr).map_err(ServerError::Bind)?;

        let events = EventHandler::new();
        for name in [CONNECTED, DATA, DISCONNECTED] {
            events.add_event(name)?;
        }

        info!(
            addr = %listener.local_addr()?,
            packet_types = registry.len(),
            "packet server bound"
        );
        Ok(Self {
            listener,
            registry,
            events: Arc::new(events),
            config: ServerConfig::default(),
            next_peer_id: AtomicU64::new(1),
        })
    }

    /// Override per-connection settings.
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The server's event handler, for custom events or raw subscriptions.
    pub fn events(&self) -> &Arc<EventHandler<ServerEvent>> {
        &self.events
    }

    /// Subscribe to a named event.
    pub fn on<F>(&self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&ServerEvent) + Send + Sync + 'static,
    {
        self.events.on(name, handler)
    }

    pub fn on_connected<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(&Peer) + Send + Sync + 'static,
    {
        self.events.on(CONNECTED, move |event| handler(event.peer()))
    }

    pub fn on_data<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(&Peer, &Packet) + Send + Sync + 'static,
    {
        self.events.on(DATA, move |event| {
            if let ServerEvent::Data(peer, packet) = event {
                handler(peer, packet);
            }
        })
    }

    pub fn on_disconnected<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(&Peer) + Send + Sync + 'static,
    {
        self.events.on(DISCONNECTED, move |event| handler(event.peer()))
    }

    /// Run the accept loop on the calling thread until `stop` is set and
    /// one more connection attempt wakes the loop.
    pub fn serve_until(&self, stop: &AtomicBool) -> Result<()> {
        for incoming in self.listener.incoming() {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            match incoming {
                Ok(stream) => {
                    if let Err(err) = self.spawn_connection(stream) {
                        warn!(error = %err, "failed to start connection");
                    }
                }
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::Interrupted
                            | ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                    ) =>
                {
                    debug!(error = %err, "transient accept failure");
                }
                Err(err) => return Err(ServerError::Io(err)),
            }
        }
        info!("packet server stopped accepting");
        Ok(())
    }

    /// Run the accept loop on a background thread.
    pub fn spawn(self) -> Result<ServerHandle> {
        let local_addr = self.local_addr()?;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let thread = thread::Builder::new()
            .name("packetwire-accept".to_string())
            .spawn(move || self.serve_until(&thread_stop))?;

        Ok(ServerHandle {
            local_addr,
            stop,
            thread,
        })
    }

    fn spawn_connection(&self, stream: TcpStream) -> Result<()> {
        let addr = match stream.peer_addr() {
            Ok(addr) => addr,
            Err(err) => {
                debug!(error = %err, "peer went away before it was handled");
                return Ok(());
            }
        };
        let id = self.next_peer_id.fetch_add(1, Ordering::Relaxed);
        debug!(peer = id, %addr, "accepted connection");

        self.config.apply(&stream)?;
        let writer_stream = stream.try_clone()?;
        let registry = Arc::clone(&self.registry);
        let events = Arc::clone(&self.events);
        let config = self.config;
        thread::Builder::new()
            .name(format!("packetwire-peer-{id}"))
            .spawn(move || {
                run_connection(stream, writer_stream, id, addr, registry, events, config)
            })?;
        Ok(())
    }
}

/// Handle to a server running on a background thread.
pub struct ServerHandle {
    local_addr: SocketAddr,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    ///
    /// Connections already accepted keep running until their peers close.
    pub fn shutdown(self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the blocking accept.
        if let Err(err) = TcpStream::connect(wake_addr(self.local_addr)) {
            debug!(error = %err, "wake connection failed");
        }
        self.join()
    }

    /// Wait for the accept loop to exit without asking it to stop.
    pub fn join(self) -> Result<()> {
        self.thread
            .join()
            .map_err(|_| ServerError::ShutdownFailed("accept thread panicked".to_string()))?
    }
}

fn wake_addr(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        }
        IpAddr::V6(ip) if ip.is_unspecified() => {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), addr.port())
        }
        _ => addr,
    }
}

fn run_connection(
    stream: TcpStream,
    writer_stream: TcpStream,
    id: u64,
    addr: SocketAddr,
    registry: Arc<TypeRegistry>,
    events: Arc<EventHandler<ServerEvent>>,
    config: ServerConfig,
) {
    let peer = Peer {
        id,
        addr,
        writer: Arc::new(Mutex::new(PacketWriter::new(
            writer_stream,
            Arc::clone(&registry),
        ))),
    };

    fire(&events, ServerEvent::Connected(peer.clone()));

    let mut reader = PacketReader::with_config(stream, registry, config.codec);
    let mut received = 0u64;
    loop {
        match reader.read_packet() {
            Ok(packet) => {
                received += 1;
                fire(&events, ServerEvent::Data(peer.clone(), packet));
            }
            Err(PacketError::EndOfStream) => {
                debug!(peer = id, received, "peer closed connection");
                break;
            }
            Err(err) => {
                warn!(peer = id, %addr, received, error = %err, "dropping connection after decode error");
                break;
            }
        }
    }
    let _ = reader.get_ref().shutdown(Shutdown::Both);

    fire(&events, ServerEvent::Disconnected(peer));
}

fn fire(events: &EventHandler<ServerEvent>, event: ServerEvent) {
    if let Err(err) = events.trigger(event.name(), &event) {
        warn!(event = event.name(), error = %err, "event dispatch failed");
    }
}
