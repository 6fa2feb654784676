use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use packetwire_server::PacketServer;
use tracing::{info, warn};

use crate::cmd::ListenArgs;
use crate::exit::{server_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::input::load_registry;
use crate::output::{print_packet, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = load_registry(&args.defs)?;
    let server = PacketServer::bind(args.addr.as_str(), registry)
        .map_err(|err| server_error("bind failed", err))?;

    server
        .on_connected(|peer| info!(peer = peer.id(), addr = %peer.addr(), "peer connected"))
        .map_err(|err| server_error("subscribe failed", err))?;
    server
        .on_disconnected(|peer| info!(peer = peer.id(), "peer disconnected"))
        .map_err(|err| server_error("subscribe failed", err))?;

    let (tx, rx) = mpsc::channel();
    let echo = args.echo;
    server
        .on_data(move |peer, packet| {
            if echo {
                if let Err(err) = peer.send(packet) {
                    warn!(peer = peer.id(), error = %err, "echo failed");
                }
            }
            let _ = tx.send((peer.id(), packet.clone()));
        })
        .map_err(|err| server_error("subscribe failed", err))?;

    let handle = server
        .spawn()
        .map_err(|err| server_error("server start failed", err))?;
    info!(addr = %handle.local_addr(), "listening");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let (peer, packet) = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(received) => received,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if let Some(only) = &args.only {
            if !only.iter().any(|name| name == packet.name()) {
                continue;
            }
        }

        print_packet(&packet, Some(peer), format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    handle
        .shutdown()
        .map_err(|err| server_error("shutdown failed", err))?;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
