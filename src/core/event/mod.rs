// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Event manager
//!
//! One-shot rendezvous between the simulator and an external frontend:
//!
//! 1. [`EventManager::bind`] opens a listening socket (backlog of 1)
//! 2. the resolved port is advertised on stdout
//! 3. [`EventManager::accept`] waits for exactly one client
//! 4. [`EventManager::close`] seals the listening side
//!
//! After that the raw byte stream belongs to whatever protocol the frontend
//! and the simulator speak; nothing here frames messages.

use crate::core::error::{EmulatorError, Result};
use crate::core::shutdown::ShutdownSignal;
use std::io::{self, ErrorKind, Write};
use std::net::{Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

/// Pending-connection queue length; only one frontend may ever attach
pub const LISTEN_BACKLOG: i32 = 1;

/// How often a pending accept re-checks for a shutdown request
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Process-wide networking subsystem
///
/// The standard library brings up the platform socket layer on demand, so
/// starting it cannot fail here; the guard exists so that teardown can
/// release it as its final step.
#[derive(Debug)]
pub struct NetworkSubsystem {
    _private: (),
}

impl NetworkSubsystem {
    /// Start the networking subsystem
    pub fn startup() -> Result<Self> {
        log::debug!("Networking subsystem started");
        Ok(Self { _private: () })
    }
}

impl Drop for NetworkSubsystem {
    fn drop(&mut self) {
        log::debug!("Networking subsystem released");
    }
}

/// Listening side of the frontend rendezvous
///
/// # Example
///
/// ```no_run
/// use n64rx::core::event::EventManager;
/// use n64rx::core::shutdown::ShutdownSignal;
///
/// let manager = EventManager::bind(0)?;
/// println!("{}", manager.resolved_port()?);
///
/// if let Some(client) = manager.accept(&ShutdownSignal::new())? {
///     manager.close();
///     // hand `client` to the simulator
/// #   drop(client);
/// }
/// # Ok::<(), n64rx::EmulatorError>(())
/// ```
#[derive(Debug)]
pub struct EventManager {
    listener: TcpListener,
}

impl EventManager {
    /// Bind a listening socket on all IPv4 interfaces
    ///
    /// # Arguments
    ///
    /// * `port` - Requested port; 0 asks the OS for an ephemeral port
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::BindFailure` if no candidate address could be
    /// bound and put into listening mode.
    pub fn bind(port: u16) -> Result<Self> {
        Self::bind_candidates(port, (Ipv4Addr::UNSPECIFIED, port).to_socket_addrs())
    }

    /// Bind a listening socket on the IPv4 addresses `host` resolves to
    ///
    /// # Arguments
    ///
    /// * `host` - Host name or address literal
    /// * `port` - Requested port; 0 asks the OS for an ephemeral port
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::BindFailure` if resolution fails or no
    /// candidate could be bound and put into listening mode.
    pub fn bind_on(host: &str, port: u16) -> Result<Self> {
        Self::bind_candidates(port, (host, port).to_socket_addrs())
    }

    fn bind_candidates(
        port: u16,
        resolved: io::Result<impl Iterator<Item = SocketAddr>>,
    ) -> Result<Self> {
        let candidates = resolved.map_err(|e| {
            EmulatorError::BindFailure(format!("Failed to resolve interfaces for port {}: {}", port, e))
        })?;

        let mut last_error = None;

        // Try candidates in resolver order; a failed candidate's socket is
        // dropped (closed) before the next one is attempted.
        for addr in candidates.filter(SocketAddr::is_ipv4) {
            match open_listener(&addr) {
                Ok(listener) => {
                    log::debug!("Listening on {}", addr);
                    return Ok(Self { listener });
                }
                Err(e) => {
                    log::debug!("Cannot listen on {}: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }

        Err(EmulatorError::BindFailure(match last_error {
            Some(e) => format!("Cannot listen on port {}: {}", port, e),
            None => format!("No IPv4 interface available for port {}", port),
        }))
    }

    /// Read back the locally bound port
    ///
    /// Needed when the socket was bound to port 0.
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::BindFailure` if the socket address cannot be
    /// queried.
    pub fn resolved_port(&self) -> Result<u16> {
        self.listener
            .local_addr()
            .map(|addr| addr.port())
            .map_err(|e| EmulatorError::BindFailure(format!("Cannot read bound port: {}", e)))
    }

    /// Write the resolved port to `out` as a decimal line
    ///
    /// This is the advertisement the frontend reads to learn where to
    /// connect; it is written once, before waiting for the client.
    pub fn advertise<W: Write>(&self, out: &mut W) -> Result<u16> {
        let port = self.resolved_port()?;
        writeln!(out, "{}", port)
            .and_then(|()| out.flush())
            .map_err(|e| EmulatorError::BindFailure(format!("Cannot advertise port: {}", e)))?;
        Ok(port)
    }

    /// Wait for the single frontend client
    ///
    /// Every accept failure (would-block, interrupted, or otherwise) is
    /// retried; there is no escalation path before a connection exists.
    /// The wait re-checks `shutdown` every [`ACCEPT_POLL_INTERVAL`].
    ///
    /// # Returns
    ///
    /// - `Ok(Some(client))` once a client has connected
    /// - `Ok(None)` if shutdown was requested before anyone connected
    ///
    /// # Errors
    ///
    /// Returns `EmulatorError::BindFailure` if the listener cannot be put into
    /// polling mode, or the accepted connection cannot be made blocking.
    pub fn accept(&self, shutdown: &ShutdownSignal) -> Result<Option<ClientHandle>> {
        self.listener.set_nonblocking(true).map_err(|e| {
            EmulatorError::BindFailure(format!("Cannot poll listening socket: {}", e))
        })?;

        loop {
            if shutdown.is_requested() {
                log::info!("Shutdown requested while waiting for a frontend");
                return Ok(None);
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    // Accepted sockets inherit non-blocking mode on some platforms
                    stream.set_nonblocking(false).map_err(|e| {
                        EmulatorError::BindFailure(format!(
                            "Cannot switch connection from {} to blocking mode: {}",
                            peer, e
                        ))
                    })?;
                    log::info!("Frontend attached from {}", peer);
                    return Ok(Some(ClientHandle { stream, peer }));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    log::debug!("Transient accept error: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }
    }

    /// Release the listening socket
    ///
    /// Called right after a successful [`accept`](Self::accept) so no second
    /// client can ever connect.
    pub fn close(self) {
        match self.listener.local_addr() {
            Ok(addr) => log::debug!("Closed listening socket {}", addr),
            Err(_) => log::debug!("Closed listening socket"),
        }
    }
}

/// The accepted frontend connection
#[derive(Debug)]
pub struct ClientHandle {
    stream: TcpStream,
    peer: SocketAddr,
}

impl ClientHandle {
    /// Raw connection to the frontend
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }

    /// Address of the connected frontend
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Gracefully shut down both directions, then release the socket
    pub fn close(self) {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            // The frontend may already have hung up
            Err(e) if e.kind() == ErrorKind::NotConnected => {}
            Err(e) => log::warn!("Failed to shut down frontend connection: {}", e),
        }
        log::debug!("Closed frontend connection {}", self.peer);
    }
}

/// Create, bind and listen on one candidate address
///
/// The socket is close-on-exec and reuses addresses left in TIME_WAIT by a
/// previous session, matching what `TcpListener::bind` does.
#[cfg(unix)]
fn open_listener(addr: &SocketAddr) -> io::Result<TcpListener> {
    use rustix::net::{self, sockopt, AddressFamily, SocketFlags, SocketType};

    let family = match addr {
        SocketAddr::V4(_) => AddressFamily::INET,
        SocketAddr::V6(_) => AddressFamily::INET6,
    };

    let fd = net::socket_with(family, SocketType::STREAM, SocketFlags::CLOEXEC, None)?;
    sockopt::set_socket_reuseaddr(&fd, true)?;
    net::bind(&fd, addr)?;
    net::listen(&fd, LISTEN_BACKLOG)?;

    Ok(TcpListener::from(fd))
}

/// Create, bind and listen on one candidate address
///
/// The standard library does not expose the backlog on this platform; the
/// OS default is used.
#[cfg(not(unix))]
fn open_listener(addr: &SocketAddr) -> io::Result<TcpListener> {
    TcpListener::bind(addr)
}
