mod action;
mod http;
mod listening;
pub mod proc;
pub mod state;
mod unix;

pub use http::{HttpExecBody, HttpExecReply};
pub use listening::ListeningServer;

use derive_builder::Builder;
use log::info;
use state::{ServerState, Tools};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::{io, net::TcpListener};

/// Represents a server configuration prior to listening
#[derive(Builder, Clone, Debug)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Server {
    /// Path of the unix socket serving JSON-RPC
    #[builder(
        setter(into),
        default = "PathBuf::from(crate::core::DEFAULT_SOCKET_PATH)"
    )]
    socket_path: PathBuf,

    /// Address for the HTTP exec endpoint; disabled when unset
    #[builder(setter(strip_option), default)]
    http_addr: Option<SocketAddr>,

    /// External programs used to carry out requests
    #[builder(default)]
    tools: Tools,

    /// Maximum external processes running at once
    #[builder(default = "state::constants::DEFAULT_MAX_IN_FLIGHT")]
    max_in_flight: usize,

    /// Timeout for requests that do not specify one; unbounded when unset
    #[builder(setter(strip_option), default)]
    default_timeout: Option<Duration>,

    /// Ceiling applied to every timeout
    #[builder(setter(strip_option), default)]
    max_timeout: Option<Duration>,

    /// Parent directory for screenshot scratch space
    #[builder(setter(into, strip_option), default)]
    scratch_dir: Option<PathBuf>,
}

impl ServerBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.max_in_flight {
            return Err(String::from("max_in_flight must be at least 1"));
        }
        Ok(())
    }
}

impl Server {
    /// Binds every configured transport and begins serving requests
    ///
    /// Both listeners are bound before anything is spawned, so a failure
    /// leaves nothing running and no socket file behind.
    pub async fn listen(self) -> io::Result<ListeningServer> {
        let state = Arc::new(ServerState::new(
            self.tools,
            self.max_in_flight,
            self.default_timeout,
            self.max_timeout,
            self.scratch_dir,
        ));

        let (socket, unix_listener) = unix::SocketFile::bind(self.socket_path)?;
        info!("Listening for RPC on {}", socket.path().display());

        let http_listener = match self.http_addr {
            Some(addr) => {
                let listener = TcpListener::bind(addr).await?;
                info!("Listening for HTTP on {}", listener.local_addr()?);
                Some(listener)
            }
            None => None,
        };
        let http_addr = match http_listener.as_ref() {
            Some(listener) => Some(listener.local_addr()?),
            None => None,
        };

        let unix_handle =
            tokio::spawn(unix::accept_loop(unix_listener, Arc::clone(&state)));
        let http_handle = http_listener.map(|listener| {
            tokio::spawn(http::serve(listener, Arc::clone(&state)))
        });

        Ok(ListeningServer {
            socket,
            http_addr,
            state,
            unix_handle,
            http_handle,
        })
    }
}
