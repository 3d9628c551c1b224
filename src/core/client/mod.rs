mod connected;
pub mod error;

pub use connected::ConnectedClient;

use derive_builder::Builder;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;
use tokio::{io, net::UnixStream};

/// Represents a client configuration prior to connecting
#[derive(Builder, Clone, Debug)]
pub struct Client {
    /// Path of the agent's unix socket
    #[builder(
        setter(into),
        default = "PathBuf::from(crate::core::DEFAULT_SOCKET_PATH)"
    )]
    socket_path: PathBuf,

    /// Maximum to wait on each response
    #[builder(default = "ConnectedClient::DEFAULT_TIMEOUT")]
    timeout: Duration,
}

impl Client {
    pub async fn connect(self) -> io::Result<ConnectedClient> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        debug!("Connected to {}", self.socket_path.display());
        Ok(ConnectedClient::new(stream, self.timeout))
    }
}
