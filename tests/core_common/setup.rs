use desk_agent::core::{
    ClientBuilder, ConnectedClient, ListeningServer, ServerBuilder,
    ToolCommand, Tools,
};
use log::debug;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestBench {
    pub client: ConnectedClient,
    pub server: ListeningServer,

    /// Directory screenshots are captured under
    pub scratch_dir: PathBuf,

    /// Holds the socket and scratch space for the life of the test
    pub dir: TempDir,
}

impl TestBench {
    /// Opens an additional connection to the same server
    pub async fn connect(&self) -> ConnectedClient {
        ClientBuilder::default()
            .socket_path(self.server.socket_path())
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to build client config")
            .connect()
            .await
            .expect("Failed to connect")
    }
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stand-ins for bash, scrot, and xdotool that need no display
pub fn test_tools() -> Tools {
    Tools {
        shell: ToolCommand::with_args("sh", vec!["-c"]),
        screenshot: ToolCommand::with_args(
            "sh",
            vec!["-c", "printf 'fake-png' > \"$3\"", "scrot"],
        ),
        input: ToolCommand::new("true"),
    }
}

pub async fn setup() -> TestBench {
    setup_with(|_| ()).await
}

/// Starts a server with the test tools, letting `configure` adjust the
/// config before listening, and connects a client to it
pub async fn setup_with<F>(configure: F) -> TestBench
where
    F: FnOnce(&mut ServerBuilder),
{
    init_logger();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let scratch_dir = dir.path().join("scratch");
    std::fs::create_dir(&scratch_dir).expect("Failed to create scratch dir");

    let mut config = ServerBuilder::default();
    config
        .socket_path(dir.path().join("agent.sock"))
        .tools(test_tools())
        .scratch_dir(scratch_dir.clone());
    configure(&mut config);

    let server = config
        .build()
        .expect("Failed to build server config")
        .listen()
        .await
        .expect("Failed to listen");
    debug!("Server listening: {}", server.socket_path().display());

    let client = ClientBuilder::default()
        .socket_path(server.socket_path())
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to build client config")
        .connect()
        .await
        .expect("Failed to connect");

    TestBench {
        client,
        server,
        scratch_dir,
        dir,
    }
}

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
