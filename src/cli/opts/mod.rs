pub mod client;
pub mod parsers;
pub mod schema;
pub mod server;

use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sends a single request to a running agent
    #[command(name = "client")]
    Client(client::ClientCommand),

    /// Launches the agent to listen for incoming requests
    #[command(name = "server")]
    Server(server::ServerCommand),

    /// Prints JSON schemas of the messages exchanged with the agent
    #[command(name = "schema")]
    Schema(schema::SchemaCommand),
}

#[derive(Parser, Debug)]
#[command(author, about, version)]
pub struct Opts {
    #[command(subcommand)]
    pub command: Command,
}
