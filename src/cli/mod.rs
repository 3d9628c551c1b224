pub mod format;
mod opts;

use crate::core::{
    msg::{
        EmptyReply, ExecArgs, ExecReply, Reply, Request, RpcRequest,
        RpcResponse, ScreenshotArgs, ScreenshotReply, UiClickArgs, UiKeysArgs,
    },
    ClientBuilder, HttpExecBody, HttpExecReply, SchemaInfo, ServerBuilder,
    Tools,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use format::{FormatOption, FormatResult};
use log::info;
use opts::{
    client::{self, ClientCommand},
    schema::{SchemaSubcommand, SchemaType},
    server::ServerCommand,
    Command,
};
use serde::Serialize;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tokio::{
    io::AsyncWriteExt,
    signal::unix::{signal, SignalKind},
};

pub use opts::Opts;

/// Primary entrypoint to run the executable based on input options,
/// yielding the code the process should exit with
pub async fn run(opts: Opts) -> Result<i32, Box<dyn Error>> {
    match opts.command {
        Command::Server(s) => run_server(s).await,
        Command::Client(c) => {
            let output_format = c.output_format;
            match (output_format, run_client(c).await) {
                (FormatOption::Json, Err(x)) => {
                    let text = serde_json::json!({ "error": x.to_string() });
                    println!("{}", text);
                    Ok(1)
                }
                (_, result) => result,
            }
        }
        Command::Schema(s) => {
            run_schema(s.command);
            Ok(0)
        }
    }
}

async fn write_stdout(data: &[u8], path: Option<&PathBuf>) -> io::Result<()> {
    match path {
        Some(p) => {
            tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .await?
                .write_all(data)
                .await
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(data).await?;
            stdout.flush().await
        }
    }
}

/// Writes `data` in the client's output format, using `human` to render
/// human-readable text
async fn write_formatted<T, F>(
    cmd: &ClientCommand,
    data: T,
    human: F,
) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
    F: FnOnce(T) -> FormatResult,
{
    let mut text = format::format(cmd.output_format, data, human)?;
    if cmd.output_format == FormatOption::Json {
        text.push('\n');
    }
    write_stdout(text.as_bytes(), cmd.redirect_stdout.as_ref()).await?;
    Ok(())
}

async fn run_server(cmd: ServerCommand) -> Result<i32, Box<dyn Error>> {
    info!("Launching server: {:?}", cmd);

    let mut config = ServerBuilder::default();
    config
        .socket_path(cmd.socket)
        .tools(Tools {
            shell: cmd.shell,
            screenshot: cmd.screenshot_tool,
            input: cmd.input_tool,
        })
        .max_in_flight(cmd.max_in_flight);

    if let Some(addr) = cmd.http {
        config.http_addr(addr);
    }
    if let Some(timeout) = cmd.default_timeout {
        config.default_timeout(timeout);
    }
    if let Some(timeout) = cmd.max_timeout {
        config.max_timeout(timeout);
    }
    if let Some(dir) = cmd.scratch_dir {
        config.scratch_dir(dir);
    }

    let mut server = config
        .build()
        .map_err(|x| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid server config: {}", x),
            )
        })?
        .listen()
        .await?;

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = server.wait() => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received interrupt, shutting down");
            server.shutdown();
        }
        _ = terminate.recv() => {
            info!("Received terminate, shutting down");
            server.shutdown();
        }
    }

    Ok(0)
}

async fn run_client(cmd: ClientCommand) -> Result<i32, Box<dyn Error>> {
    info!("Launching client: {:?}", cmd);

    let mut client = ClientBuilder::default()
        .socket_path(cmd.socket.clone())
        .timeout(cmd.timeout)
        .build()?
        .connect()
        .await?;

    match &cmd.command {
        client::Subcommand::Exec(c) => {
            let reply =
                client.ask_exec(c.command.clone(), c.exec_timeout).await?;
            let exit_code = reply.exit_code;
            write_formatted(&cmd, reply, |x| Ok(x.output)).await?;
            return Ok(exit_code);
        }
        client::Subcommand::Screenshot(c) => {
            let reply = client.ask_screenshot(c.quality).await?;
            match cmd.output_format {
                FormatOption::Human => {
                    let image = BASE64.decode(&reply.image)?;
                    match c.out.as_ref() {
                        Some(path) => {
                            tokio::fs::write(path, &image).await?;
                            let text = format!(
                                "Saved {} bytes to {}\n",
                                image.len(),
                                path.display()
                            );
                            write_stdout(
                                text.as_bytes(),
                                cmd.redirect_stdout.as_ref(),
                            )
                            .await?;
                        }
                        None => {
                            write_stdout(&image, cmd.redirect_stdout.as_ref())
                                .await?
                        }
                    }
                }
                FormatOption::Json => {
                    write_formatted(&cmd, reply, |_| Err("Unreachable".into()))
                        .await?
                }
            }
        }
        client::Subcommand::Click(c) => {
            client.ask_click(c.x, c.y).await?;
            write_formatted(&cmd, EmptyReply {}, |_| {
                Ok(format!("Clicked at ({}, {})\n", c.x, c.y))
            })
            .await?;
        }
        client::Subcommand::Keys(c) => {
            client.ask_keys(c.text.clone()).await?;
            write_formatted(&cmd, EmptyReply {}, |_| {
                Ok(format!("Typed {} characters\n", c.text.chars().count()))
            })
            .await?;
        }
    }

    Ok(0)
}

fn run_schema(cmd: SchemaSubcommand) {
    use strum::VariantNames;
    match cmd {
        SchemaSubcommand::List => {
            for v in SchemaType::VARIANTS {
                println!("{}", v);
            }
        }
        SchemaSubcommand::Info(info) => println!(
            "{}",
            match info.schema_type {
                SchemaType::Request => Request::schema(),
                SchemaType::Reply => Reply::schema(),
                SchemaType::RpcRequest => RpcRequest::schema(),
                SchemaType::RpcResponse => RpcResponse::schema(),
                SchemaType::ExecRequest => ExecArgs::schema(),
                SchemaType::ScreenshotRequest => ScreenshotArgs::schema(),
                SchemaType::UiClickRequest => UiClickArgs::schema(),
                SchemaType::UiKeysRequest => UiKeysArgs::schema(),
                SchemaType::ExecReply => ExecReply::schema(),
                SchemaType::ScreenshotReply => ScreenshotReply::schema(),
                SchemaType::EmptyReply => EmptyReply::schema(),
                SchemaType::HttpExecRequest => HttpExecBody::schema(),
                SchemaType::HttpExecReply => HttpExecReply::schema(),
            }
        ),
    }
}
