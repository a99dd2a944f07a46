use clap::Parser;
use env_logger::Env;
use log::info;
use server::config::{ServerConfig, DEFAULT_OUTBOX_CAPACITY};
use server::network::Server;

/// Authoritative server for the two-player odd/even board game
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Interface to bind to
    #[clap(short = 'H', long, env = "ODDEVEN_HOST", default_value = "0.0.0.0")]
    host: String,
    /// Port to listen on
    #[clap(short, long, env = "ODDEVEN_PORT", default_value = "8080")]
    port: u16,
    /// Side length of the square board
    #[clap(short, long, env = "ODDEVEN_BOARD_SIDE", default_value = "5")]
    board_side: usize,
    /// Outbound frames queued per session before sends are dropped
    #[clap(long, default_value_t = DEFAULT_OUTBOX_CAPACITY)]
    outbox_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        board_side: args.board_side,
        outbox_capacity: args.outbox_capacity,
    };

    let mut server = Server::bind(config).await?;

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            shutdown.shutdown();
        }
    });

    server.run().await?;
    Ok(())
}
