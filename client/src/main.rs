use clap::Parser;
use client::autoplay::Autoplay;
use client::network::Client;
use env_logger::Env;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server URL to connect to
    #[arg(short = 's', long, env = "ODDEVEN_SERVER", default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Send random increments instead of reading commands
    #[arg(short = 'a', long)]
    autoplay: bool,

    /// Delay between autoplay moves in milliseconds
    #[arg(short = 'i', long, default_value = "250")]
    interval_ms: u64,

    /// Stop autoplay after this many moves
    #[arg(short = 'm', long)]
    moves: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting client...");
    let autoplay = args.autoplay.then(|| {
        info!("Autoplay every {}ms", args.interval_ms);
        Autoplay::new(Duration::from_millis(args.interval_ms), args.moves)
    });

    let mut client = Client::connect(&args.server, autoplay).await?;
    client.run().await?;

    Ok(())
}
