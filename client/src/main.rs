use clap::Parser;
use client::network::{Client, ClientConfig};
use log::info;
use shared::{IdleAxis, LogChatDisplay};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host address to sync with
    #[arg(short, long, default_value = "127.0.0.1:7777")]
    server: String,

    /// Paddle slot to drive (2, 3 or 4)
    #[arg(long, default_value_t = 2)]
    slot: u8,

    /// Local paddle speed in field units per second
    #[arg(long, default_value_t = shared::DEFAULT_PADDLE_SPEED)]
    paddle_speed: f32,

    /// Local tick rate (ticks per second); inputs are sent every tick
    #[arg(short, long, default_value_t = 60)]
    tick_rate: u32,

    /// Chat author name (defaults to "Player <slot>")
    #[arg(long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client for slot {}...", args.slot);
    info!("Syncing with host at {}", args.server);
    info!("Type a line and press enter to chat");

    let mut config = ClientConfig::new(args.server, args.slot);
    config.paddle_speed = args.paddle_speed;
    if let Some(name) = args.name {
        config.name = name;
    }

    let client = Client::connect(config, Box::new(LogChatDisplay), Box::new(IdleAxis)).await?;
    client.run(args.tick_rate).await?;

    Ok(())
}
