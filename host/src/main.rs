use clap::Parser;
use host::network::{Host, HostConfig};
use log::info;
use shared::{IdleAxis, LogChatDisplay};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// UDP port to bind the host socket on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Ball speed in field units per second
    #[arg(long, default_value_t = shared::DEFAULT_BALL_SPEED)]
    ball_speed: f32,

    /// Local paddle speed in field units per second
    #[arg(long, default_value_t = shared::DEFAULT_PADDLE_SPEED)]
    paddle_speed: f32,

    /// Minimum spacing between State broadcasts, in seconds
    #[arg(long, default_value_t = shared::DEFAULT_BROADCAST_INTERVAL)]
    broadcast_interval: f32,

    /// Simulation tick rate (ticks per second)
    #[arg(short, long, default_value_t = 60)]
    tick_rate: u32,

    /// Chat author name
    #[arg(long, default_value = "Player 1")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting host on port {}...", args.port);
    info!("Type a line and press enter to chat");

    let config = HostConfig {
        port: args.port,
        ball_speed: args.ball_speed,
        paddle_speed: args.paddle_speed,
        broadcast_interval: args.broadcast_interval,
        name: args.name,
    };

    // No input device is wired up in the headless binary; the host paddle
    // sits still unless an embedder supplies a real axis.
    let host = Host::bind(config, Box::new(LogChatDisplay), Box::new(IdleAxis)).await?;
    host.run(args.tick_rate).await?;

    Ok(())
}
