use clap::Parser;
use log::{error, info};
use treasure_server::config::{GameConfig, DEFAULT_BOARD_SIZE, DEFAULT_TREASURE_LEVELS};
use treasure_server::dispatcher::Dispatcher;
use treasure_server::network::Server;
use treasure_shared::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board dimension (tiles per side, 2-16)
    #[arg(default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Number of treasure levels (1..=size)
    #[arg(default_value_t = DEFAULT_TREASURE_LEVELS)]
    treasure_levels: usize,

    /// Address to bind to; all interfaces by default
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = GameConfig::new(args.size, args.treasure_levels);
    let board = config.build_board()?;
    info!(
        "Starting server with a {}x{} board and {} treasure levels",
        config.size, config.size, config.treasure_levels
    );

    let (dispatcher, dispatcher_task) = Dispatcher::spawn(board);

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, dispatcher.clone()).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    dispatcher.shutdown();
    dispatcher_task.await?;

    Ok(())
}
