use clap::Parser;
use log::info;
use tokio::io::BufReader;
use treasure_client::input::InputReader;
use treasure_client::network::Client;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:12345")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    let mut client = match Client::connect(&args.server).await {
        Ok(client) => client,
        Err(e) if e.is_disconnect() => {
            println!("Failed to receive player name or server closed connection.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Player Name: {}", client.name());

    let mut input = InputReader::new(BufReader::new(tokio::io::stdin()));
    let mut stdout = tokio::io::stdout();
    client.run(&mut input, &mut stdout).await?;

    Ok(())
}
