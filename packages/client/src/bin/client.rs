//! Terminal client for the raise-hand room server.
//!
//! Joins a room and lets you raise or lower your hand from the prompt. When
//! `--room` is omitted a random room name is generated; share it so others can
//! join. The client exits when the connection drops.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin handraise-client -- --username Alice --room demo
//! cargo run --bin handraise-client -- -n Bob
//! ```

use clap::{Parser, builder::NonEmptyStringValueParser};

use handraise_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "handraise-client")]
#[command(about = "Raise-hand client for a shared room", long_about = None)]
struct Args {
    /// Display name shown to the other members
    #[arg(short = 'n', long, value_parser = NonEmptyStringValueParser::new())]
    username: String,

    /// Room to join; a random name is generated when omitted
    #[arg(short = 'r', long, value_parser = NonEmptyStringValueParser::new())]
    room: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = handraise_client::run_client(args.url, args.room, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
