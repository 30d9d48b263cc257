//! Chatroom Server - Entry Point
//!
//! A TCP chatroom server that relays line-based messages among connected
//! clients.

use std::env;
use std::process;

use log::{error, info};

use chatroom_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <port>", args[0]);
        process::exit(1);
    }

    let port: u16 = match args[1].parse() {
        Ok(port) => port,
        Err(_) => {
            eprintln!("Invalid port: {}", args[1]);
            process::exit(1);
        }
    };

    let mut config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    config.port = port;

    info!("Launching chatroom server...");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            process::exit(1);
        }
    };
    server.start().await;
}
