//! Group chat server example
//!
//! Run with: cargo run --example chat_server [BIND_ADDR] [HISTORY_FILE]
//!
//! Examples:
//!   cargo run --example chat_server                          # binds to 0.0.0.0:5003
//!   cargo run --example chat_server localhost                # binds to 127.0.0.1:5003
//!   cargo run --example chat_server 127.0.0.1:5004           # binds to 127.0.0.1:5004
//!   cargo run --example chat_server 0.0.0.0:5003 chat.json   # custom history file
//!
//! ## Chatting
//!
//! Any line-oriented TCP client works:
//!   nc localhost 5003
//!   telnet localhost 5003
//!
//! Pick a user id and a group id at the prompts. The last 15 minutes of the
//! group's conversation are replayed on join, including across server
//! restarts. Type '/quit' to leave.

use std::net::SocketAddr;

use groupchat_rs::server::{ChatServer, ServerConfig};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:5003
/// - "localhost:5004" -> 127.0.0.1:5004
/// - "127.0.0.1" -> 127.0.0.1:5003
/// - "0.0.0.0:5003" -> 0.0.0.0:5003
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 5003;

    // Replace "localhost" with "127.0.0.1"
    let normalized = arg.replace("localhost", "127.0.0.1");

    // Try parsing as SocketAddr first (includes port)
    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    // Try parsing as IP address without port
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: chat_server [BIND_ADDR] [HISTORY_FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR     Address to bind to (default: 0.0.0.0:5003)");
    eprintln!("  HISTORY_FILE  History file location (default: chat_history.json)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  chat_server                        # binds to 0.0.0.0:5003");
    eprintln!("  chat_server localhost              # binds to 127.0.0.1:5003");
    eprintln!("  chat_server 127.0.0.1:5004         # binds to 127.0.0.1:5004");
    eprintln!("  chat_server 0.0.0.0:5003 chat.json # custom history file");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:5003".parse().unwrap(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("groupchat_rs=debug".parse()?)
                .add_directive("chat_server=debug".parse()?),
        )
        .init();

    // Create server config with the specified bind address
    let mut config = ServerConfig {
        bind_addr,
        ..ServerConfig::default()
    };
    if let Some(history) = args.get(2) {
        config = config.history_path(history);
    }

    println!("Starting group chat server on {}", config.bind_addr);
    println!("History file: {}", config.history_path.display());
    println!();
    println!("=== Join the chat ===");
    println!("nc:     nc localhost {}", config.bind_addr.port());
    println!("telnet: telnet localhost {}", config.bind_addr.port());
    println!();

    let server = ChatServer::bind(config).await?;

    // Run with Ctrl+C handling
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
