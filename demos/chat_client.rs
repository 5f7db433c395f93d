//! Group chat client example
//!
//! Run with: cargo run --example chat_client [SERVER_ADDR] USER_ID GROUP_ID
//!
//! Examples:
//!   cargo run --example chat_client -- localhost alice group1
//!   cargo run --example chat_client -- 127.0.0.1:5004 bob group2
//!
//! Logs in, prints the replayed history, and bridges stdin to the group:
//! every line you type is sent, every line from the group is printed.
//! Type '/quit' to leave.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use groupchat_rs::client::ChatClient;

fn parse_server_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 5003;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid server address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: chat_client [SERVER_ADDR] USER_ID GROUP_ID");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  SERVER_ADDR  Server to connect to (default: 127.0.0.1:5003)");
    eprintln!("  USER_ID      Display name to chat under");
    eprintln!("  GROUP_ID     Group to join");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  chat_client localhost alice group1");
    eprintln!("  chat_client 127.0.0.1:5004 bob group2");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    // Either ADDR USER GROUP or just USER GROUP
    let (addr, user_id, group_id) = match (args.get(1), args.get(2), args.get(3)) {
        (Some(addr), Some(user), Some(group)) => match parse_server_addr(addr) {
            Ok(addr) => (addr, user.clone(), group.clone()),
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        (Some(user), Some(group), None) => (
            "127.0.0.1:5003".parse().unwrap(),
            user.clone(),
            group.clone(),
        ),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("groupchat_rs=info".parse()?)
                .add_directive("chat_client=info".parse()?),
        )
        .init();

    let mut client = ChatClient::connect(addr).await?;
    client.login(&user_id, &group_id).await?;
    println!("Joined group '{}' as '{}'.", group_id, user_id);

    let (mut lines, mut write_half) = client.into_split();

    // Print everything the server sends, replayed history included
    let reader = tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            println!("{}", line);
        }
        println!("Disconnected from server");
    });

    // Bridge stdin to the group
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = input.next_line().await? {
        write_half.write_all(line.as_bytes()).await?;
        write_half.write_all(b"\r\n").await?;
        if line.trim().eq_ignore_ascii_case("/quit") {
            break;
        }
    }

    let _ = write_half.shutdown().await;
    reader.await?;
    Ok(())
}
