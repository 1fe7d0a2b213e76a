// crates/matchmaking-client/src/main.rs

mod network;
mod render;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use matchmaking_core::Request;
use matchmaking_protocol::csv_codec::parse_input_line;
use tokio::time::Duration;

use crate::network::ServerConnection;

#[derive(Parser)]
#[clap(name = "matchmaking-client")]
#[clap(about = "Command-line client for the matchmaking server")]
struct Cli {
    /// Server address
    #[clap(short, long, default_value = "127.0.0.1:9100")]
    server: String,

    /// Seconds to wait for each reply
    #[clap(short, long, default_value = "5")]
    timeout: u64,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Join the queue
    Enqueue {
        player: String,

        /// Asset the player is fielding
        #[clap(long)]
        pet: Option<String>,
    },
    /// Leave the queue
    Cancel { player: String },
    /// Show a player's state
    Status { player: String },
    /// Acknowledge a match
    Ack { player: String },
    /// Interactive session; reads CSV-style commands from stdin
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .init();
    }

    let wait = Duration::from_secs(cli.timeout);
    let mut connection = ServerConnection::connect(&cli.server).await?;

    let request = match cli.command {
        Command::Enqueue { player, pet } => Request::Enqueue {
            player_id: player,
            pet_id: pet,
        },
        Command::Cancel { player } => Request::Cancel { player_id: player },
        Command::Status { player } => Request::Status { player_id: player },
        Command::Ack { player } => Request::Acknowledge { player_id: player },
        Command::Repl => return run_repl(&mut connection, wait).await,
    };

    if request.player_id().trim().is_empty() {
        anyhow::bail!("player id must not be empty");
    }

    let reply = connection.request(&request, wait).await?;
    for notice in &reply.notices {
        println!("!! {}", render::describe(notice));
    }
    println!("{}", render::describe(&reply.response));
    Ok(())
}

async fn run_repl(connection: &mut ServerConnection, wait: Duration) -> Result<()> {
    println!("Type commands like:");
    println!("  E, alice[, petId]   (enqueue)");
    println!("  X, alice            (cancel)");
    println!("  S, alice            (status)");
    println!("  K, alice            (acknowledge)");
    println!("Type 'quit' or 'exit' to leave.\n");

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        let Some(request) = parse_input_line(trimmed) else {
            eprintln!("Could not parse line as a command. Check the format.");
            continue;
        };

        match connection.request(&request, wait).await {
            Ok(reply) => {
                for notice in &reply.notices {
                    println!("!! {}", render::describe(notice));
                }
                println!("<< {}", render::describe(&reply.response));
            }
            Err(e) => {
                eprintln!("Request failed: {}", e);
                break;
            }
        }
    }

    Ok(())
}
