//! Routegraph CLI: command-line client for a running shortest-path server
//!
//! Uses `PathClient` over the server's RESP port.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use routegraph::{NodeLabel, PathClient, ShortestPathReply};

#[derive(Parser)]
#[command(name = "routegraph", version, about = "Routegraph shortest-path CLI")]
struct Cli {
    /// Server address (host:port)
    #[arg(long, default_value = "127.0.0.1:6380", global = true, env = "ROUTEGRAPH_ADDR")]
    addr: String,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest path between two nodes
    Path {
        /// Origin node label
        origin: String,

        /// Destination node label
        destination: String,
    },
    /// Show node and edge counts of the served graph
    Info,
    /// Ping the server
    Ping,
    /// Start an interactive REPL
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut client = match PathClient::connect(&cli.addr).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: cannot connect to {}: {}", cli.addr, e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Path { origin, destination } => {
            run_path(&mut client, &origin, &destination, &cli.format).await
        }
        Commands::Info => run_info(&mut client, &cli.format).await,
        Commands::Ping => run_ping(&mut client).await,
        Commands::Shell => run_shell(&mut client, &cli.format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_path(
    client: &mut PathClient,
    origin: &str,
    destination: &str,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (path, weight) = client.shortest_path_weighted(origin, destination).await?;
    let reply = ShortestPathReply {
        path: path.into_iter().map(NodeLabel::from).collect(),
        weight,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        OutputFormat::Csv => {
            println!("step,node");
            for (step, node) in reply.path.iter().enumerate() {
                println!("{},{}", step, format_csv_value(node.as_str()));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["step", "node"]);

            for (step, node) in reply.path.iter().enumerate() {
                table.add_row(vec![step.to_string(), node.to_string()]);
            }

            println!("{}", table);
            println!("{} hop(s), total weight {}", hop_count(&reply), reply.weight);
        }
    }

    Ok(())
}

async fn run_info(
    client: &mut PathClient,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (nodes, edges) = client.info().await?;

    match format {
        OutputFormat::Json => {
            let info = serde_json::json!({ "nodes": nodes, "edges": edges });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        _ => {
            println!("Nodes:   {}", nodes);
            println!("Edges:   {}", edges);
        }
    }

    Ok(())
}

async fn run_ping(client: &mut PathClient) -> Result<(), Box<dyn std::error::Error>> {
    let result = client.ping().await?;
    println!("{}", result);
    Ok(())
}

async fn run_shell(
    client: &mut PathClient,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Routegraph Interactive Shell");
    println!("Type '<origin> <destination>', or :help for commands. :quit to exit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        eprint!("routegraph> ");

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            ":quit" | ":exit" | ":q" => break,
            ":help" | ":h" => {
                println!("Commands:");
                println!("  :info               Show graph size");
                println!("  :ping               Ping server");
                println!("  :quit               Exit shell");
                println!("  <origin> <dest>     Find the shortest path");
            }
            ":info" => {
                if let Err(e) = run_info(client, format).await {
                    eprintln!("Error: {}", e);
                }
            }
            ":ping" => {
                if let Err(e) = run_ping(client).await {
                    eprintln!("Error: {}", e);
                }
            }
            query => {
                let parts: Vec<&str> = query.split_whitespace().collect();
                match parts.as_slice() {
                    [origin, destination] => {
                        if let Err(e) = run_path(client, origin, destination, format).await {
                            eprintln!("Error: {}", e);
                        }
                    }
                    _ => eprintln!("Expected: <origin> <destination>"),
                }
            }
        }
    }

    println!("Bye!");
    Ok(())
}

/// Edges along the path, zero for an empty path
fn hop_count(reply: &ShortestPathReply) -> usize {
    reply.path.len().saturating_sub(1)
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_count() {
        let reply = ShortestPathReply {
            path: vec![NodeLabel::from("A"), NodeLabel::from("B"), NodeLabel::from("C")],
            weight: 3,
        };
        assert_eq!(hop_count(&reply), 2);

        let empty = ShortestPathReply { path: Vec::new(), weight: 0 };
        assert_eq!(hop_count(&empty), 0);
    }

    #[test]
    fn test_format_csv_value() {
        assert_eq!(format_csv_value("A"), "A");
        assert_eq!(format_csv_value("a,b"), "\"a,b\"");
        assert_eq!(format_csv_value("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
